use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_intake_core::contract::GeneratorResult;
use order_intake_lambda::handlers::generator::generate_order_result;
use serde_json::Value;

async fn handle_request(_event: LambdaEvent<Value>) -> Result<GeneratorResult, Error> {
    Ok(generate_order_result(&mut rand::thread_rng()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();
    lambda_runtime::run(service_fn(handle_request)).await
}
