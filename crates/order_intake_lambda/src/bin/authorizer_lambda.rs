use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_intake_core::contract::AuthorizerResponse;
use order_intake_lambda::adapters::secrets::{SecretCache, SecretProvider};
use order_intake_lambda::config::AuthorizerSettings;
use order_intake_lambda::handlers::authorizer::handle_authorizer_event;
use serde_json::Value;

struct SecretsManagerProvider {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretProvider for SecretsManagerProvider {
    fn get_secret(&self, secret_name: &str) -> Result<String, String> {
        let client = self.client.clone();
        let secret_id = secret_name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .get_secret_value()
                    .secret_id(secret_id)
                    .send()
                    .await
                    .map_err(|error| format!("failed to read secret value: {error}"))?;
                output
                    .secret_string()
                    .map(str::to_string)
                    .ok_or_else(|| "secret has no string value".to_string())
            })
        })
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    secrets: &SecretCache,
    provider: &SecretsManagerProvider,
) -> Result<AuthorizerResponse, Error> {
    handle_authorizer_event(event.payload, secrets, provider).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let settings = AuthorizerSettings::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let provider = SecretsManagerProvider {
        client: aws_sdk_secretsmanager::Client::new(&aws_config),
    };
    let secrets = SecretCache::new(settings.secret_name);

    lambda_runtime::run(service_fn(|event| handle_request(event, &secrets, &provider))).await
}
