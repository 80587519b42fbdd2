use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_intake_core::contract::ArchiveResponse;
use order_intake_lambda::adapters::object_store::{ObjectEncryption, ObjectStore, ObjectWrite};
use order_intake_lambda::config::ArchiverSettings;
use order_intake_lambda::handlers::archiver::{handle_archive_event, ArchiverConfig};
use serde_json::Value;

struct S3OrderStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl ObjectStore for S3OrderStore {
    fn put_object(&self, object: &ObjectWrite) -> Result<(), String> {
        let bucket = self.bucket.clone();
        let object = object.clone();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object.key)
                    .body(ByteStream::from(object.body))
                    .content_type(object.content_type)
                    .server_side_encryption(s3_encryption(object.encryption))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write object to s3: {error}"))
            })
        })
    }
}

fn s3_encryption(encryption: ObjectEncryption) -> ServerSideEncryption {
    match encryption {
        ObjectEncryption::Aes256 => ServerSideEncryption::Aes256,
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    settings: &ArchiverSettings,
    store: &S3OrderStore,
) -> Result<ArchiveResponse, Error> {
    let config = ArchiverConfig {
        bucket: settings.bucket.clone(),
        key_prefix: settings.key_prefix.clone(),
        written_at: Utc::now(),
    };

    handle_archive_event(event.payload, &config, store).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let settings = ArchiverSettings::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3OrderStore {
        bucket: settings.bucket.clone(),
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &settings, &store))).await
}
