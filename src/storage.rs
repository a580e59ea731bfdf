use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use bytes::Bytes;

/// An object fetched from the bucket, ready to stream back to the client.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>>;
    async fn check(&self) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>> {
        let out = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(anyhow::Error::new(service_err).context("s3 get_object"));
            }
        };

        let content_type = out.content_type().map(str::to_string);
        let etag = out.e_tag().map(str::to_string);
        let body = out
            .body
            .collect()
            .await
            .context("read s3 object body")?
            .into_bytes();

        Ok(Some(StoredObject {
            body,
            content_type,
            etag,
        }))
    }

    async fn check(&self) -> anyhow::Result<()> {
        self.client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await
            .context("s3 list_objects_v2")?;
        Ok(())
    }
}
