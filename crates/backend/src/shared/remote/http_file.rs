use async_trait::async_trait;
use std::time::Duration;

use super::yandex_disk::ensure_success;
use super::{MappingSource, RemoteError};
use crate::shared::config::MappingConfig;

/// Файл, доступный обычным GET-запросом (raw.githubusercontent.com и т.п.)
pub struct HttpFileSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpFileSource {
    pub fn new(config: &MappingConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            url: config.url.clone(),
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl MappingSource for HttpFileSource {
    async fn fetch_mapping(&self) -> Result<Vec<u8>, RemoteError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;
        let bytes = ensure_success(&self.url, response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
