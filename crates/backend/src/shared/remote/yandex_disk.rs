use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{RemoteError, RemoteFolder, RemoteItem};
use crate::shared::config::YandexDiskConfig;

/// HTTP-клиент для публичных ресурсов Яндекс.Диска
/// Docs: https://yandex.ru/dev/disk/poligon/
pub struct YandexDiskClient {
    client: reqwest::Client,
    api_base: String,
    public_link: String,
    listing_limit: u32,
    metadata_timeout: Duration,
    download_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct DownloadLinkResponse {
    #[serde(default)]
    href: Option<String>,
}

/// Одна страница списка файлов
#[derive(Debug, Default, PartialEq)]
struct ListingPage {
    items: Vec<RemoteItem>,
    /// Сколько элементов вернул сервер (включая нераспознанные)
    returned: usize,
    total: Option<usize>,
}

impl YandexDiskClient {
    pub fn new(config: &YandexDiskConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tender-registry/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            public_link: config.public_link.clone(),
            listing_limit: config.listing_limit.max(1),
            metadata_timeout: config.metadata_timeout(),
            download_timeout: config.download_timeout(),
        })
    }

    /// GET /v1/disk/public/resources
    async fn fetch_listing_page(&self, offset: usize) -> Result<ListingPage, RemoteError> {
        let url = format!("{}/v1/disk/public/resources", self.api_base);
        let limit = self.listing_limit.to_string();
        let offset = offset.to_string();

        tracing::debug!("Yandex.Disk listing: GET {} offset={}", url, offset);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("public_key", self.public_link.as_str()),
                ("path", "/"),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .timeout(self.metadata_timeout)
            .send()
            .await?;

        let body: Value = ensure_success(&url, response).await?.json().await?;
        Ok(parse_listing(&body))
    }

    /// GET /v1/disk/public/resources/download → одноразовая ссылка
    async fn resolve_download_href(&self, path: &str) -> Result<String, RemoteError> {
        let url = format!("{}/v1/disk/public/resources/download", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[("public_key", self.public_link.as_str()), ("path", path)])
            .timeout(self.metadata_timeout)
            .send()
            .await?;

        let link: DownloadLinkResponse = ensure_success(&url, response).await?.json().await?;
        link.href
            .filter(|href| !href.trim().is_empty())
            .ok_or_else(|| RemoteError::MissingHref(path.to_string()))
    }
}

#[async_trait]
impl RemoteFolder for YandexDiskClient {
    async fn list_files(&self) -> Result<Vec<RemoteItem>, RemoteError> {
        let mut items = Vec::new();
        let mut offset = 0usize;

        loop {
            let page = self.fetch_listing_page(offset).await?;
            offset += page.returned;
            items.extend(page.items);

            let reached_total = page.total.map(|t| offset >= t).unwrap_or(true);
            if page.returned < self.listing_limit as usize || reached_total {
                break;
            }
        }

        tracing::info!("Yandex.Disk listing: {} items", items.len());
        Ok(items)
    }

    async fn fetch_file(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        let href = self.resolve_download_href(path).await?;
        let response = self
            .client
            .get(&href)
            .timeout(self.download_timeout)
            .send()
            .await?;
        let bytes = ensure_success(path, response).await?.bytes().await?;
        tracing::debug!("Downloaded {} ({} bytes)", path, bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Ответ не 2xx → `RemoteError::Status` с телом ответа
pub(super) async fn ensure_success(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(500).collect();
    Err(RemoteError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Разбор `_embedded.items`; элементы, не являющиеся объектами, пропускаются
fn parse_listing(body: &Value) -> ListingPage {
    let embedded = match body.get("_embedded") {
        Some(embedded) => embedded,
        None => return ListingPage::default(),
    };
    let raw_items = embedded
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let items = raw_items
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value::<RemoteItem>(v.clone()).ok())
        .collect();

    ListingPage {
        items,
        returned: raw_items.len(),
        total: embedded
            .get("total")
            .and_then(Value::as_u64)
            .map(|t| t as usize),
    }
}
