pub mod http_file;
pub mod yandex_disk;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use http_file::HttpFileSource;
pub use yandex_disk::YandexDiskClient;

/// Ошибки обращения к удаленным сервисам
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("no download href returned for path {0}")]
    MissingHref(String),

    #[error("unexpected response format: {0}")]
    Decode(String),
}

/// Элемент публичной папки
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
}

impl RemoteItem {
    /// Файл Excel (по расширению); вложенные папки не считаются
    pub fn is_spreadsheet(&self) -> bool {
        if self.item_type.as_deref() == Some("dir") {
            return false;
        }
        let name = self.name.to_lowercase();
        name.ends_with(".xlsx") || name.ends_with(".xls")
    }
}

/// Папка с файлами закупок
#[async_trait]
pub trait RemoteFolder: Send + Sync {
    /// Все элементы папки
    async fn list_files(&self) -> Result<Vec<RemoteItem>, RemoteError>;

    /// Содержимое файла по пути из списка
    async fn fetch_file(&self, path: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Источник файла привязки населенных пунктов к филиалам
#[async_trait]
pub trait MappingSource: Send + Sync {
    async fn fetch_mapping(&self) -> Result<Vec<u8>, RemoteError>;
}
