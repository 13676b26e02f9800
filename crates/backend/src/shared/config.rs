use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub yandex_disk: YandexDiskConfig,
    pub mapping: MappingConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Публичная папка Яндекс.Диска с файлами закупок
#[derive(Debug, Deserialize, Clone)]
pub struct YandexDiskConfig {
    pub public_link: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_listing_limit")]
    pub listing_limit: u32,
    /// Таймаут запросов метаданных (список файлов, ссылка на скачивание)
    #[serde(default = "default_metadata_timeout")]
    pub metadata_timeout_secs: u64,
    /// Таймаут скачивания самого файла
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

/// Файл привязки населенных пунктов к филиалам
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    pub url: String,
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl YandexDiskConfig {
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl MappingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        let hours = if self.interval_hours.is_finite() && self.interval_hours > 0.0 {
            self.interval_hours
        } else {
            default_interval_hours()
        };
        Duration::from_secs_f64(hours * 3600.0)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_api_base() -> String {
    "https://cloud-api.yandex.net".to_string()
}

fn default_listing_limit() -> u32 {
    1000
}

fn default_metadata_timeout() -> u64 {
    60
}

fn default_download_timeout() -> u64 {
    120
}

fn default_interval_hours() -> f64 {
    24.0
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[yandex_disk]
public_link = "https://disk.yandex.ru/d/sbXFGWQRkrFssA"

[mapping]
url = "https://raw.githubusercontent.com/Anatoliy031/KK-Adigeya/main/Privyazka.xlsx"

[refresh]
interval_hours = 24

[server]
host = "0.0.0.0"
port = 5000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Current working directory
/// 3. Embedded default config
///
/// Environment variables are applied on top.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match find_config_file() {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            toml::from_str(DEFAULT_CONFIG)?
        }
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn find_config_file() -> Option<PathBuf> {
    let next_to_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("config.toml")));

    let in_cwd = std::env::current_dir()
        .ok()
        .map(|dir| dir.join("config.toml"));

    for candidate in [next_to_exe, in_cwd].into_iter().flatten() {
        if candidate.exists() {
            return Some(candidate);
        }
        tracing::debug!("config.toml not found at: {}", candidate.display());
    }
    None
}

/// Переопределения из переменных окружения
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(link) = lookup("YDX_PUBLIC_LINK").filter(|v| !v.trim().is_empty()) {
        config.yandex_disk.public_link = link;
    }
    if let Some(url) = lookup("PRIVYAZKA_URL").filter(|v| !v.trim().is_empty()) {
        config.mapping.url = url;
    }
    if let Some(port) = lookup("PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
        }
    }
    if let Some(hours) = lookup("REFRESH_INTERVAL_HOURS") {
        match hours.trim().parse::<f64>() {
            Ok(hours) if hours > 0.0 => config.refresh.interval_hours = hours,
            _ => tracing::warn!("Ignoring invalid REFRESH_INTERVAL_HOURS value: {}", hours),
        }
    }
}
