use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use threadle_core::DEFAULT_CHANNEL;

const APP_DIR: &str = "threadle";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_CAP: u32 = 100;
pub const MAX_PAGE_CAP: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_TOKEN_ENV: &str = "THREADLE_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub search: SearchConfig,
}

/// Connection settings for the remote conversation API.
///
/// Every field except the timeouts is optional here; the HTTP source rejects
/// incomplete settings before the first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub account_id: Option<u64>,
    pub api_token: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub page_size: u32,
    pub page_cap: u32,
    pub channels: Vec<String>,
    pub deadline_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                base_url: None,
                account_id: None,
                api_token: None,
                user_agent: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            search: SearchConfig {
                page_size: DEFAULT_PAGE_SIZE,
                page_cap: DEFAULT_PAGE_CAP,
                channels: vec![DEFAULT_CHANNEL.to_string()],
                deadline_secs: None,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid page_size value: {0}")]
    InvalidPageSize(u32),
    #[error("invalid page_cap value: {0}")]
    InvalidPageCap(u32),
    #[error("invalid deadline_secs value: {0}")]
    InvalidDeadline(u64),
    #[error("invalid source.{field}: {message}")]
    InvalidSourceField {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source: Option<SourceFile>,
    search: Option<SearchFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceFile {
    base_url: Option<String>,
    account_id: Option<u64>,
    api_token: Option<String>,
    api_token_env: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchFile {
    page_size: Option<u32>,
    page_cap: Option<u32>,
    channels: Option<Vec<String>>,
    deadline_secs: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return without_file(),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return without_file(),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => without_file(),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

// Even without a file the token may come from the environment.
fn without_file() -> Result<AppConfig> {
    merge_config(ConfigFile::default())
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    let source = parsed.source.unwrap_or_default();
    if let Some(base_url) = non_blank(source.base_url) {
        config.source.base_url = Some(base_url.trim_end_matches('/').to_string());
    }
    if let Some(account_id) = source.account_id {
        if account_id == 0 {
            return Err(ConfigError::InvalidSourceField {
                field: "account_id",
                message: "must be positive".to_string(),
            });
        }
        config.source.account_id = Some(account_id);
    }
    let token_env = match source.api_token_env {
        Some(name) if name.trim().is_empty() => {
            return Err(ConfigError::InvalidSourceField {
                field: "api_token_env",
                message: "cannot be empty".to_string(),
            });
        }
        Some(name) => name.trim().to_string(),
        None => DEFAULT_API_TOKEN_ENV.to_string(),
    };
    config.source.api_token =
        non_blank(source.api_token).or_else(|| non_blank(env::var(&token_env).ok()));
    config.source.user_agent = non_blank(source.user_agent);
    if let Some(secs) = source.timeout_secs {
        config.source.timeout_secs = positive_secs("timeout_secs", secs)?;
    }
    if let Some(secs) = source.connect_timeout_secs {
        config.source.connect_timeout_secs = positive_secs("connect_timeout_secs", secs)?;
    }

    if let Some(search) = parsed.search {
        if let Some(page_size) = search.page_size {
            config.search.page_size = validate_page_size(page_size)?;
        }
        if let Some(page_cap) = search.page_cap {
            config.search.page_cap = validate_page_cap(page_cap)?;
        }
        if let Some(channels) = search.channels {
            config.search.channels = channels
                .into_iter()
                .filter_map(|channel| non_blank(Some(channel)))
                .collect();
        }
        if let Some(deadline) = search.deadline_secs {
            if deadline == 0 {
                return Err(ConfigError::InvalidDeadline(deadline));
            }
            config.search.deadline_secs = Some(deadline);
        }
    }

    Ok(config)
}

pub fn validate_page_size(value: u32) -> Result<u32> {
    if value == 0 || value > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidPageSize(value));
    }
    Ok(value)
}

pub fn validate_page_cap(value: u32) -> Result<u32> {
    if value == 0 || value > MAX_PAGE_CAP {
        return Err(ConfigError::InvalidPageCap(value));
    }
    Ok(value)
}

fn positive_secs(field: &'static str, secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(ConfigError::InvalidSourceField {
            field,
            message: "must be positive".to_string(),
        });
    }
    Ok(secs)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
