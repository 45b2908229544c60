use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the user_info client module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserInfoClientConfig {
    /// Base URL of the user-infos resource, including the service prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size requested by the list view.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Default sort field for the list view.
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
}

impl Default for UserInfoClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            sort_field: default_sort_field(),
            request_timeout_sec: default_request_timeout_sec(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8087/services/userservice/api/user-infos".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_sort_field() -> String {
    "id".to_string()
}

fn default_request_timeout_sec() -> u64 {
    30
}

impl UserInfoClientConfig {
    /// Load configuration with layered loading: defaults → YAML file →
    /// environment variables.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: USER_INFO__BASE_URL=http://host/api/user-infos
            .merge(Env::prefixed("USER_INFO__").split("__"));

        figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Ok(Self::default()),
        }
    }
}
