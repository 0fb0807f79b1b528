use crate::config::ConfigStore;
use log::LevelFilter;

/// Everything a command needs from the environment, resolved once at start.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl AppSettings {
    pub fn load(store: &ConfigStore) -> anyhow::Result<Self> {
        Ok(Self {
            api_key: store.api_key()?,
            base_url: store.base_url()?,
        })
    }

    /// Filter string for env_logger when `RUST_LOG` is unset.
    pub fn log_filter(debug: bool) -> String {
        let level = if debug { LevelFilter::Debug } else { LevelFilter::Warn };
        level.to_string().to_lowercase()
    }
}
