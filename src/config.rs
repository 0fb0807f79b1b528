use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "SPORTY_API_KEY";
pub const BASE_URL_ENV: &str = "SPORTY_BASE_URL";
pub const CONFIG_PATH_ENV: &str = "SPORTY_CONFIG";

/// Contents of `config.json`. Keys this version doesn't know about are
/// carried through untouched on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flat JSON key-value file, `~/.sporty/config.json` unless `SPORTY_CONFIG`
/// points elsewhere.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn locate() -> Self {
        Self::at(default_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or empty file reads as an empty config. So does a corrupt
    /// one, after a warning, so `config set-api-key` can still overwrite it.
    pub fn load(&self) -> anyhow::Result<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("could not read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!(target: "sporty::config", "ignoring invalid config json at {}: {e}", self.path.display());
                Ok(ConfigFile::default())
            }
        }
    }

    pub fn save(&self, config: &ConfigFile) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
        }
        let body = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, body).with_context(|| format!("could not write {}", self.path.display()))
    }

    pub fn set_api_key(&self, key: &str) -> anyhow::Result<()> {
        let mut config = self.load()?;
        config.api_key = Some(key.trim().to_owned());
        self.save(&config)
    }

    /// `SPORTY_API_KEY` first, then the file.
    pub fn api_key(&self) -> anyhow::Result<Option<String>> {
        if let Some(key) = non_empty_env(API_KEY_ENV) {
            return Ok(Some(key));
        }
        Ok(self.load()?.api_key.filter(|k| !k.trim().is_empty()))
    }

    /// `SPORTY_BASE_URL` first, then the file, then the public endpoint.
    pub fn base_url(&self) -> anyhow::Result<String> {
        if let Some(url) = non_empty_env(BASE_URL_ENV) {
            return Ok(url);
        }
        Ok(self
            .load()?
            .base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| football_api::DEFAULT_BASE_URL.to_owned()))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".sporty").join("config.json");
    }
    PathBuf::from(".sporty").join("config.json")
}

/// `abcd****wxyz` for keys longer than eight characters, `****` otherwise.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".into();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
}
