//! Client configuration (environment-driven).

use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "https://dev-diaries-api.onrender.com";

pub const API_URL_ENV: &str = "DEVDIARIES_API_URL";
pub const STORAGE_PATH_ENV: &str = "DEVDIARIES_STORAGE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base endpoint of the remote store, without a trailing slash.
    pub api_url: String,
    /// File holding the persisted credential.
    pub storage_path: PathBuf,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            storage_path: storage_path.into(),
        }
    }

    /// Read `DEVDIARIES_API_URL` and `DEVDIARIES_STORAGE_PATH`, falling back
    /// to the hosted API and the OS data directory.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let storage_path = match std::env::var(STORAGE_PATH_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_storage_path()?,
        };

        Ok(Self::new(api_url, storage_path))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(api_url.into());
        self
    }

    pub fn with_storage_path(mut self, storage_path: impl Into<PathBuf>) -> Self {
        self.storage_path = storage_path.into();
        self
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `{app_data_dir}/devdiaries/storage.json`.
fn default_storage_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("devdiaries");
    path.push("storage.json");
    Ok(path)
}
