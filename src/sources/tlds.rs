//! Known top-level domains

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::split_lines_with_comments;
use crate::error::{DomainHackError, InputSource, Result};

/// Where the TLD list comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TldSource {
    /// Fetched over HTTP(S)
    Url(String),
    /// Read from a local file
    File(PathBuf),
}

impl TldSource {
    /// `http://` and `https://` values are URLs, anything else is a path
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let lower = value.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            TldSource::Url(value.to_string())
        } else {
            TldSource::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for TldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TldSource::Url(url) => write!(f, "{}", url),
            TldSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load the TLD list from either kind of source
pub async fn load_tlds(source: &TldSource) -> Result<Vec<String>> {
    let tlds = match source {
        TldSource::Url(url) => {
            let client = Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(concat!("domain-hack/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| {
                    DomainHackError::input(InputSource::Tlds, e.to_string(), Some(url.clone()))
                })?;
            fetch_tlds(&client, url).await?
        }
        TldSource::File(path) => {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                DomainHackError::input(
                    InputSource::Tlds,
                    e.to_string(),
                    Some(path.to_string_lossy().to_string()),
                )
            })?;
            split_lines_with_comments(&content)
        }
    };

    tracing::info!(source = %source, tlds = tlds.len(), "TLD list loaded");
    Ok(tlds)
}

/// Fetch a newline-delimited TLD list over HTTP
pub async fn fetch_tlds(client: &Client, url: &str) -> Result<Vec<String>> {
    let fetch = async {
        let response = client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok::<_, DomainHackError>(split_lines_with_comments(&body))
    };

    fetch.await.map_err(|e| e.into_input(InputSource::Tlds))
}
