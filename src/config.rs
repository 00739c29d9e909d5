//! Run configuration
//!
//! Values come from `DOMAIN_HACK_*` environment variables (a `.env` file is
//! honoured through [`crate::init`]). Every setting has a default, so an empty
//! environment yields a runnable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config_error;
use crate::error::Result;
use crate::sources::TldSource;
use crate::types::OutputFormat;

/// Default dictionary location on most unix systems
pub const DEFAULT_WORDS_PATH: &str = "/usr/share/dict/words";

/// IANA's list of delegated top-level domains
pub const IANA_TLD_LIST_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

pub const DEFAULT_WORKERS: usize = 100;

/// Capacity 1 is the closest a tokio channel gets to an unbuffered hand-off
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;

pub const ENV_WORDS: &str = "DOMAIN_HACK_WORDS";
pub const ENV_TLDS: &str = "DOMAIN_HACK_TLDS";
pub const ENV_WORKERS: &str = "DOMAIN_HACK_WORKERS";
pub const ENV_QUEUE_CAPACITY: &str = "DOMAIN_HACK_QUEUE_CAPACITY";
pub const ENV_DEDUPE: &str = "DOMAIN_HACK_DEDUPE";
pub const ENV_SKIP_EMPTY_LABELS: &str = "DOMAIN_HACK_SKIP_EMPTY_LABELS";
pub const ENV_RESOLVER: &str = "DOMAIN_HACK_RESOLVER";
pub const ENV_DNS_TIMEOUT_SECS: &str = "DOMAIN_HACK_DNS_TIMEOUT_SECS";
pub const ENV_FORMAT: &str = "DOMAIN_HACK_FORMAT";

/// Upstream used for NS lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverChoice {
    /// Whatever the host's resolv.conf points at
    #[default]
    System,
    Google,
    Cloudflare,
    Quad9,
}

impl std::fmt::Display for ResolverChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverChoice::System => write!(f, "system"),
            ResolverChoice::Google => write!(f, "google"),
            ResolverChoice::Cloudflare => write!(f, "cloudflare"),
            ResolverChoice::Quad9 => write!(f, "quad9"),
        }
    }
}

impl std::str::FromStr for ResolverChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(ResolverChoice::System),
            "google" => Ok(ResolverChoice::Google),
            "cloudflare" => Ok(ResolverChoice::Cloudflare),
            "quad9" => Ok(ResolverChoice::Quad9),
            other => Err(format!(
                "unknown resolver '{}' (expected system, google, cloudflare or quad9)",
                other
            )),
        }
    }
}

/// Worker pool and candidate policy for a dispatcher run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Number of concurrent workers
    pub workers: usize,
    /// Candidates that may wait in the queue before the producer blocks
    pub queue_capacity: usize,
    /// Send each distinct candidate to the pool only once
    pub dedupe: bool,
    /// Drop candidates whose label is empty (a word equal to a TLD)
    pub skip_empty_labels: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dedupe: false,
            skip_empty_labels: false,
        }
    }
}

impl DispatchConfig {
    /// Default policy with `workers` workers
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(config_error!("worker count must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(config_error!("queue capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Everything a full run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub words_path: PathBuf,
    pub tld_source: TldSource,
    pub dispatch: DispatchConfig,
    pub resolver: ResolverChoice,
    pub dns_timeout: Option<Duration>,
    pub format: OutputFormat,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            words_path: PathBuf::from(DEFAULT_WORDS_PATH),
            tld_source: TldSource::Url(IANA_TLD_LIST_URL.to_string()),
            dispatch: DispatchConfig::default(),
            resolver: ResolverChoice::default(),
            dns_timeout: None,
            format: OutputFormat::default(),
        }
    }
}

impl ScanConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_WORDS) {
            config.words_path = PathBuf::from(path.trim());
        }
        if let Some(source) = get(ENV_TLDS) {
            config.tld_source = TldSource::parse(&source);
        }
        if let Some(value) = get(ENV_WORKERS) {
            config.dispatch.workers = parse_number(ENV_WORKERS, &value)?;
        }
        if let Some(value) = get(ENV_QUEUE_CAPACITY) {
            config.dispatch.queue_capacity = parse_number(ENV_QUEUE_CAPACITY, &value)?;
        }
        if let Some(value) = get(ENV_DEDUPE) {
            config.dispatch.dedupe = parse_flag(ENV_DEDUPE, &value)?;
        }
        if let Some(value) = get(ENV_SKIP_EMPTY_LABELS) {
            config.dispatch.skip_empty_labels = parse_flag(ENV_SKIP_EMPTY_LABELS, &value)?;
        }
        if let Some(value) = get(ENV_RESOLVER) {
            config.resolver = value
                .parse()
                .map_err(|e| config_error!("{}: {}", ENV_RESOLVER, e))?;
        }
        if let Some(value) = get(ENV_DNS_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_DNS_TIMEOUT_SECS, &value)?;
            config.dns_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(value) = get(ENV_FORMAT) {
            config.format = value
                .parse()
                .map_err(|e| config_error!("{}: {}", ENV_FORMAT, e))?;
        }

        config.dispatch.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| config_error!("{} must be a non-negative integer, got '{}'", key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config_error!("{} must be a boolean, got '{}'", key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ScanConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScanConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ScanConfig::default());
        assert_eq!(config.dispatch.workers, 100);
        assert_eq!(config.tld_source, TldSource::Url(IANA_TLD_LIST_URL.to_string()));
        assert!(!config.dispatch.dedupe);
        assert!(!config.dispatch.skip_empty_labels);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (ENV_WORDS, "/tmp/words.txt"),
            (ENV_TLDS, "./tlds.txt"),
            (ENV_WORKERS, "8"),
            (ENV_DEDUPE, "yes"),
            (ENV_SKIP_EMPTY_LABELS, "1"),
            (ENV_RESOLVER, "Quad9"),
            (ENV_DNS_TIMEOUT_SECS, "3"),
            (ENV_FORMAT, "json"),
        ])
        .unwrap();

        assert_eq!(config.words_path, PathBuf::from("/tmp/words.txt"));
        assert_eq!(config.tld_source, TldSource::File(PathBuf::from("./tlds.txt")));
        assert_eq!(config.dispatch.workers, 8);
        assert!(config.dispatch.dedupe);
        assert!(config.dispatch.skip_empty_labels);
        assert_eq!(config.resolver, ResolverChoice::Quad9);
        assert_eq!(config.dns_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = load(&[(ENV_WORKERS, "  ")]).unwrap();
        assert_eq!(config.dispatch.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[(ENV_WORKERS, "many")]).is_err());
        assert!(load(&[(ENV_WORKERS, "0")]).is_err());
        assert!(load(&[(ENV_QUEUE_CAPACITY, "0")]).is_err());
        assert!(load(&[(ENV_DEDUPE, "maybe")]).is_err());
        assert!(load(&[(ENV_RESOLVER, "opendns")]).is_err());
        assert!(load(&[(ENV_FORMAT, "xml")]).is_err());
    }
}
