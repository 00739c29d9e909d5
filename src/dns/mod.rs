//! DNS existence checking
//!
//! The checker never inspects resolver error text. Each [`NameServerLookup`]
//! implementation classifies its own failures into a [`LookupErrorKind`].

pub mod checker;
pub mod hickory;

pub use checker::ExistenceChecker;
pub use hickory::HickoryLookup;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured classification of a failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupErrorKind {
    /// NXDOMAIN: the queried name does not exist
    NotFound,
    /// Timeouts, unreachable servers, socket errors
    Transient,
    /// Refused, malformed names, server failures and the rest
    Other,
}

/// A failed lookup for one domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub message: String,
}

impl LookupError {
    pub fn new(kind: LookupErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::NotFound, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Transient, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Other, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == LookupErrorKind::NotFound
    }
}

/// Name-server lookup used by the existence checker
#[async_trait]
pub trait NameServerLookup: Send + Sync {
    /// Return the NS records of `domain`.
    ///
    /// An empty vector means the server answered without any NS records.
    async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>, LookupError>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}
