//! Domain hack discovery: candidates from words, checked by a worker pool
//!
//! [`scan`] is the whole run: load words, load TLDs, then hand both to a
//! [`Dispatcher`]. Input failures abort before anything is dispatched.

pub mod dispatcher;
pub mod generator;
pub mod sink;

pub use dispatcher::Dispatcher;
pub use generator::{generate, CandidateGenerator};
pub use sink::{MemorySink, ResultSink, StreamSink};

use std::sync::Arc;

use crate::config::ScanConfig;
use crate::dns::{ExistenceChecker, HickoryLookup, NameServerLookup};
use crate::error::Result;
use crate::sources::{load_tlds, load_words};
use crate::types::ScanSummary;

/// Run a full scan against the configured resolver
pub async fn scan(config: &ScanConfig, sink: Arc<dyn ResultSink>) -> Result<ScanSummary> {
    // Inputs first: a resolver is only built once there is work for it.
    let words = load_words(&config.words_path).await?;
    let tlds = load_tlds(&config.tld_source).await?;

    let lookup = HickoryLookup::new(config.resolver, config.dns_timeout)?;
    dispatch(config, Arc::new(lookup), sink, words, tlds).await
}

/// Run a full scan with a caller-supplied resolver
pub async fn scan_with_lookup(
    config: &ScanConfig,
    lookup: Arc<dyn NameServerLookup>,
    sink: Arc<dyn ResultSink>,
) -> Result<ScanSummary> {
    let words = load_words(&config.words_path).await?;
    let tlds = load_tlds(&config.tld_source).await?;
    dispatch(config, lookup, sink, words, tlds).await
}

async fn dispatch(
    config: &ScanConfig,
    lookup: Arc<dyn NameServerLookup>,
    sink: Arc<dyn ResultSink>,
    words: Vec<String>,
    tlds: Vec<String>,
) -> Result<ScanSummary> {
    let dispatcher = Dispatcher::new(config.dispatch.clone(), ExistenceChecker::new(lookup), sink)?;
    dispatcher.run(words, tlds).await
}
