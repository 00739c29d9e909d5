//! Domain Hack - find unregistered domain hacks
//!
//! Splits dictionary words on every known top-level domain that ends them
//! (`radio` becomes `rad.io`) and asks the DNS which of those names do not
//! exist yet.

pub mod config;
pub mod dns;
pub mod error;
pub mod hack;
pub mod sources;
pub mod trie;
pub mod types;

// Re-export commonly used types
pub use config::{DispatchConfig, ResolverChoice, ScanConfig};
pub use dns::{ExistenceChecker, LookupError, LookupErrorKind, NameServerLookup};
pub use error::{DomainHackError, InputSource, Result};
pub use hack::{
    scan, scan_with_lookup, CandidateGenerator, Dispatcher, MemorySink, ResultSink, StreamSink,
};
pub use trie::{SuffixTrie, SuffixTrieBuilder};
pub use types::{LookupOutcome, OutcomeKind, OutputFormat, ScanPhase, ScanSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
