//! NS lookups through hickory-resolver

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;

use super::{LookupError, NameServerLookup};
use crate::config::ResolverChoice;
use crate::error::{DomainHackError, Result};

/// [`NameServerLookup`] backed by a tokio hickory resolver
pub struct HickoryLookup {
    resolver: TokioAsyncResolver,
}

impl HickoryLookup {
    /// Build a resolver for the chosen upstream.
    ///
    /// `timeout` overrides the per-query timeout of the resolver options.
    pub fn new(choice: ResolverChoice, timeout: Option<Duration>) -> Result<Self> {
        let (config, mut opts) = match choice {
            ResolverChoice::System => hickory_resolver::system_conf::read_system_conf()
                .map_err(|e| {
                    DomainHackError::config(format!("Failed to read system resolver config: {}", e))
                })?,
            ResolverChoice::Google => (ResolverConfig::google(), ResolverOpts::default()),
            ResolverChoice::Cloudflare => (ResolverConfig::cloudflare(), ResolverOpts::default()),
            ResolverChoice::Quad9 => (ResolverConfig::quad9(), ResolverOpts::default()),
        };

        if let Some(timeout) = timeout {
            opts.timeout = timeout;
        }

        tracing::debug!(
            resolver = %choice,
            timeout_ms = %opts.timeout.as_millis(),
            "DNS resolver configured"
        );

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }
}

#[async_trait]
impl NameServerLookup for HickoryLookup {
    async fn lookup_ns(&self, domain: &str) -> std::result::Result<Vec<String>, LookupError> {
        // Fully qualified so resolv.conf search domains are never appended.
        let fqdn = if domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{}.", domain)
        };

        match self.resolver.ns_lookup(fqdn.as_str()).await {
            Ok(lookup) => Ok(lookup.iter().map(|ns| ns.to_string()).collect()),
            Err(e) => classify(e.kind()),
        }
    }

    fn name(&self) -> &'static str {
        "hickory"
    }
}

/// Map a resolver failure onto the lookup taxonomy.
///
/// A negative answer with NOERROR (the name exists but has no NS set) is
/// an empty answer rather than an error.
fn classify(kind: &ResolveErrorKind) -> std::result::Result<Vec<String>, LookupError> {
    let message = kind.to_string();
    match kind {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => Err(LookupError::not_found(message)),
            ResponseCode::NoError => Ok(Vec::new()),
            _ => Err(LookupError::other(message)),
        },
        ResolveErrorKind::Timeout | ResolveErrorKind::NoConnections | ResolveErrorKind::Io(_) => {
            Err(LookupError::transient(message))
        }
        ResolveErrorKind::Proto(proto) => match proto.kind() {
            ProtoErrorKind::Timeout | ProtoErrorKind::Io(_) => Err(LookupError::transient(message)),
            _ => Err(LookupError::other(message)),
        },
        _ => Err(LookupError::other(message)),
    }
}
