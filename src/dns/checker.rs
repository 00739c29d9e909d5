//! Domain existence checker

use std::sync::Arc;
use std::time::Instant;

use super::NameServerLookup;
use crate::types::LookupOutcome;

/// Classifies a candidate as registered, unregistered or indeterminate
#[derive(Clone)]
pub struct ExistenceChecker {
    lookup: Arc<dyn NameServerLookup>,
}

impl ExistenceChecker {
    pub fn new(lookup: Arc<dyn NameServerLookup>) -> Self {
        Self { lookup }
    }

    /// Check one domain with a single NS query
    pub async fn check(&self, domain: &str) -> LookupOutcome {
        let start = Instant::now();
        let outcome = match self.lookup.lookup_ns(domain).await {
            Ok(servers) if !servers.is_empty() => LookupOutcome::Registered,
            Ok(_) => LookupOutcome::Unregistered,
            Err(e) if e.is_not_found() => LookupOutcome::Unregistered,
            Err(e) => LookupOutcome::Indeterminate(e),
        };

        tracing::debug!(
            domain = %domain,
            resolver = self.lookup.name(),
            outcome = %outcome.kind(),
            duration_ms = %start.elapsed().as_millis(),
            "Domain check completed"
        );

        outcome
    }
}

impl std::fmt::Debug for ExistenceChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExistenceChecker")
            .field("lookup", &self.lookup.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{LookupError, LookupErrorKind};
    use async_trait::async_trait;

    struct Fixed(Result<Vec<String>, LookupError>);

    #[async_trait]
    impl NameServerLookup for Fixed {
        async fn lookup_ns(&self, _domain: &str) -> Result<Vec<String>, LookupError> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn checker(answer: Result<Vec<String>, LookupError>) -> ExistenceChecker {
        ExistenceChecker::new(Arc::new(Fixed(answer)))
    }

    #[tokio::test]
    async fn test_name_servers_mean_registered() {
        let outcome = checker(Ok(vec!["ns1.example.net.".to_string()])).check("da.ta").await;
        assert_eq!(outcome, LookupOutcome::Registered);
    }

    #[tokio::test]
    async fn test_nxdomain_means_unregistered() {
        let outcome = checker(Err(LookupError::not_found("no such host"))).check("dat.a").await;
        assert_eq!(outcome, LookupOutcome::Unregistered);
    }

    #[tokio::test]
    async fn test_empty_answer_means_unregistered() {
        let outcome = checker(Ok(Vec::new())).check("rad.io").await;
        assert_eq!(outcome, LookupOutcome::Unregistered);
    }

    #[tokio::test]
    async fn test_other_failures_are_indeterminate() {
        for kind in [LookupErrorKind::Transient, LookupErrorKind::Other] {
            // same text as the NXDOMAIN case: only the kind decides
            let err = LookupError::new(kind, "no such host");
            let outcome = checker(Err(err.clone())).check("x.io").await;
            assert_eq!(outcome, LookupOutcome::Indeterminate(err));
        }
    }
}
