//! Worker pool that checks every candidate exactly once
//!
//! One producer (the caller of [`Dispatcher::run`]) generates candidates and
//! pushes them into a bounded queue. `workers` tasks share the receiving end
//! and pull one candidate at a time. Closing the sender is the completion
//! signal; joining every worker is the barrier that ends the run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::generator::CandidateGenerator;
use super::sink::ResultSink;
use crate::config::DispatchConfig;
use crate::dns::ExistenceChecker;
use crate::error::{DomainHackError, Result};
use crate::trie::SuffixTrie;
use crate::types::{LookupOutcome, ScanMetrics, ScanPhase, ScanSummary};

type SharedQueue = Arc<tokio::sync::Mutex<mpsc::Receiver<String>>>;

/// Runs one scan: build the trie, fan candidates out, drain, done
pub struct Dispatcher {
    config: DispatchConfig,
    checker: ExistenceChecker,
    sink: Arc<dyn ResultSink>,
    metrics: Arc<ScanMetrics>,
    phase: Mutex<ScanPhase>,
}

impl Dispatcher {
    /// Create an idle dispatcher; fails if the pool configuration is unusable
    pub fn new(
        config: DispatchConfig,
        checker: ExistenceChecker,
        sink: Arc<dyn ResultSink>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            checker,
            sink,
            metrics: Arc::new(ScanMetrics::new()),
            phase: Mutex::new(ScanPhase::Idle),
        })
    }

    pub fn phase(&self) -> ScanPhase {
        *self.phase.lock()
    }

    /// Live counters, readable while a run is in progress
    pub fn metrics(&self) -> Arc<ScanMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Execute the run.
    ///
    /// The trie is built from `tlds` before any worker starts. A dispatcher
    /// runs once; calling this again returns an error without checking
    /// anything.
    pub async fn run<W, T>(&self, words: W, tlds: T) -> Result<ScanSummary>
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        {
            let mut phase = self.phase.lock();
            if *phase != ScanPhase::Idle {
                return Err(DomainHackError::internal(format!(
                    "dispatcher cannot run from phase '{}'",
                    *phase
                )));
            }
            *phase = ScanPhase::Building;
        }
        let start = Instant::now();

        let trie: SuffixTrie = tlds.into_iter().collect();
        tracing::info!(tlds = trie.len(), nodes = trie.node_count(), "Suffix trie built");

        self.enter(ScanPhase::Dispatching);
        let (tx, rx) = mpsc::channel::<String>(self.config.queue_capacity);
        let queue: SharedQueue = Arc::new(tokio::sync::Mutex::new(rx));

        let handles: Vec<_> = (0..self.config.workers)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    Arc::clone(&queue),
                    self.checker.clone(),
                    Arc::clone(&self.sink),
                    Arc::clone(&self.metrics),
                ))
            })
            .collect();
        tracing::info!(workers = handles.len(), "Worker pool started");

        let generator =
            CandidateGenerator::new(&trie).skip_empty_labels(self.config.skip_empty_labels);
        let mut seen: HashSet<String> = HashSet::new();
        let mut pool_alive = true;

        'words: for word in words {
            self.metrics.increment_words();
            for candidate in generator.candidates(word.as_ref()) {
                if self.config.dedupe && !seen.insert(candidate.clone()) {
                    self.metrics.increment_duplicates();
                    continue;
                }
                // Blocks while the queue is full, which throttles generation
                // to the pace of the pool.
                if tx.send(candidate).await.is_err() {
                    pool_alive = false;
                    break 'words;
                }
                self.metrics.increment_candidates();
            }
        }

        self.enter(ScanPhase::Draining);
        drop(tx);

        let mut failed = 0usize;
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                failed += 1;
                tracing::error!(error = %e, "Worker task failed");
            }
        }

        self.enter(ScanPhase::Done);
        self.sink.finish();

        if failed > 0 || !pool_alive {
            return Err(DomainHackError::internal(format!(
                "{} of {} workers failed before the queue drained",
                failed, self.config.workers
            )));
        }

        let summary = self
            .metrics
            .summary(trie.len(), self.config.workers, start.elapsed());
        tracing::info!(
            words = summary.words,
            candidates = summary.candidates,
            unregistered = summary.unregistered,
            registered = summary.registered,
            indeterminate = summary.indeterminate,
            elapsed_ms = %summary.elapsed.as_millis(),
            "Scan completed"
        );
        Ok(summary)
    }

    fn enter(&self, next: ScanPhase) {
        let mut phase = self.phase.lock();
        let previous = *phase;
        *phase = next;
        tracing::debug!(from = %previous, to = %next, "Dispatcher phase change");
    }
}

/// Pull candidates until the queue is closed and empty
async fn worker(
    id: usize,
    queue: SharedQueue,
    checker: ExistenceChecker,
    sink: Arc<dyn ResultSink>,
    metrics: Arc<ScanMetrics>,
) {
    loop {
        // The lock is released before the lookup so other workers can take
        // the next candidate while this one waits on the network.
        let next = queue.lock().await.recv().await;
        let Some(domain) = next else {
            break;
        };

        let outcome = checker.check(&domain).await;
        metrics.record(outcome.kind());
        match outcome {
            LookupOutcome::Registered => {}
            LookupOutcome::Unregistered => sink.unregistered(&domain),
            LookupOutcome::Indeterminate(error) => {
                // The sink owns the user-facing line for this failure.
                tracing::debug!(
                    domain = %domain,
                    kind = ?error.kind,
                    error = %error,
                    "Lookup failed"
                );
                sink.indeterminate(&domain, &error);
            }
        }
    }
    tracing::debug!(worker = id, "Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{LookupError, NameServerLookup};
    use crate::hack::sink::MemorySink;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Scripted resolver that also counts how often each name is asked for
    #[derive(Default)]
    struct ScriptedLookup {
        answers: HashMap<String, std::result::Result<Vec<String>, LookupError>>,
        calls: Mutex<HashMap<String, usize>>,
        delay: Option<Duration>,
    }

    impl ScriptedLookup {
        fn answer(
            mut self,
            domain: &str,
            answer: std::result::Result<Vec<String>, LookupError>,
        ) -> Self {
            self.answers.insert(domain.to_string(), answer);
            self
        }

        fn calls(&self) -> HashMap<String, usize> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl NameServerLookup for ScriptedLookup {
        async fn lookup_ns(&self, domain: &str) -> std::result::Result<Vec<String>, LookupError> {
            *self.calls.lock().entry(domain.to_string()).or_default() += 1;
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
            self.answers
                .get(domain)
                .cloned()
                .unwrap_or_else(|| Ok(vec!["ns1.example.".to_string()]))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn build(
        config: DispatchConfig,
        lookup: Arc<ScriptedLookup>,
    ) -> (Dispatcher, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let dispatcher =
            Dispatcher::new(config, ExistenceChecker::new(lookup), sink.clone()).unwrap();
        (dispatcher, sink)
    }

    #[tokio::test]
    async fn test_outcomes_routed_to_sinks() {
        let lookup = Arc::new(
            ScriptedLookup::default()
                .answer("dat.a", Err(LookupError::not_found("no such host")))
                .answer("da.ta", Ok(vec!["ns1.nic.ta.".to_string()]))
                .answer("rad.io", Err(LookupError::transient("request timed out"))),
        );
        let (dispatcher, sink) = build(DispatchConfig::with_workers(4), lookup.clone());

        let summary = dispatcher
            .run(["data", "radio", "apple"], ["a", "ta", "io"])
            .await
            .unwrap();

        assert_eq!(sink.unregistered_domains(), vec!["dat.a"]);
        assert_eq!(sink.error_lines(), vec!["rad.io: request timed out"]);
        assert_eq!(summary.words, 3);
        assert_eq!(summary.candidates, 3);
        assert_eq!(summary.registered, 1);
        assert_eq!(summary.unregistered, 1);
        assert_eq!(summary.indeterminate, 1);
        assert_eq!(lookup.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_every_candidate_checked_exactly_once() {
        let words: Vec<String> = (0..200).map(|i| format!("word{i}io")).collect();

        for workers in [1, 2, 7, 64, 300] {
            let lookup = Arc::new(ScriptedLookup::default());
            let (dispatcher, _sink) = build(DispatchConfig::with_workers(workers), lookup.clone());

            let summary = dispatcher.run(&words, ["io"]).await.unwrap();

            assert_eq!(summary.candidates, 200, "workers={workers}");
            assert_eq!(summary.outcomes(), 200, "workers={workers}");
            let calls = lookup.calls();
            assert_eq!(calls.len(), 200);
            assert!(calls.values().all(|&n| n == 1));
        }
    }

    #[tokio::test]
    async fn test_slow_lookups_do_not_drop_candidates() {
        let lookup = Arc::new(ScriptedLookup {
            delay: Some(Duration::from_millis(5)),
            ..Default::default()
        });
        let config = DispatchConfig {
            workers: 3,
            queue_capacity: 2,
            ..Default::default()
        };
        let (dispatcher, _sink) = build(config, lookup.clone());

        let words: Vec<String> = (0..30).map(|i| format!("w{i}a")).collect();
        let summary = dispatcher.run(&words, ["a"]).await.unwrap();
        assert_eq!(summary.outcomes(), 30);
        assert_eq!(lookup.calls().values().sum::<usize>(), 30);
    }

    #[tokio::test]
    async fn test_duplicates_dispatched_unless_deduped() {
        // the second "radio" yields "rad.io" again
        let words = ["radio", "radio", "audio"];

        let lookup = Arc::new(ScriptedLookup::default());
        let (dispatcher, _) = build(DispatchConfig::with_workers(2), lookup.clone());
        let summary = dispatcher.run(words, ["io"]).await.unwrap();
        assert_eq!(summary.candidates, 3);
        assert_eq!(lookup.calls()["rad.io"], 2);

        let lookup = Arc::new(ScriptedLookup::default());
        let config = DispatchConfig {
            dedupe: true,
            ..DispatchConfig::with_workers(2)
        };
        let (dispatcher, _) = build(config, lookup.clone());
        let summary = dispatcher.run(words, ["io"]).await.unwrap();
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.duplicates_skipped, 1);
        assert_eq!(lookup.calls()["rad.io"], 1);
    }

    #[tokio::test]
    async fn test_empty_label_policy() {
        let lookup = Arc::new(ScriptedLookup::default());
        let (dispatcher, _) = build(DispatchConfig::with_workers(2), lookup.clone());
        dispatcher.run(["io"], ["io"]).await.unwrap();
        assert!(lookup.calls().contains_key(".io"));

        let lookup = Arc::new(ScriptedLookup::default());
        let config = DispatchConfig {
            skip_empty_labels: true,
            ..DispatchConfig::with_workers(2)
        };
        let (dispatcher, _) = build(config, lookup.clone());
        let summary = dispatcher.run(["io"], ["io"]).await.unwrap();
        assert_eq!(summary.candidates, 0);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_phases_and_single_use() {
        let lookup = Arc::new(ScriptedLookup::default());
        let (dispatcher, _) = build(DispatchConfig::with_workers(1), lookup);
        assert_eq!(dispatcher.phase(), ScanPhase::Idle);

        let summary = dispatcher.run(Vec::<String>::new(), Vec::<String>::new()).await.unwrap();
        assert_eq!(summary.outcomes(), 0);
        assert_eq!(dispatcher.phase(), ScanPhase::Done);

        assert!(dispatcher.run(["radio"], ["io"]).await.is_err());
        assert_eq!(dispatcher.metrics().outcomes(), 0);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let lookup = Arc::new(ScriptedLookup::default());
        let sink = Arc::new(MemorySink::new());
        let result = Dispatcher::new(
            DispatchConfig::with_workers(0),
            ExistenceChecker::new(lookup),
            sink,
        );
        assert!(result.is_err());
    }
}
