//! Core types and structures for domain-hack

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::dns::LookupError;

/// Classification of a single candidate's DNS query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Name servers exist for the domain
    Registered,
    /// The resolver says the name does not exist
    Unregistered,
    /// Any other failure; the domain is neither available nor taken
    Indeterminate(LookupError),
}

impl LookupOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            LookupOutcome::Registered => OutcomeKind::Registered,
            LookupOutcome::Unregistered => OutcomeKind::Unregistered,
            LookupOutcome::Indeterminate(_) => OutcomeKind::Indeterminate,
        }
    }
}

/// Payload-free tag of a [`LookupOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Registered,
    Unregistered,
    Indeterminate,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Registered => write!(f, "registered"),
            OutcomeKind::Unregistered => write!(f, "unregistered"),
            OutcomeKind::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Lifecycle of a single dispatcher run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Idle,
    Building,
    Dispatching,
    Draining,
    Done,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPhase::Idle => write!(f, "idle"),
            ScanPhase::Building => write!(f, "building"),
            ScanPhase::Dispatching => write!(f, "dispatching"),
            ScanPhase::Draining => write!(f, "draining"),
            ScanPhase::Done => write!(f, "done"),
        }
    }
}

/// How sink lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `domain` on the result sink, `domain: error` on the error sink
    #[default]
    Text,
    /// One JSON object per line on both sinks
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected text or json)", other)),
        }
    }
}

/// Live counters shared by the producer and every worker
#[derive(Debug, Default)]
pub struct ScanMetrics {
    words: AtomicU64,
    candidates: AtomicU64,
    duplicates: AtomicU64,
    registered: AtomicU64,
    unregistered: AtomicU64,
    indeterminate: AtomicU64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_words(&self) {
        self.words.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_candidates(&self) {
        self.candidates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicates(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, kind: OutcomeKind) {
        let counter = match kind {
            OutcomeKind::Registered => &self.registered,
            OutcomeKind::Unregistered => &self.unregistered,
            OutcomeKind::Indeterminate => &self.indeterminate,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of outcomes recorded so far
    pub fn outcomes(&self) -> u64 {
        self.registered.load(Ordering::Relaxed)
            + self.unregistered.load(Ordering::Relaxed)
            + self.indeterminate.load(Ordering::Relaxed)
    }

    /// Freeze the counters into a summary
    pub fn summary(&self, tlds: usize, workers: usize, elapsed: Duration) -> ScanSummary {
        ScanSummary {
            words: self.words.load(Ordering::Relaxed),
            tlds: tlds as u64,
            workers: workers as u64,
            candidates: self.candidates.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates.load(Ordering::Relaxed),
            registered: self.registered.load(Ordering::Relaxed),
            unregistered: self.unregistered.load(Ordering::Relaxed),
            indeterminate: self.indeterminate.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub words: u64,
    pub tlds: u64,
    pub workers: u64,
    /// Candidates handed to the worker pool
    pub candidates: u64,
    pub duplicates_skipped: u64,
    pub registered: u64,
    pub unregistered: u64,
    pub indeterminate: u64,
    pub elapsed: Duration,
}

impl ScanSummary {
    /// Total outcomes produced; equals `candidates` for a completed run
    pub fn outcomes(&self) -> u64 {
        self.registered + self.unregistered + self.indeterminate
    }

    pub fn checks_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.outcomes() as f64 / secs
        } else {
            0.0
        }
    }
}
