//! Output collaborators for worker results

use std::io::Write;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::dns::{LookupError, LookupErrorKind};
use crate::types::{OutcomeKind, OutputFormat};

/// Receives what the workers discover.
///
/// Called concurrently from every worker; implementations serialize their
/// own writes.
pub trait ResultSink: Send + Sync {
    /// A domain the resolver reported as nonexistent
    fn unregistered(&self, domain: &str);

    /// A domain whose lookup failed for any other reason
    fn indeterminate(&self, domain: &str, error: &LookupError);

    /// Flush buffered output once the pool has drained
    fn finish(&self) {}
}

#[derive(Serialize)]
struct SinkRecord<'a> {
    domain: &'a str,
    status: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<LookupErrorKind>,
    checked_at: DateTime<Utc>,
}

/// Render the error-sink line for a failed lookup
pub fn error_line(domain: &str, error: &LookupError) -> String {
    format!("{}: {}", domain, error)
}

/// Line-oriented sink over two writers (stdout and stderr for the CLI)
pub struct StreamSink {
    results: Mutex<Box<dyn Write + Send>>,
    errors: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
}

impl StreamSink {
    pub fn new(
        results: Box<dyn Write + Send>,
        errors: Box<dyn Write + Send>,
        format: OutputFormat,
    ) -> Self {
        Self {
            results: Mutex::new(results),
            errors: Mutex::new(errors),
            format,
        }
    }

    /// Results on stdout, lookup errors on stderr
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(std::io::stderr()), format)
    }

    fn render(&self, domain: &str, error: Option<&LookupError>) -> String {
        match self.format {
            OutputFormat::Text => match error {
                Some(error) => error_line(domain, error),
                None => domain.to_string(),
            },
            OutputFormat::Json => {
                let record = SinkRecord {
                    domain,
                    status: if error.is_some() {
                        OutcomeKind::Indeterminate
                    } else {
                        OutcomeKind::Unregistered
                    },
                    error: error.map(|e| e.message.as_str()),
                    error_kind: error.map(|e| e.kind),
                    checked_at: Utc::now(),
                };
                serde_json::to_string(&record).unwrap_or_else(|e| {
                    tracing::warn!(domain = %domain, error = %e, "Failed to serialize sink record");
                    domain.to_string()
                })
            }
        }
    }

    fn write_line(writer: &Mutex<Box<dyn Write + Send>>, line: &str) {
        let mut writer = writer.lock();
        if let Err(e) = writeln!(writer, "{}", line) {
            tracing::warn!(error = %e, "Failed to write output line");
        }
    }
}

impl ResultSink for StreamSink {
    fn unregistered(&self, domain: &str) {
        Self::write_line(&self.results, &self.render(domain, None));
    }

    fn indeterminate(&self, domain: &str, error: &LookupError) {
        Self::write_line(&self.errors, &self.render(domain, Some(error)));
    }

    fn finish(&self) {
        for writer in [&self.results, &self.errors] {
            if let Err(e) = writer.lock().flush() {
                tracing::warn!(error = %e, "Failed to flush output");
            }
        }
    }
}

/// Sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    unregistered: Mutex<Vec<String>>,
    errors: Mutex<Vec<(String, LookupError)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unregistered domains in the order they were reported
    pub fn unregistered_domains(&self) -> Vec<String> {
        self.unregistered.lock().clone()
    }

    /// Failed lookups in the order they were reported
    pub fn errors(&self) -> Vec<(String, LookupError)> {
        self.errors.lock().clone()
    }

    /// Error-sink lines as the text format would print them
    pub fn error_lines(&self) -> Vec<String> {
        self.errors
            .lock()
            .iter()
            .map(|(domain, error)| error_line(domain, error))
            .collect()
    }
}

impl ResultSink for MemorySink {
    fn unregistered(&self, domain: &str) {
        self.unregistered.lock().push(domain.to_string());
    }

    fn indeterminate(&self, domain: &str, error: &LookupError) {
        self.errors.lock().push((domain.to_string(), error.clone()));
    }
}
