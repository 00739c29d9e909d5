//! Error handling for domain-hack

use thiserror::Error;

/// Which collaborator failed to supply its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Words,
    Tlds,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Words => write!(f, "word list"),
            InputSource::Tlds => write!(f, "TLD list"),
        }
    }
}

/// Main error type for domain-hack
///
/// Only run-level failures live here. A single candidate's lookup failure is a
/// [`crate::dns::LookupError`] and never leaves the worker that saw it.
#[derive(Error, Debug, Clone)]
pub enum DomainHackError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Could not get {input}: {message}")]
    Input {
        input: InputSource,
        message: String,
        location: Option<String>,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainHackError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fatal input error
    pub fn input(input: InputSource, message: impl Into<String>, location: Option<String>) -> Self {
        Self::Input {
            input,
            message: message.into(),
            location,
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Re-tag a loading failure as a fatal input error for `input`.
    ///
    /// Errors that are already `Input` keep their original source.
    pub fn into_input(self, input: InputSource) -> Self {
        match self {
            Self::Input { .. } => self,
            Self::Io { message, path } => Self::input(input, message, path),
            Self::Network { message, url, .. } => Self::input(input, message, url),
            other => Self::input(input, other.to_string(), None),
        }
    }

    /// Whether this error aborts a run before any candidate is dispatched
    pub fn is_fatal_input(&self) -> bool {
        matches!(self, Self::Input { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!(
                    "Configuration problem: {}\nhint: check your .env file or DOMAIN_HACK_* variables",
                    message
                )
            }
            Self::Input { input, message, location } => {
                let at = location.as_ref().map_or(String::new(), |l| format!(" ({})", l));
                format!("Could not get {}{}: {}", input, at, message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!(
                    "Network error{}: {}\nhint: check your internet connection",
                    status, message
                )
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("File error{}: {}", path_info, message)
            }
            Self::Internal { message } => {
                format!("Internal error: {}\nhint: this is a bug, please report it", message)
            }
        }
    }
}

impl From<reqwest::Error> for DomainHackError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("Request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<std::io::Error> for DomainHackError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DomainHackError>;

/// Build a [`DomainHackError::Config`] with `format!` arguments
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::DomainHackError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DomainHackError::config(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = DomainHackError::input(InputSource::Words, "No such file", None);
        assert_eq!(err.to_string(), "Could not get word list: No such file");

        let err = DomainHackError::input(InputSource::Tlds, "HTTP 503", None);
        assert_eq!(err.to_string(), "Could not get TLD list: HTTP 503");
        assert!(err.is_fatal_input());
    }

    #[test]
    fn test_into_input_keeps_location() {
        let err = DomainHackError::io("denied", Some("/tmp/words".to_string()))
            .into_input(InputSource::Words);
        match err {
            DomainHackError::Input { input, location, .. } => {
                assert_eq!(input, InputSource::Words);
                assert_eq!(location.as_deref(), Some("/tmp/words"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_config_macro() {
        let err = config_error!("bad value for {}: {}", "WORKERS", "abc");
        assert!(err.to_string().contains("WORKERS"));
        assert!(!err.is_fatal_input());
    }
}
