//! Dictionary word list

use std::path::Path;

use super::split_lines_with_comments;
use crate::error::{DomainHackError, InputSource, Result};

/// Load words from file (one word per line)
pub async fn load_words(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainHackError::input(
            InputSource::Words,
            e.to_string(),
            Some(path.to_string_lossy().to_string()),
        )
    })?;

    let words = split_lines_with_comments(&content);
    tracing::info!(path = %path.display(), words = words.len(), "Word list loaded");
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_words_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment\nRadio\n\ndata").unwrap();

        let words = load_words(file.path()).await.unwrap();
        assert_eq!(words, vec!["radio", "data"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_words(&dir.path().join("nope")).await.unwrap_err();
        assert!(err.is_fatal_input());
        assert!(err.to_string().starts_with("Could not get word list"));
    }
}
