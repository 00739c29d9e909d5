//! Word and TLD input collaborators

pub mod tlds;
pub mod words;

pub use tlds::{fetch_tlds, load_tlds, TldSource};
pub use words::load_words;

/// Lower-case `text` and split it into lines, dropping blank lines and
/// `#` comments.
pub fn split_lines_with_comments(text: &str) -> Vec<String> {
    text.to_lowercase()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skips_comments_and_blanks() {
        let text = "# Version 2024101600, Last Updated Wed Oct 16 07:07:01 2024 UTC\nAAA\n\nCOM\r\n  \nIO\n";
        assert_eq!(split_lines_with_comments(text), vec!["aaa", "com", "io"]);
    }

    #[test]
    fn test_split_lowercases_words() {
        assert_eq!(split_lines_with_comments("Radio\nDATA"), vec!["radio", "data"]);
        assert!(split_lines_with_comments("").is_empty());
    }
}
