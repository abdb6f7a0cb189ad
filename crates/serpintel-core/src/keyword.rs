//! Validated search keyword.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Longest keyword accepted, in characters.
pub const MAX_KEYWORD_CHARS: usize = 200;

/// A non-empty, whitespace-normalized search keyword.
///
/// Construction is the single place where caller input is validated, so any
/// code holding a `Keyword` may assume the value is usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Trim and collapse internal whitespace, then validate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyKeyword`] for empty or whitespace-only input
    /// and [`CoreError::KeywordTooLong`] above [`MAX_KEYWORD_CHARS`].
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(CoreError::EmptyKeyword);
        }
        let len = normalized.chars().count();
        if len > MAX_KEYWORD_CHARS {
            return Err(CoreError::KeywordTooLong {
                len,
                max: MAX_KEYWORD_CHARS,
            });
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased terms with surrounding punctuation stripped.
    #[must_use]
    pub fn terms(&self) -> Vec<String> {
        self.0
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// Number of whitespace-separated terms (always at least one).
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    /// URL-safe slug, e.g. `"Best Running Shoes!"` → `"best-running-shoes"`.
    #[must_use]
    pub fn slug(&self) -> String {
        self.0
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Title-cased form used for generated headings.
    #[must_use]
    pub fn title_case(&self) -> String {
        self.0
            .split_whitespace()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Keyword {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Keyword> for String {
    fn from(value: Keyword) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(Keyword::parse(""), Err(CoreError::EmptyKeyword));
    }

    #[test]
    fn rejects_whitespace_only() {
        assert_eq!(Keyword::parse(" \t\n "), Err(CoreError::EmptyKeyword));
    }

    #[test]
    fn rejects_overlong_keyword() {
        let raw = "a".repeat(MAX_KEYWORD_CHARS + 1);
        assert_eq!(
            Keyword::parse(&raw),
            Err(CoreError::KeywordTooLong {
                len: MAX_KEYWORD_CHARS + 1,
                max: MAX_KEYWORD_CHARS
            })
        );
    }

    #[test]
    fn collapses_whitespace() {
        let kw = Keyword::parse("  best   running\tshoes ").unwrap();
        assert_eq!(kw.as_str(), "best running shoes");
        assert_eq!(kw.term_count(), 3);
    }

    #[test]
    fn terms_are_lowercase_without_punctuation() {
        let kw = Keyword::parse("Nike's \"Pegasus\" 41!").unwrap();
        assert_eq!(kw.terms(), vec!["nike's", "pegasus", "41"]);
    }

    #[test]
    fn slug_is_url_safe() {
        let kw = Keyword::parse("Best Running Shoes!").unwrap();
        assert_eq!(kw.slug(), "best-running-shoes");
    }

    #[test]
    fn title_case_capitalizes_each_term() {
        let kw = Keyword::parse("best running shoes").unwrap();
        assert_eq!(kw.title_case(), "Best Running Shoes");
    }

    #[test]
    fn deserialize_validates() {
        let err = serde_json::from_str::<Keyword>("\"   \"");
        assert!(err.is_err());
        let kw: Keyword = serde_json::from_str("\"trail shoes\"").unwrap();
        assert_eq!(kw.as_str(), "trail shoes");
    }
}
