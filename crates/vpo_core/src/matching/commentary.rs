//! Commentary detection from track titles.

use regex::{Regex, RegexBuilder};

/// Patterns used when a caller asks for a matcher without its own list.
pub const DEFAULT_COMMENTARY_PATTERNS: &[&str] = &["commentary", "director", "cast"];

#[derive(Debug, Clone)]
enum Pattern {
    Regex(Regex),
    /// Lower-cased literal, used when the pattern is not a valid regex.
    Substring(String),
}

/// Case-insensitive commentary title matcher.
#[derive(Debug, Clone)]
pub struct CommentaryMatcher {
    patterns: Vec<Pattern>,
}

impl CommentaryMatcher {
    /// Compile each pattern as a case-insensitive regex, falling back to
    /// substring matching for patterns that fail to compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                match RegexBuilder::new(p).case_insensitive(true).build() {
                    Ok(re) => Pattern::Regex(re),
                    Err(_) => Pattern::Substring(p.to_lowercase()),
                }
            })
            .collect();
        Self { patterns }
    }

    /// Matcher over [`DEFAULT_COMMENTARY_PATTERNS`].
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_COMMENTARY_PATTERNS)
    }

    pub fn is_commentary(&self, title: Option<&str>) -> bool {
        let Some(title) = title.filter(|t| !t.is_empty()) else {
            return false;
        };
        let lowered = title.to_lowercase();
        self.patterns.iter().any(|p| match p {
            Pattern::Regex(re) => re.is_match(title),
            Pattern::Substring(s) => lowered.contains(s.as_str()),
        })
    }
}

impl Default for CommentaryMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
