//! Snapshot URL classification
//!
//! A URL is recognized as a snapshot archive at one of two confidence tiers.
//! The pattern tables are plain data so they can be tuned and tested on their own.

use regex::Regex;

/// High-confidence snapshot names: "wax" together with an archive extension,
/// optionally with "main"/"snapshot" markers
pub const PRIMARY_PATTERNS: &[&str] = &[
    r"(?i)wax.*\.(bin|tar\.gz|zst|gz)$",
    r"(?i)wax.*main.*\.(bin|tar\.gz|zst|gz|bz2)$",
    r"(?i)snapshot.*wax.*main.*\.(bin|tar\.gz|zst|gz|bz2)$",
    r"(?i)wax.*snapshot.*\.(bin|tar\.gz|zst|gz|bz2)$",
];

/// Low-confidence names: any archive, used only after descent found nothing
pub const FALLBACK_PATTERNS: &[&str] = &[
    r"(?i)snapshot.*\.(bin|tar\.gz|zst|gz)$",
    r"(?i)\.(bin|tar\.gz|zst|gz)$",
];

/// Other networks whose archives must never pass the fallback tier
pub const EXCLUDED_NETWORKS: &str = r"(?i)\b(fio|jungle)\b";

/// Decides whether a URL plausibly names a WAX snapshot archive
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    primary: Vec<Regex>,
    fallback: Vec<Regex>,
    excluded: Regex,
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new(PRIMARY_PATTERNS, FALLBACK_PATTERNS, EXCLUDED_NETWORKS)
            .expect("built-in snapshot patterns should be valid")
    }
}

impl PatternClassifier {
    /// Compiles a classifier from pattern tables
    pub fn new(primary: &[&str], fallback: &[&str], excluded: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            primary: compile_all(primary)?,
            fallback: compile_all(fallback)?,
            excluded: Regex::new(excluded)?,
        })
    }

    /// Classifies a URL string
    ///
    /// Any primary match returns true. With `primary_only` unset, a fallback
    /// match that does not mention an excluded network also returns true.
    pub fn classify(&self, url: &str, primary_only: bool) -> bool {
        if self.is_primary(url) {
            return true;
        }
        !primary_only && self.is_fallback(url)
    }

    fn is_primary(&self, url: &str) -> bool {
        self.primary.iter().any(|pattern| pattern.is_match(url))
    }

    fn is_fallback(&self, url: &str) -> bool {
        !self.excluded.is_match(url) && self.fallback.iter().any(|pattern| pattern.is_match(url))
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}
