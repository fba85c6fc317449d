//! Link relevance scoring
//!
//! Scores only order links against each other; a score has no meaning on its own.

use crate::crawler::Link;
use regex::Regex;
use std::cmp::Reverse;

/// Which part of a link a rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The resolved URL
    Href,
    /// The anchor text
    Text,
}

/// One additive scoring rule, matched against the lower-cased field
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub field: Field,
    pub pattern: &'static str,
    pub weight: u32,
}

/// Built-in scoring rules
pub const SCORE_RULES: &[RuleSpec] = &[
    RuleSpec {
        field: Field::Href,
        pattern: "wax",
        weight: 5,
    },
    RuleSpec {
        field: Field::Text,
        pattern: "wax",
        weight: 4,
    },
    RuleSpec {
        field: Field::Href,
        pattern: "mainnet",
        weight: 3,
    },
    RuleSpec {
        field: Field::Href,
        pattern: "snapshot",
        weight: 2,
    },
    RuleSpec {
        field: Field::Href,
        pattern: r"\.(bin|gz|zst)$",
        weight: 2,
    },
    RuleSpec {
        field: Field::Href,
        pattern: "latest",
        weight: 1,
    },
    // date or block-height stamp
    RuleSpec {
        field: Field::Href,
        pattern: "[0-9]{6,}",
        weight: 1,
    },
];

#[derive(Debug, Clone)]
struct Rule {
    field: Field,
    pattern: Regex,
    weight: u32,
}

/// Assigns a relevance score to discovered links
#[derive(Debug, Clone)]
pub struct LinkScorer {
    rules: Vec<Rule>,
}

impl Default for LinkScorer {
    fn default() -> Self {
        Self::new(SCORE_RULES).expect("built-in scoring rules should be valid")
    }
}

impl LinkScorer {
    /// Compiles a scorer from a rule table
    pub fn new(specs: &[RuleSpec]) -> Result<Self, regex::Error> {
        let rules = specs
            .iter()
            .map(|spec| {
                Ok(Rule {
                    field: spec.field,
                    pattern: Regex::new(spec.pattern)?,
                    weight: spec.weight,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// Sums the weights of every rule the link satisfies
    pub fn score(&self, link: &Link) -> u32 {
        let href = link.href.to_lowercase();
        let text = link.text.to_lowercase();

        self.rules
            .iter()
            .filter(|rule| {
                let haystack = match rule.field {
                    Field::Href => &href,
                    Field::Text => &text,
                };
                rule.pattern.is_match(haystack)
            })
            .map(|rule| rule.weight)
            .sum()
    }

    /// Sorts links by descending score, keeping discovery order among ties
    pub fn rank(&self, links: &mut [Link]) {
        links.sort_by_cached_key(|link| Reverse(self.score(link)));
    }
}
