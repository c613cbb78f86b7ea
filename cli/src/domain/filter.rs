//! `quadlet list --filter key=value` parsing and matching.
//!
//! Values given for the same key are alternatives (any may match); distinct
//! keys are all required to match.

use regex::Regex;

use crate::domain::error::QuadletError;
use crate::domain::report::ListEntry;

/// Filter keys accepted by `list`.
pub const VALID_FILTER_KEYS: &[&str] = &["name", "status"];

/// One name pattern: exact match, or an unanchored regular expression.
#[derive(Debug, Clone)]
struct NamePattern {
    raw: String,
    regex: Regex,
}

impl NamePattern {
    fn matches(&self, name: &str) -> bool {
        name == self.raw || self.regex.is_match(name)
    }
}

/// A single filter key and its accepted values.
#[derive(Debug, Clone)]
enum Predicate {
    Name(Vec<NamePattern>),
    Status(Vec<String>),
}

impl Predicate {
    fn matches(&self, entry: &ListEntry) -> bool {
        match self {
            Self::Name(patterns) => patterns.iter().any(|p| p.matches(&entry.name)),
            Self::Status(values) => values.iter().any(|v| status_matches(v, &entry.status)),
        }
    }
}

/// `value` matches the full status string or just its ActiveState half.
fn status_matches(value: &str, status: &str) -> bool {
    status.eq_ignore_ascii_case(value)
        || status
            .split_once('/')
            .is_some_and(|(active, _)| active.eq_ignore_ascii_case(value))
}

/// Conjunction of per-key predicates.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    predicates: Vec<Predicate>,
}

impl ListFilters {
    /// Parse `key=value` strings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilter` for strings without `=`, unknown keys, or name
    /// patterns that are not valid regular expressions.
    pub fn parse<S: AsRef<str>>(filters: &[S]) -> Result<Self, QuadletError> {
        let mut names: Vec<NamePattern> = Vec::new();
        let mut statuses: Vec<String> = Vec::new();
        let mut order: Vec<&'static str> = Vec::new();

        for raw in filters {
            let raw = raw.as_ref();
            let (key, value) = raw.split_once('=').ok_or_else(|| QuadletError::InvalidFilter {
                filter: raw.to_string(),
                reason: "expected key=value".to_string(),
            })?;
            let key = match key {
                "name" => {
                    let regex = Regex::new(value).map_err(|e| QuadletError::InvalidFilter {
                        filter: raw.to_string(),
                        reason: e.to_string(),
                    })?;
                    names.push(NamePattern {
                        raw: value.to_string(),
                        regex,
                    });
                    "name"
                }
                "status" => {
                    statuses.push(value.to_string());
                    "status"
                }
                other => {
                    return Err(QuadletError::InvalidFilter {
                        filter: raw.to_string(),
                        reason: format!(
                            "{other} is not a valid filter (valid: {})",
                            VALID_FILTER_KEYS.join(", ")
                        ),
                    });
                }
            };
            if !order.contains(&key) {
                order.push(key);
            }
        }

        let mut predicates = Vec::with_capacity(order.len());
        for key in order {
            match key {
                "name" => predicates.push(Predicate::Name(std::mem::take(&mut names))),
                _ => predicates.push(Predicate::Status(std::mem::take(&mut statuses))),
            }
        }
        Ok(Self { predicates })
    }

    /// `true` when no filter was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// An entry passes only if every predicate accepts it.
    #[must_use]
    pub fn matches(&self, entry: &ListEntry) -> bool {
        self.predicates.iter().all(|p| p.matches(entry))
    }
}
