//! Category rule table
//!
//! A `RuleTable` is an ordered list of disposal categories, each carrying the
//! keyword substrings that identify it and the instruction text returned to
//! the user. Order is load-bearing: the classifier takes the first rule that
//! matches, so specific categories must appear before generic ones.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One disposal category: its matching keywords and instruction text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    /// Lowercase substring patterns. A label matches the rule if it contains
    /// any of these as a substring.
    pub keywords: Vec<String>,
    pub disposal: String,
}

/// Ordered, validated collection of category rules.
///
/// Built once at startup and never mutated, so it can be shared freely
/// across request handlers.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
}

impl RuleTable {
    /// Validate and freeze a rule list. Rejects empty names, duplicate
    /// names, empty keyword lists, empty keyword strings, and empty
    /// instruction text.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for rule in &rules {
            if rule.name.trim().is_empty() {
                return Err(Error::Config("category with empty name".to_string()));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate category name '{}'",
                    rule.name
                )));
            }
            if rule.keywords.is_empty() {
                return Err(Error::Config(format!(
                    "category '{}' has no keywords",
                    rule.name
                )));
            }
            for keyword in &rule.keywords {
                if keyword.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "category '{}' has an empty keyword",
                        rule.name
                    )));
                }
            }
            if rule.disposal.trim().is_empty() {
                return Err(Error::Config(format!(
                    "category '{}' has no disposal instructions",
                    rule.name
                )));
            }
        }
        Ok(RuleTable { rules })
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Lookup by category name, for diagnostics and tests.
    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
