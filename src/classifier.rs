//! Label-to-category classification
//!
//! Resolves a set of image labels into a single disposal category by walking
//! the rule table in order and taking the first rule with any keyword hit.
//! Table order is the sole tie-break: no scoring, no match counting, no
//! keyword-length preference.

use crate::rules::RuleTable;
use serde::Serialize;

/// Sentinel category returned when no rule matches.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Instruction text paired with the `Unknown` category.
pub const UNKNOWN_DISPOSAL: &str =
    "Unable to classify. Please consult a local waste management facility.";

/// Outcome of classifying one label set. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: String,
    pub disposal: String,
    /// The labels that produced this result, echoed for diagnostics.
    pub labels: Vec<String>,
}

impl Classification {
    pub fn is_unknown(&self) -> bool {
        self.category == UNKNOWN_CATEGORY
    }
}

/// Classify a label set against the rule table.
///
/// Precondition: labels are already lowercased and trimmed by the caller;
/// no re-normalization happens here. An empty label set is valid input and
/// yields the `Unknown` result. Pure and deterministic: identical inputs
/// always produce identical results.
pub fn classify(labels: &[String], table: &RuleTable) -> Classification {
    for rule in table.rules() {
        let matched = labels
            .iter()
            .any(|label| rule.keywords.iter().any(|kw| label.contains(kw.as_str())));
        if matched {
            log::debug!("labels matched category '{}'", rule.name);
            return Classification {
                category: rule.name.clone(),
                disposal: rule.disposal.clone(),
                labels: labels.to_vec(),
            };
        }
    }

    log::debug!("no category matched {} label(s)", labels.len());
    Classification {
        category: UNKNOWN_CATEGORY.to_string(),
        disposal: UNKNOWN_DISPOSAL.to_string(),
        labels: labels.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rules::{CategoryRule, RuleTable};

    fn rule(name: &str, keywords: &[&str]) -> CategoryRule {
        CategoryRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            disposal: format!("How to dispose of {name}."),
        }
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_match_in_table_order_wins() {
        // Both rules match "tin can"; the earlier one must win.
        let table = RuleTable::new(vec![
            rule("category_a", &["tin"]),
            rule("category_b", &["can"]),
        ])
        .unwrap();

        let result = classify(&labels(&["tin can"]), &table);
        assert_eq!(result.category, "category_a");
    }

    #[test]
    fn substring_matching_not_full_token() {
        let table =
            RuleTable::new(vec![rule("glass_beverage_bottles", &["glass bottle"])]).unwrap();

        let result = classify(&labels(&["recycled glass bottle"]), &table);
        assert_eq!(result.category, "glass_beverage_bottles");
    }

    #[test]
    fn empty_label_set_is_unknown() {
        let table = RuleTable::new(vec![rule("cans", &["can"])]).unwrap();
        let result = classify(&[], &table);
        assert!(result.is_unknown());
        assert_eq!(result.disposal, UNKNOWN_DISPOSAL);
    }

    #[test]
    fn no_match_is_unknown_with_fixed_text() {
        let table = RuleTable::new(vec![rule("cans", &["can"])]).unwrap();
        let result = classify(&labels(&["rock", "mountain"]), &table);
        assert_eq!(result.category, UNKNOWN_CATEGORY);
        assert_eq!(result.disposal, UNKNOWN_DISPOSAL);
        assert_eq!(result.labels, labels(&["rock", "mountain"]));
    }

    #[test]
    fn classification_is_deterministic() {
        let table = RuleTable::new(vec![
            rule("category_a", &["bottle"]),
            rule("category_b", &["cap"]),
        ])
        .unwrap();
        let input = labels(&["bottle cap", "plastic"]);

        let first = classify(&input, &table);
        let second = classify(&input, &table);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_labels_are_inert() {
        let table = RuleTable::new(vec![
            rule("category_a", &["bottle"]),
            rule("category_b", &["can"]),
        ])
        .unwrap();

        // Three "can" labels must not outvote one "bottle" label.
        let result = classify(&labels(&["bottle", "can", "can", "can"]), &table);
        assert_eq!(result.category, "category_a");
    }

    #[test]
    fn default_table_classifies_water_bottle() {
        let table = Config::default().rule_table().unwrap();
        let result = classify(&labels(&["plastic water bottle", "bottle cap"]), &table);
        assert_eq!(result.category, "plastic_water_bottles");
    }

    #[test]
    fn default_table_jar_beats_generic_bottle() {
        // glass_food_jars sits above glass_beverage_bottles in the table.
        let table = Config::default().rule_table().unwrap();
        let result = classify(&labels(&["mason jar", "glass"]), &table);
        assert_eq!(result.category, "glass_food_jars");
    }

    #[test]
    fn default_table_lid_beats_cup() {
        // "plastic cup lid" contains the substring "plastic cup"; the lid
        // rule is ordered first so the substring overlap is harmless.
        let table = Config::default().rule_table().unwrap();
        let result = classify(&labels(&["plastic cup lid"]), &table);
        assert_eq!(result.category, "plastic_cup_lids");
    }
}
