//! Dictionary completeness validation.
//!
//! Every locale's dictionary is compared with the default locale's: keys
//! must line up, groups must stay groups, and interpolation placeholders
//! such as `{count}` must survive translation.

use crate::i18n::{Dictionary, Message};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Problems that make messages unusable (missing keys, shape mismatches)
    pub errors: Vec<String>,

    /// Probable mistakes (extra keys, placeholder drift, empty strings)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for dictionary completeness.
pub struct DictionaryValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl DictionaryValidator {
    /// Validate a locale's dictionary against the reference (default) dictionary.
    ///
    /// # Arguments
    /// * `reference` - Dictionary of the default locale
    /// * `candidate` - Dictionary to check
    ///
    /// # Returns
    /// A `ValidationReport` containing any errors or warnings found.
    pub fn validate(reference: &Dictionary, candidate: &Dictionary) -> ValidationReport {
        let mut report = ValidationReport::new();
        Self::compare("", reference, candidate, &mut report);
        report
    }

    fn compare(
        prefix: &str,
        reference: &Dictionary,
        candidate: &Dictionary,
        report: &mut ValidationReport,
    ) {
        for (key, expected) in reference.iter() {
            let path = join(prefix, key);
            match (expected, candidate.get(key)) {
                (_, None) => report.errors.push(format!("Missing key: {}", path)),
                (Message::Text(_), Some(Message::Nested(_))) => report
                    .errors
                    .push(format!("Shape mismatch at {}: expected text, found group", path)),
                (Message::Nested(_), Some(Message::Text(_))) => report
                    .errors
                    .push(format!("Shape mismatch at {}: expected group, found text", path)),
                (Message::Nested(expected), Some(Message::Nested(actual))) => {
                    Self::compare(&path, expected, actual, report)
                }
                (Message::Text(expected), Some(Message::Text(actual))) => {
                    if actual.trim().is_empty() && !expected.trim().is_empty() {
                        report.warnings.push(format!("Empty translation: {}", path));
                    }

                    let expected_placeholders = Self::extract_placeholders(expected);
                    let actual_placeholders = Self::extract_placeholders(actual);
                    if expected_placeholders != actual_placeholders {
                        report.warnings.push(format!(
                            "Placeholder mismatch at {}: expected {:?}, found {:?}",
                            path, expected_placeholders, actual_placeholders
                        ));
                    }
                }
            }
        }

        for (key, _) in candidate.iter() {
            if reference.get(key).is_none() {
                report
                    .warnings
                    .push(format!("Unexpected key: {}", join(prefix, key)));
            }
        }
    }

    /// Extract the set of `{name}` placeholders from a message.
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
        });

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
