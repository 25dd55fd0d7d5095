//! Dictionary: the translated messages of one locale.
//!
//! A dictionary is a tree: every key maps either to a translated string or
//! to a nested dictionary. Pages address messages with dotted paths such as
//! `common.search`.

use crate::error::DictionaryLoadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// A translated string
    Text(String),

    /// A nested group of messages
    Nested(Dictionary),
}

impl Message {
    /// Get the translated string, if this entry is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(text) => Some(text),
            Message::Nested(_) => None,
        }
    }

    /// Get the nested dictionary, if this entry is one.
    pub fn as_nested(&self) -> Option<&Dictionary> {
        match self {
            Message::Text(_) => None,
            Message::Nested(dictionary) => Some(dictionary),
        }
    }
}

/// Nested mapping from message key to message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: BTreeMap<String, Message>,
}

impl Dictionary {
    /// Parse a JSON bundle.
    ///
    /// The top level must be an object; every value must be a string or an
    /// object of the same shape. Keys must not contain dots.
    ///
    /// # Arguments
    /// * `locale` - Locale the bundle belongs to (used in errors)
    /// * `content` - Raw bundle content
    pub fn from_json(locale: &str, content: &str) -> Result<Self, DictionaryLoadError> {
        let dictionary: Dictionary =
            serde_json::from_str(content).map_err(|e| DictionaryLoadError::Parse {
                locale: locale.to_string(),
                message: e.to_string(),
            })?;

        if let Some(key) = dictionary.find_dotted_key() {
            return Err(DictionaryLoadError::Parse {
                locale: locale.to_string(),
                message: format!("message key '{}' must not contain '.'", key),
            });
        }

        Ok(dictionary)
    }

    /// Get a top-level entry.
    pub fn get(&self, key: &str) -> Option<&Message> {
        self.entries.get(key)
    }

    /// Resolve a dotted path (e.g. `common.search`) to an entry.
    pub fn resolve(&self, path: &str) -> Option<&Message> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;

        for segment in segments {
            current = current.as_nested()?.entries.get(segment)?;
        }

        Some(current)
    }

    /// Resolve a dotted path to a translated string.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.resolve(path).and_then(Message::as_text)
    }

    /// Resolve a dotted path, falling back to the path itself when missing.
    pub fn text_or_key<'a>(&'a self, path: &'a str) -> &'a str {
        self.lookup(path).unwrap_or(path)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.entries.iter().map(|(key, message)| (key.as_str(), message))
    }

    /// Flatten to `(dotted path, text)` pairs in key order.
    pub fn flatten(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        for (key, message) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match message {
                Message::Text(text) => out.push((path, text)),
                Message::Nested(nested) => nested.flatten_into(&path, out),
            }
        }
    }

    fn find_dotted_key(&self) -> Option<&str> {
        self.entries.iter().find_map(|(key, message)| {
            if key.contains('.') {
                return Some(key.as_str());
            }
            message.as_nested().and_then(Dictionary::find_dotted_key)
        })
    }
}

impl FromIterator<(String, Message)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, Message)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
