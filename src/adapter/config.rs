//! Adapter configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::NodeType;

/// Sentinel text for required header fields that have no value.
///
/// The tree grammar requires an institution and a date in every entry
/// header; when the record has none the builder fills these in, and the
/// extractor reads them back as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub institution: String,
    pub location: String,
    pub dates: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            institution: "Institution...".to_string(),
            location: "Location...".to_string(),
            dates: "Dates...".to_string(),
        }
    }
}

impl Placeholders {
    /// Placeholder for a header field type, if it has one.
    pub fn for_field(&self, kind: NodeType) -> Option<&str> {
        match kind {
            NodeType::Institution => Some(self.institution.as_str()),
            NodeType::Location => Some(self.location.as_str()),
            NodeType::Date => Some(self.dates.as_str()),
            _ => None,
        }
    }

    /// Whether `text` is any of the placeholders.
    pub fn is_placeholder(&self, text: &str) -> bool {
        let text = text.trim();
        [&self.institution, &self.location, &self.dates]
            .iter()
            .any(|p| p.trim() == text)
    }
}

/// Options for building and extracting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterConfig {
    pub placeholders: Placeholders,
    /// Joins skills into one line; its trimmed form splits them again.
    ///
    /// Skills are not escaped, so a skill containing the trimmed separator
    /// (`"Go, SQL"` with the default `", "`) comes back as two skills.
    pub skills_separator: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            placeholders: Placeholders::default(),
            skills_separator: ", ".to_string(),
        }
    }
}

impl AdapterConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Delimiter used to split a skills line back into skills.
    pub(crate) fn skills_delimiter(&self) -> &str {
        match self.skills_separator.trim() {
            "" => ",",
            trimmed => trimmed,
        }
    }
}
