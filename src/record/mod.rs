//! Semantic résumé record.
//!
//! The flat domain form exchanged with storage and the matching service:
//! personal details plus an ordered list of titled sections whose entries
//! are shaped by section kind.

mod entry;
mod rich;
mod section;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use entry::{Degree, EducationEntry, ExperienceEntry, HighlightEntry, Position};
pub use rich::RichText;
pub use section::{Section, SectionEntries, SectionKind};

/// Contact keywords, in the order contacts are laid out.
pub const CONTACT_KINDS: [&str; 5] = ["email", "phone", "linkedin", "website", "github"];

/// A complete résumé.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub personal: Personal,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ResumeRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Name, summary and contact details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personal {
    pub name: RichText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl Personal {
    /// Contact value for a keyword from [`CONTACT_KINDS`].
    pub fn contact(&self, kind: &str) -> Option<&str> {
        let value = match kind {
            "email" => &self.email,
            "phone" => &self.phone,
            "linkedin" => &self.linkedin,
            "website" => &self.website,
            "github" => &self.github,
            _ => return None,
        };
        value.as_deref()
    }

    /// Set a contact by keyword. Unknown keywords are ignored.
    pub fn set_contact(&mut self, kind: &str, value: String) {
        let slot = match kind {
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "linkedin" => &mut self.linkedin,
            "website" => &mut self.website,
            "github" => &mut self.github,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Present, non-blank contacts in layout order.
    pub fn contacts(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        CONTACT_KINDS.iter().filter_map(|&kind| {
            self.contact(kind)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (kind, v))
        })
    }
}
