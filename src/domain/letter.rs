use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{EntityId, Identified};

/// A generated letter draft.
///
/// Letters are immutable at creation time except for free-text edits to
/// `subject` and `body`. Regenerating never overwrites an existing letter;
/// each generation appends a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Letter {
    /// Identifier, immutable once created.
    pub id: EntityId,
    /// Which template produced this draft.
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    /// Display title of the draft.
    pub title: String,
    /// Subject line.
    pub subject: String,
    /// Letter body.
    pub body: String,
    /// When the draft was generated.
    #[serde(rename = "createdAt")]
    pub created: DateTime<Utc>,
}

impl Letter {
    /// Creates a new letter draft with a fresh identifier.
    #[must_use]
    pub fn new(
        kind: TemplateKind,
        title: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            title: title.into(),
            subject: subject.into(),
            body: body.into(),
            created: Utc::now(),
        }
    }
}

impl Default for Letter {
    fn default() -> Self {
        Self::new(TemplateKind::RepairRequest, "", "", "")
    }
}

impl Identified for Letter {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A partial update to a [`Letter`].
///
/// Only the subject and body are editable after generation.
#[derive(Debug, Clone, Default)]
pub struct LetterPatch {
    /// New subject line.
    pub subject: Option<String>,
    /// New body text.
    pub body: Option<String>,
}

impl LetterPatch {
    pub(crate) fn apply(&self, letter: &mut Letter) {
        if let Some(subject) = &self.subject {
            letter.subject.clone_from(subject);
        }
        if let Some(body) = &self.body {
            letter.body.clone_from(body);
        }
    }
}

/// The built-in letter templates, keyed by a stable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Asks the landlord to fix all open defects.
    #[default]
    RepairRequest,
    /// Announces a rent reduction based on the open defects.
    RentReduction,
}

impl TemplateKind {
    /// The stable template key used in persisted data and on the CLI.
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::RepairRequest => "repair_request",
            Self::RentReduction => "rent_reduction",
        }
    }

    /// Parses a template key, accepting `-` as well as `_` separators.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.replace('-', "_").as_str() {
            "repair_request" => Some(Self::RepairRequest),
            "rent_reduction" => Some(Self::RentReduction),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_key_round_trips() {
        for kind in [TemplateKind::RepairRequest, TemplateKind::RentReduction] {
            assert_eq!(TemplateKind::parse(kind.as_key()), Some(kind));
        }
        assert_eq!(TemplateKind::parse("repair-request"), Some(TemplateKind::RepairRequest));
        assert_eq!(TemplateKind::parse("unknown"), None);
    }

    #[test]
    fn kind_serializes_as_snake_case_type_field() {
        let letter = Letter::new(TemplateKind::RentReduction, "t", "s", "b");
        let json = serde_json::to_value(&letter).unwrap();
        assert_eq!(json["type"], "rent_reduction");
    }

    #[test]
    fn patch_edits_only_subject_and_body() {
        let mut letter = Letter::new(TemplateKind::RepairRequest, "Repair request", "old", "old");
        let patch = LetterPatch {
            subject: Some("new subject".to_string()),
            body: None,
        };
        patch.apply(&mut letter);
        assert_eq!(letter.subject, "new subject");
        assert_eq!(letter.body, "old");
        assert_eq!(letter.title, "Repair request");
    }
}
