use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{EntityId, Identified};

/// A standing physical problem with the rental unit.
///
/// Unlike an [`Incident`](super::Incident), a defect is an ongoing
/// condition rather than a dated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Defect {
    /// Identifier, immutable once created.
    pub id: EntityId,
    /// Short description of the problem.
    pub title: String,
    /// Room or area label, may be empty.
    pub room: String,
    /// When the problem started, as entered by the tenant (free text).
    #[serde(rename = "startDate")]
    pub started: String,
    /// Whether the problem is still present.
    pub status: DefectStatus,
    /// Tenant-proposed rent-reduction percentage. No enforced range.
    pub impact_percent: f64,
    /// Free-text notes.
    pub notes: String,
    /// When the record was created.
    #[serde(rename = "createdAt")]
    pub created: DateTime<Utc>,
}

impl Defect {
    /// Creates a new open defect with a fresh identifier.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Default for Defect {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            title: String::new(),
            room: String::new(),
            started: String::new(),
            status: DefectStatus::Open,
            impact_percent: 0.0,
            notes: String::new(),
            created: Utc::now(),
        }
    }
}

impl Identified for Defect {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Lifecycle state of a defect.
///
/// The open/resolved transition is unconstrained: either direction, any
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectStatus {
    /// The problem is still present.
    #[default]
    Open,
    /// The problem has been fixed.
    Resolved,
}

impl DefectStatus {
    /// The stable string form used in persisted data and on the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }

    /// Parses the string form produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// A partial update to a [`Defect`].
///
/// Only the fields a defect permits are enumerated; absent fields leave
/// the current value untouched.
#[derive(Debug, Clone, Default)]
pub struct DefectPatch {
    /// New title.
    pub title: Option<String>,
    /// New room/area label.
    pub room: Option<String>,
    /// New start date text.
    pub started: Option<String>,
    /// New status.
    pub status: Option<DefectStatus>,
    /// New impact percentage. Callers coerce raw input through
    /// [`parse_amount`](super::parse_amount) first.
    pub impact_percent: Option<f64>,
    /// New notes.
    pub notes: Option<String>,
}

impl DefectPatch {
    pub(crate) fn apply(&self, defect: &mut Defect) {
        if let Some(title) = &self.title {
            defect.title.clone_from(title);
        }
        if let Some(room) = &self.room {
            defect.room.clone_from(room);
        }
        if let Some(started) = &self.started {
            defect.started.clone_from(started);
        }
        if let Some(status) = self.status {
            defect.status = status;
        }
        if let Some(impact) = self.impact_percent {
            defect.impact_percent = impact;
        }
        if let Some(notes) = &self.notes {
            defect.notes.clone_from(notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defect_starts_open_with_zero_impact() {
        let defect = Defect::new("Mould in bathroom");
        assert_eq!(defect.status, DefectStatus::Open);
        assert_eq!(defect.impact_percent, 0.0);
        assert!(defect.room.is_empty());
    }

    #[test]
    fn patch_only_touches_named_fields() {
        let mut defect = Defect::new("Broken heating");
        defect.room = "Living room".to_string();

        let patch = DefectPatch {
            status: Some(DefectStatus::Resolved),
            ..DefectPatch::default()
        };
        patch.apply(&mut defect);

        assert_eq!(defect.status, DefectStatus::Resolved);
        assert_eq!(defect.title, "Broken heating");
        assert_eq!(defect.room, "Living room");
    }

    #[test]
    fn status_round_trips_as_lowercase() {
        let json = serde_json::to_string(&DefectStatus::Resolved).unwrap();
        assert_eq!(json, "\"resolved\"");
        let back: DefectStatus = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(back, DefectStatus::Open);
    }

    #[test]
    fn sparse_json_fills_defaults() {
        let defect: Defect = serde_json::from_str(r#"{"title": "Drafty window"}"#).unwrap();
        assert_eq!(defect.title, "Drafty window");
        assert_eq!(defect.status, DefectStatus::Open);
        assert_eq!(defect.impact_percent, 0.0);
        assert!(!defect.id.as_str().is_empty());
    }
}
