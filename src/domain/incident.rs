use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{self, EntityId, Identified};

/// One dated timeline entry: a contact, event, or observation.
///
/// Incidents own their evidence links and attachments exclusively; deleting
/// an incident removes both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Incident {
    /// Identifier, immutable once created.
    pub id: EntityId,
    /// When the incident happened, as entered (local date-time, minute
    /// precision, free text).
    #[serde(rename = "occurredAt")]
    pub occurred: String,
    /// Free-text categorisation, e.g. "call" or "letter".
    pub kind: String,
    /// One-line summary.
    pub summary: String,
    /// Multi-line details.
    pub details: String,
    /// How pressing the entry is.
    pub urgency: Urgency,
    /// Labeled pointers to off-system evidence.
    pub evidence: Vec<EvidenceLink>,
    /// Inline binary attachments.
    pub attachments: Vec<Attachment>,
    /// When the record was created.
    #[serde(rename = "createdAt")]
    pub created: DateTime<Utc>,
}

impl Incident {
    /// Creates a new incident with a fresh identifier and open urgency.
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Adds an evidence link at the front of the list.
    pub fn add_evidence(&mut self, link: EvidenceLink) {
        id::prepend(&mut self.evidence, link);
    }

    /// Applies a patch to the evidence link with a matching id.
    ///
    /// A missing id is a silent no-op; returns whether a link was updated.
    pub fn patch_evidence(&mut self, link_id: &EntityId, patch: &EvidencePatch) -> bool {
        id::patch_entity(&mut self.evidence, link_id, |link| patch.apply(link))
    }

    /// Removes the evidence link with a matching id, if present.
    pub fn remove_evidence(&mut self, link_id: &EntityId) -> bool {
        id::remove_entity(&mut self.evidence, link_id)
    }

    /// Adds an attachment at the front of the list.
    ///
    /// Size limits are enforced by the caller before the file is read; the
    /// core stores whatever blob it is handed.
    pub fn add_attachment(&mut self, attachment: Attachment) {
        id::prepend(&mut self.attachments, attachment);
    }

    /// Removes the attachment with a matching id, if present.
    pub fn remove_attachment(&mut self, attachment_id: &EntityId) -> bool {
        id::remove_entity(&mut self.attachments, attachment_id)
    }
}

impl Default for Incident {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            occurred: String::new(),
            kind: String::new(),
            summary: String::new(),
            details: String::new(),
            urgency: Urgency::Open,
            evidence: Vec::new(),
            attachments: Vec::new(),
            created: Utc::now(),
        }
    }
}

impl Identified for Incident {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Urgency of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Needs follow-up at some point.
    #[default]
    Open,
    /// Needs immediate follow-up.
    Urgent,
    /// Dealt with.
    Resolved,
}

impl Urgency {
    /// The stable string form used in persisted data and on the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Urgent => "urgent",
            Self::Resolved => "resolved",
        }
    }

    /// Parses the string form produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "urgent" => Some(Self::Urgent),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// A partial update to an [`Incident`].
#[derive(Debug, Clone, Default)]
pub struct IncidentPatch {
    /// New occurrence date-time text.
    pub occurred: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New summary.
    pub summary: Option<String>,
    /// New details.
    pub details: Option<String>,
    /// New urgency.
    pub urgency: Option<Urgency>,
}

impl IncidentPatch {
    pub(crate) fn apply(&self, incident: &mut Incident) {
        if let Some(occurred) = &self.occurred {
            incident.occurred.clone_from(occurred);
        }
        if let Some(kind) = &self.kind {
            incident.kind.clone_from(kind);
        }
        if let Some(summary) = &self.summary {
            incident.summary.clone_from(summary);
        }
        if let Some(details) = &self.details {
            incident.details.clone_from(details);
        }
        if let Some(urgency) = self.urgency {
            incident.urgency = urgency;
        }
    }
}

/// A labeled pointer to externally stored proof, e.g. a cloud-hosted
/// screenshot. The URL is stored as entered, without validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceLink {
    /// Identifier, immutable once created.
    pub id: EntityId,
    /// Human-readable label.
    pub label: String,
    /// Where the evidence lives.
    pub url: String,
}

impl EvidenceLink {
    /// Creates a new link with a fresh identifier.
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            label: label.into(),
            url: url.into(),
        }
    }
}

impl Default for EvidenceLink {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Identified for EvidenceLink {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A partial update to an [`EvidenceLink`].
#[derive(Debug, Clone, Default)]
pub struct EvidencePatch {
    /// New label.
    pub label: Option<String>,
    /// New URL.
    pub url: Option<String>,
}

impl EvidencePatch {
    pub(crate) fn apply(&self, link: &mut EvidenceLink) {
        if let Some(label) = &self.label {
            link.label.clone_from(label);
        }
        if let Some(url) = &self.url {
            link.url.clone_from(url);
        }
    }
}

/// A small binary file stored inline with an incident.
///
/// The payload is an opaque encoded blob (a data URL); the core only
/// stores and removes it. Oversized files are rejected at the boundary
/// before the payload is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
    /// Identifier, immutable once created.
    pub id: EntityId,
    /// Original file name.
    pub name: String,
    /// MIME type string.
    #[serde(rename = "type")]
    pub mime: String,
    /// Size of the original file in bytes.
    pub size: u64,
    /// Encoded payload.
    pub data_url: String,
}

impl Attachment {
    /// Creates a new attachment with a fresh identifier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        size: u64,
        data_url: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            mime: mime.into(),
            size,
            data_url: data_url.into(),
        }
    }
}

impl Default for Attachment {
    fn default() -> Self {
        Self::new("", "", 0, "")
    }
}

impl Identified for Attachment {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_is_prepended() {
        let mut incident = Incident::new("Spoke to caretaker");
        incident.add_evidence(EvidenceLink::new("first", "https://a.example"));
        incident.add_evidence(EvidenceLink::new("second", "https://b.example"));

        assert_eq!(incident.evidence.len(), 2);
        assert_eq!(incident.evidence[0].label, "second");
        assert_eq!(incident.evidence[1].label, "first");
    }

    #[test]
    fn removing_unknown_attachment_is_a_noop() {
        let mut incident = Incident::new("Leak photographed");
        incident.add_attachment(Attachment::new("leak.jpg", "image/jpeg", 1024, "data:;base64,"));

        let removed = incident.remove_attachment(&EntityId::from("missing"));
        assert!(!removed);
        assert_eq!(incident.attachments.len(), 1);
    }

    #[test]
    fn patch_missing_evidence_is_a_noop() {
        let mut incident = Incident::new("Email sent");
        let patch = EvidencePatch {
            label: Some("renamed".to_string()),
            url: None,
        };
        assert!(!incident.patch_evidence(&EntityId::from("missing"), &patch));
    }

    #[test]
    fn attachment_mime_serializes_as_type() {
        let attachment = Attachment::new("a.png", "image/png", 10, "data:image/png;base64,AA==");
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "image/png");
        assert_eq!(json["dataUrl"], "data:image/png;base64,AA==");
    }

    #[test]
    fn sparse_incident_fills_defaults() {
        let incident: Incident = serde_json::from_str(r#"{"summary": "Call"}"#).unwrap();
        assert_eq!(incident.urgency, Urgency::Open);
        assert!(incident.evidence.is_empty());
        assert!(incident.attachments.is_empty());
    }
}
