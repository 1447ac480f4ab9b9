use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    defect::{Defect, DefectPatch},
    id::{self, EntityId, Identified},
    incident::{Incident, IncidentPatch},
    letter::{Letter, LetterPatch},
};

/// One tenancy/dispute file: the top-level owned aggregate.
///
/// A case exclusively owns its four collections. Deleting a case removes it
/// and all owned entities irrecoverably; there is no soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Case {
    /// Identifier, immutable once created and never reused.
    pub id: EntityId,
    /// Display title of the case.
    pub title: String,
    /// Address of the rental unit.
    pub address: String,
    /// Landlord or representative name.
    pub landlord: String,
    /// Tenant name, used to sign generated letters.
    pub tenant: String,
    /// Warm rent (total rent including utilities), the base for reduction
    /// calculations. `0` means "not set".
    pub warm_rent: f64,
    /// Free-text notes.
    pub notes: String,
    /// When the case was created.
    #[serde(rename = "createdAt")]
    pub created: DateTime<Utc>,
    /// Standing problems with the unit, newest first.
    pub defects: Vec<Defect>,
    /// Timeline entries, newest first.
    pub incidents: Vec<Incident>,
    /// Flat document references, newest first.
    pub documents: Vec<DocumentRef>,
    /// Generated letter drafts, newest first.
    pub letters: Vec<Letter>,
}

impl Case {
    /// Creates a new empty case with a fresh identifier.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Adds a defect at the front of the list.
    pub fn add_defect(&mut self, defect: Defect) {
        id::prepend(&mut self.defects, defect);
    }

    /// Applies a patch to the defect with a matching id.
    ///
    /// A missing id is a silent no-op; returns whether a defect was updated.
    pub fn patch_defect(&mut self, defect_id: &EntityId, patch: &DefectPatch) -> bool {
        id::patch_entity(&mut self.defects, defect_id, |defect| patch.apply(defect))
    }

    /// Removes the defect with a matching id, if present.
    pub fn remove_defect(&mut self, defect_id: &EntityId) -> bool {
        id::remove_entity(&mut self.defects, defect_id)
    }

    /// Adds an incident at the front of the list.
    pub fn add_incident(&mut self, incident: Incident) {
        id::prepend(&mut self.incidents, incident);
    }

    /// Applies a patch to the incident with a matching id.
    pub fn patch_incident(&mut self, incident_id: &EntityId, patch: &IncidentPatch) -> bool {
        id::patch_entity(&mut self.incidents, incident_id, |incident| {
            patch.apply(incident);
        })
    }

    /// Removes the incident with a matching id, together with its evidence
    /// and attachments.
    pub fn remove_incident(&mut self, incident_id: &EntityId) -> bool {
        id::remove_entity(&mut self.incidents, incident_id)
    }

    /// Looks up an incident by id.
    #[must_use]
    pub fn incident(&self, incident_id: &EntityId) -> Option<&Incident> {
        self.incidents.iter().find(|i| &i.id == incident_id)
    }

    /// Looks up an incident by id, mutably.
    pub fn incident_mut(&mut self, incident_id: &EntityId) -> Option<&mut Incident> {
        self.incidents.iter_mut().find(|i| &i.id == incident_id)
    }

    /// Adds a document reference at the front of the list.
    pub fn add_document(&mut self, document: DocumentRef) {
        id::prepend(&mut self.documents, document);
    }

    /// Applies a patch to the document reference with a matching id.
    pub fn patch_document(&mut self, document_id: &EntityId, patch: &DocumentRefPatch) -> bool {
        id::patch_entity(&mut self.documents, document_id, |document| {
            patch.apply(document);
        })
    }

    /// Removes the document reference with a matching id, if present.
    pub fn remove_document(&mut self, document_id: &EntityId) -> bool {
        id::remove_entity(&mut self.documents, document_id)
    }

    /// Adds a letter draft at the front of the list.
    pub fn add_letter(&mut self, letter: Letter) {
        id::prepend(&mut self.letters, letter);
    }

    /// Applies a patch to the letter with a matching id.
    pub fn patch_letter(&mut self, letter_id: &EntityId, patch: &LetterPatch) -> bool {
        id::patch_entity(&mut self.letters, letter_id, |letter| patch.apply(letter))
    }

    /// Removes the letter with a matching id, if present.
    pub fn remove_letter(&mut self, letter_id: &EntityId) -> bool {
        id::remove_entity(&mut self.letters, letter_id)
    }

    /// Looks up a letter by id.
    #[must_use]
    pub fn letter(&self, letter_id: &EntityId) -> Option<&Letter> {
        self.letters.iter().find(|l| &l.id == letter_id)
    }

    /// The defects that are still open, in list order.
    pub fn open_defects(&self) -> impl Iterator<Item = &Defect> {
        self.defects
            .iter()
            .filter(|defect| defect.status == super::DefectStatus::Open)
    }
}

impl Default for Case {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            title: String::new(),
            address: String::new(),
            landlord: String::new(),
            tenant: String::new(),
            warm_rent: 0.0,
            notes: String::new(),
            created: Utc::now(),
            defects: Vec::new(),
            incidents: Vec::new(),
            documents: Vec::new(),
            letters: Vec::new(),
        }
    }
}

impl Identified for Case {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A partial update to the descriptive fields of a [`Case`].
#[derive(Debug, Clone, Default)]
pub struct CasePatch {
    /// New title.
    pub title: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New landlord name.
    pub landlord: Option<String>,
    /// New tenant name.
    pub tenant: Option<String>,
    /// New warm rent. Callers coerce raw input through
    /// [`parse_amount`](super::parse_amount) first.
    pub warm_rent: Option<f64>,
    /// New notes.
    pub notes: Option<String>,
}

impl CasePatch {
    pub(crate) fn apply(&self, case: &mut Case) {
        if let Some(title) = &self.title {
            case.title.clone_from(title);
        }
        if let Some(address) = &self.address {
            case.address.clone_from(address);
        }
        if let Some(landlord) = &self.landlord {
            case.landlord.clone_from(landlord);
        }
        if let Some(tenant) = &self.tenant {
            case.tenant.clone_from(tenant);
        }
        if let Some(warm_rent) = self.warm_rent {
            case.warm_rent = warm_rent;
        }
        if let Some(notes) = &self.notes {
            case.notes.clone_from(notes);
        }
    }
}

/// A flat reference record on the case's documents tab: a named pointer
/// with optional notes, no nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentRef {
    /// Identifier, immutable once created.
    pub id: EntityId,
    /// Display name, e.g. "Lease agreement".
    pub name: String,
    /// Where the document lives.
    pub url: String,
    /// Free-text notes.
    pub notes: String,
    /// When the record was created.
    #[serde(rename = "createdAt")]
    pub created: DateTime<Utc>,
}

impl DocumentRef {
    /// Creates a new document reference with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for DocumentRef {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            name: String::new(),
            url: String::new(),
            notes: String::new(),
            created: Utc::now(),
        }
    }
}

impl Identified for DocumentRef {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A partial update to a [`DocumentRef`].
#[derive(Debug, Clone, Default)]
pub struct DocumentRefPatch {
    /// New name.
    pub name: Option<String>,
    /// New URL.
    pub url: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

impl DocumentRefPatch {
    pub(crate) fn apply(&self, document: &mut DocumentRef) {
        if let Some(name) = &self.name {
            document.name.clone_from(name);
        }
        if let Some(url) = &self.url {
            document.url.clone_from(url);
        }
        if let Some(notes) = &self.notes {
            document.notes.clone_from(notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DefectStatus;

    #[test]
    fn add_places_new_defect_at_the_front() {
        let mut case = Case::new("Flat on Hauptstr.");
        case.add_defect(Defect::new("first"));
        case.add_defect(Defect::new("second"));
        case.add_defect(Defect::new("third"));

        assert_eq!(case.defects.len(), 3);
        assert_eq!(case.defects[0].title, "third");
        assert_eq!(case.defects[1].title, "second");
        assert_eq!(case.defects[2].title, "first");
    }

    #[test]
    fn patching_one_defect_leaves_siblings_untouched() {
        let mut case = Case::new("Flat");
        case.add_defect(Defect::new("window"));
        case.add_defect(Defect::new("heating"));
        let window_id = case.defects[1].id.clone();
        let heating_before = case.defects[0].clone();

        let patch = DefectPatch {
            impact_percent: Some(15.0),
            ..DefectPatch::default()
        };
        assert!(case.patch_defect(&window_id, &patch));

        assert_eq!(case.defects[0], heating_before);
        assert_eq!(case.defects[1].impact_percent, 15.0);
    }

    #[test]
    fn defect_crud_does_not_touch_other_collections() {
        let mut case = Case::new("Flat");
        case.add_incident(Incident::new("call"));
        case.add_document(DocumentRef::new("Lease"));
        case.add_defect(Defect::new("mould"));
        let incidents_before = case.incidents.clone();
        let documents_before = case.documents.clone();

        let defect_id = case.defects[0].id.clone();
        case.patch_defect(
            &defect_id,
            &DefectPatch {
                status: Some(DefectStatus::Resolved),
                ..DefectPatch::default()
            },
        );
        case.remove_defect(&defect_id);

        assert!(case.defects.is_empty());
        assert_eq!(case.incidents, incidents_before);
        assert_eq!(case.documents, documents_before);
    }

    #[test]
    fn removing_unknown_ids_is_a_noop() {
        let mut case = Case::new("Flat");
        case.add_defect(Defect::new("mould"));

        assert!(!case.remove_defect(&EntityId::from("missing")));
        assert!(!case.remove_incident(&EntityId::from("missing")));
        assert!(!case.remove_letter(&EntityId::from("missing")));
        assert_eq!(case.defects.len(), 1);
    }

    #[test]
    fn open_defects_skips_resolved_ones() {
        let mut case = Case::new("Flat");
        case.add_defect(Defect::new("open one"));
        let mut resolved = Defect::new("fixed one");
        resolved.status = DefectStatus::Resolved;
        case.add_defect(resolved);

        let titles: Vec<_> = case.open_defects().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["open one"]);
    }

    #[test]
    fn sparse_case_json_fills_defaults() {
        let case: Case = serde_json::from_str(r#"{"title": "Old export"}"#).unwrap();
        assert_eq!(case.title, "Old export");
        assert_eq!(case.warm_rent, 0.0);
        assert!(case.defects.is_empty());
        assert!(case.letters.is_empty());
    }
}
