use serde::{Deserialize, Serialize};

use super::{
    case::{Case, CasePatch},
    id::{self, EntityId},
};

/// The root state document: one per profile, persisted as a single blob.
///
/// The document exclusively owns its cases. All mutations go through this
/// value; the owning context persists the whole document after each
/// transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Identifier of the currently selected case, if any.
    #[serde(rename = "activeCaseId")]
    pub active_case: Option<EntityId>,
    /// All cases, newest first by convention (insertion order, never
    /// re-sorted).
    pub cases: Vec<Case>,
    /// Transient view state, persisted for convenience only.
    pub ui: UiState,
}

impl Document {
    /// Looks up a case by id.
    #[must_use]
    pub fn case(&self, case_id: &EntityId) -> Option<&Case> {
        self.cases.iter().find(|case| &case.id == case_id)
    }

    /// Looks up a case by id, mutably.
    pub fn case_mut(&mut self, case_id: &EntityId) -> Option<&mut Case> {
        self.cases.iter_mut().find(|case| &case.id == case_id)
    }

    /// The currently selected case, if one is selected and still exists.
    #[must_use]
    pub fn active_case(&self) -> Option<&Case> {
        self.active_case.as_ref().and_then(|id| self.case(id))
    }

    /// The currently selected case, mutably.
    pub fn active_case_mut(&mut self) -> Option<&mut Case> {
        let id = self.active_case.clone()?;
        self.case_mut(&id)
    }

    /// Adds a case at the front of the list and selects it.
    pub fn add_case(&mut self, case: Case) {
        self.active_case = Some(case.id.clone());
        id::prepend(&mut self.cases, case);
    }

    /// Applies a patch to the case with a matching id.
    ///
    /// A missing id is a silent no-op; returns whether a case was updated.
    pub fn patch_case(&mut self, case_id: &EntityId, patch: &CasePatch) -> bool {
        id::patch_entity(&mut self.cases, case_id, |case| patch.apply(case))
    }

    /// Removes the case with a matching id together with everything it
    /// owns. Irrecoverable; there is no trash.
    ///
    /// When the removed case was selected, selection falls to the front
    /// case, or to nothing.
    pub fn remove_case(&mut self, case_id: &EntityId) -> bool {
        let removed = id::remove_entity(&mut self.cases, case_id);
        if removed && self.active_case.as_ref() == Some(case_id) {
            self.active_case = self.cases.first().map(|case| case.id.clone());
        }
        removed
    }

    /// Selects the case with a matching id.
    ///
    /// Returns `false` (and changes nothing) when no such case exists.
    pub fn select_case(&mut self, case_id: &EntityId) -> bool {
        if self.case(case_id).is_some() {
            self.active_case = Some(case_id.clone());
            true
        } else {
            false
        }
    }

    /// Inserts an imported case: any existing case with the same id is
    /// removed, the imported one is placed at the front and selected.
    pub fn upsert_case(&mut self, case: Case) {
        self.cases.retain(|existing| existing.id != case.id);
        self.add_case(case);
    }
}

/// Transient view state. Persisted alongside the data for convenience but
/// not semantically load-bearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    /// The selected tab.
    pub tab: String,
    /// The current search query.
    pub query: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: "snapshot".to_string(),
            query: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_is_empty_with_snapshot_tab() {
        let document = Document::default();
        assert!(document.active_case.is_none());
        assert!(document.cases.is_empty());
        assert_eq!(document.ui.tab, "snapshot");
        assert_eq!(document.ui.query, "");
    }

    #[test]
    fn add_case_prepends_and_selects() {
        let mut document = Document::default();
        document.add_case(Case::new("first"));
        document.add_case(Case::new("second"));

        assert_eq!(document.cases[0].title, "second");
        assert_eq!(document.cases[1].title, "first");
        assert_eq!(document.active_case, Some(document.cases[0].id.clone()));
    }

    #[test]
    fn removing_the_active_case_falls_back_to_the_front() {
        let mut document = Document::default();
        document.add_case(Case::new("first"));
        document.add_case(Case::new("second"));
        let active = document.cases[0].id.clone();

        assert!(document.remove_case(&active));
        assert_eq!(document.cases.len(), 1);
        assert_eq!(document.active_case, Some(document.cases[0].id.clone()));
    }

    #[test]
    fn removing_the_last_case_clears_the_selection() {
        let mut document = Document::default();
        document.add_case(Case::new("only"));
        let id = document.cases[0].id.clone();

        assert!(document.remove_case(&id));
        assert!(document.cases.is_empty());
        assert!(document.active_case.is_none());
    }

    #[test]
    fn mutating_one_case_never_touches_another() {
        let mut document = Document::default();
        document.add_case(Case::new("case a"));
        document.add_case(Case::new("case b"));
        let a_before = document.cases[1].clone();
        let b_id = document.cases[0].id.clone();

        document.patch_case(
            &b_id,
            &CasePatch {
                landlord: Some("Hausverwaltung GmbH".to_string()),
                ..CasePatch::default()
            },
        );
        let b = document.case_mut(&b_id).unwrap();
        b.add_defect(crate::domain::Defect::new("mould"));

        assert_eq!(document.cases[1], a_before);
    }

    #[test]
    fn upsert_replaces_same_id_and_moves_to_front() {
        let mut document = Document::default();
        document.add_case(Case::new("keep me"));
        document.add_case(Case::new("replace me"));
        let keep_id = document.cases[1].id.clone();

        let mut imported = document.cases[1].clone();
        imported.title = "replaced".to_string();
        let imported_id = imported.id.clone();
        document.upsert_case(imported);

        assert_eq!(document.cases.len(), 2);
        assert_eq!(document.cases[0].title, "replaced");
        assert_eq!(document.cases[0].id, imported_id);
        assert_eq!(document.cases[1].id, keep_id);
        assert_eq!(document.active_case, Some(imported_id));
    }

    #[test]
    fn select_unknown_case_is_a_noop() {
        let mut document = Document::default();
        document.add_case(Case::new("only"));
        let selected = document.active_case.clone();

        assert!(!document.select_case(&EntityId::from("missing")));
        assert_eq!(document.active_case, selected);
    }
}
