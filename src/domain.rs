//! Domain model for rental dispute cases.
//!
//! One [`Document`] owns every [`Case`]; each case owns its defects,
//! incidents, document references, and letters. All mutations are
//! state-in/state-out on these values and keep sibling entities and
//! unrelated collections untouched, so the store can always persist a
//! consistent whole-document snapshot.

mod amount;
pub use amount::parse_amount;

mod case;
pub use case::{Case, CasePatch, DocumentRef, DocumentRefPatch};

mod config;
pub use config::Config;

mod defect;
pub use defect::{Defect, DefectPatch, DefectStatus};

mod document;
pub use document::{Document, UiState};

/// Entity identifiers and id-based collection access.
pub mod id;
pub use id::{EntityId, Identified};

mod incident;
pub use incident::{
    Attachment, EvidenceLink, EvidencePatch, Incident, IncidentPatch, Urgency,
};

mod letter;
pub use letter::{Letter, LetterPatch, TemplateKind};
