//! Local record keeping for rental dispute cases.
//!
//! Defects, incident timelines, evidence, attachments, and generated
//! letter drafts are tracked in a single JSON document persisted as one
//! atomic blob. There is no server and no sync; the case file is owned
//! by a single user on a single machine.

pub mod domain;
pub use domain::{Case, Defect, Document, EntityId, Incident, Letter, TemplateKind};

/// Persistence for the case document.
pub mod storage;
pub use storage::{StorageError, Store};

pub mod templates;

pub mod transfer;
