//! Import and export of cases and whole documents.
//!
//! Exports are pretty-printed UTF-8 JSON. On import the payload is
//! classified by shape: a full document replaces the current one
//! outright, a single case is upserted, and anything else is rejected
//! without touching any state.

use serde_json::Value;

use crate::domain::{Case, Document, EntityId, Letter};

/// What an import did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    /// The whole document was replaced (destructive, not a merge).
    ReplacedDocument {
        /// Number of cases in the imported document.
        cases: usize,
    },
    /// A single case was inserted at the front and selected; an existing
    /// case with the same id was removed first.
    UpsertedCase {
        /// Identifier of the imported case.
        id: EntityId,
        /// Title of the imported case.
        title: String,
    },
}

/// Errors raised when importing a payload.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The payload is not valid JSON.
    #[error("import is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload is valid JSON but neither a document nor a case.
    #[error("unrecognized format: expected an exported case or case file")]
    UnrecognizedShape,
}

/// Imports a parsed payload into the document.
///
/// Classification:
/// - a `cases` array (bare document) or a `meta`/`document` envelope
///   replaces the whole document;
/// - `id`, `title`, `defects`, and `incidents` fields mark a single case,
///   which is upserted and selected;
/// - anything else is rejected with no state change.
///
/// # Errors
///
/// Returns [`ImportError::Parse`] for unparseable JSON and
/// [`ImportError::UnrecognizedShape`] for payloads matching neither shape.
/// The document is untouched in both cases.
pub fn import(document: &mut Document, payload: &str) -> Result<Imported, ImportError> {
    let value: Value = serde_json::from_str(payload)?;

    if value.get("cases").is_some_and(Value::is_array)
        || (value.get("meta").is_some() && value.get("document").is_some())
    {
        let incoming = crate::storage::envelope::decode(payload)?;
        let cases = incoming.cases.len();
        *document = incoming;
        return Ok(Imported::ReplacedDocument { cases });
    }

    let looks_like_case = ["id", "title", "defects", "incidents"]
        .iter()
        .all(|key| value.get(key).is_some());
    if looks_like_case {
        let case: Case = serde_json::from_value(value)?;
        let id = case.id.clone();
        let title = case.title.clone();
        document.upsert_case(case);
        return Ok(Imported::UpsertedCase { id, title });
    }

    Err(ImportError::UnrecognizedShape)
}

/// Serializes the whole document as portable, human-readable JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_document(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Serializes one case as standalone, human-readable JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_case(case: &Case) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(case)
}

/// Derives an export file name from a case title: non-alphanumeric runs
/// collapse to `-`, lowercased, with a `.json` suffix.
#[must_use]
pub fn case_file_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "case.json".to_string()
    } else {
        format!("{slug}.json")
    }
}

/// The plain-text form of a letter: `Subject: <subject>`, a blank line,
/// then the body.
#[must_use]
pub fn letter_text(letter: &Letter) -> String {
    format!("Subject: {}\n\n{}", letter.subject, letter.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TemplateKind;

    fn document_with(titles: &[&str]) -> Document {
        let mut document = Document::default();
        for title in titles {
            document.add_case(Case::new(*title));
        }
        document
    }

    #[test]
    fn document_payload_replaces_everything() {
        let mut document = document_with(&["existing"]);
        let incoming = document_with(&["imported a", "imported b"]);
        let payload = export_document(&incoming).unwrap();

        let outcome = import(&mut document, &payload).unwrap();

        assert_eq!(outcome, Imported::ReplacedDocument { cases: 2 });
        assert_eq!(document, incoming);
    }

    #[test]
    fn versioned_envelope_payload_replaces_everything() {
        let mut document = document_with(&["existing"]);
        let payload = r#"{
            "meta": {"version": 1, "appId": "mietlog"},
            "document": {"cases": [{"title": "From envelope"}]}
        }"#;

        let outcome = import(&mut document, payload).unwrap();

        assert_eq!(outcome, Imported::ReplacedDocument { cases: 1 });
        assert_eq!(document.cases[0].title, "From envelope");
    }

    #[test]
    fn case_payload_upserts_without_discarding_others() {
        let mut document = document_with(&["keep me"]);
        let keep_id = document.cases[0].id.clone();
        let payload = export_case(&Case::new("imported")).unwrap();

        let outcome = import(&mut document, &payload).unwrap();

        match outcome {
            Imported::UpsertedCase { id, title } => {
                assert_eq!(title, "imported");
                assert_eq!(document.cases[0].id, id);
                assert_eq!(document.active_case, Some(id));
            }
            Imported::ReplacedDocument { .. } => panic!("expected a case upsert"),
        }
        assert_eq!(document.cases.len(), 2);
        assert_eq!(document.cases[1].id, keep_id);
    }

    #[test]
    fn reimporting_a_case_replaces_its_previous_version() {
        let mut document = document_with(&["original"]);
        let mut edited = document.cases[0].clone();
        edited.title = "edited elsewhere".to_string();
        let payload = export_case(&edited).unwrap();

        import(&mut document, &payload).unwrap();

        assert_eq!(document.cases.len(), 1);
        assert_eq!(document.cases[0].title, "edited elsewhere");
    }

    #[test]
    fn unrecognized_shape_is_rejected_without_state_change() {
        let mut document = document_with(&["existing"]);
        let before = document.clone();

        let error = import(&mut document, r#"{"foo": 1, "bar": []}"#).unwrap_err();

        assert!(matches!(error, ImportError::UnrecognizedShape));
        assert_eq!(document, before);
    }

    #[test]
    fn invalid_json_is_rejected_without_state_change() {
        let mut document = document_with(&["existing"]);
        let before = document.clone();

        let error = import(&mut document, "{{ nope").unwrap_err();

        assert!(matches!(error, ImportError::Parse(_)));
        assert_eq!(document, before);
    }

    #[test]
    fn exported_case_round_trips() {
        let mut case = Case::new("Hauptstr. 5");
        case.warm_rent = 950.0;
        case.add_defect(crate::domain::Defect::new("Mould"));
        let payload = export_case(&case).unwrap();

        let back: Case = serde_json::from_str(&payload).unwrap();
        assert_eq!(back, case);
    }

    #[test]
    fn file_name_collapses_non_alphanumerics() {
        assert_eq!(case_file_name("Hauptstr. 5, Berlin"), "hauptstr-5-berlin.json");
        assert_eq!(case_file_name("Flat  (2nd floor)!"), "flat-2nd-floor.json");
        assert_eq!(case_file_name("---"), "case.json");
        assert_eq!(case_file_name(""), "case.json");
    }

    #[test]
    fn letter_text_has_subject_header() {
        let letter = Letter::new(TemplateKind::RepairRequest, "t", "Repair needed", "Body text");
        assert_eq!(letter_text(&letter), "Subject: Repair needed\n\nBody text");
    }
}
