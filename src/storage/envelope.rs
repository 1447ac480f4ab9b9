use serde::{Deserialize, Serialize};

use crate::domain::Document;

/// Identifies case files written by this tool.
pub(crate) const APP_ID: &str = "mietlog";

/// Current schema version written on save.
pub(crate) const SCHEMA_VERSION: u32 = 1;

/// Schema metadata stored alongside the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Schema version of the persisted shape.
    pub version: u32,
    /// Application identifier, `"mietlog"` for files written here.
    #[serde(rename = "appId")]
    pub app_id: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            app_id: APP_ID.to_string(),
        }
    }
}

/// The persisted shape of the document slot.
///
/// Older profiles stored the bare document; newer ones wrap it in a
/// `meta`-tagged envelope. Both are read; saves always write the
/// versioned shape.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned {
        meta: Meta,
        document: Document,
    },
    Bare(Document),
}

/// Parses persisted or imported text into a document, accepting both the
/// bare and the versioned shape. Missing optional fields are filled with
/// defaults; only outright unparseable JSON fails.
pub(crate) fn decode(text: &str) -> Result<Document, serde_json::Error> {
    let stored: Stored = serde_json::from_str(text)?;
    Ok(match stored {
        Stored::Versioned { document, .. } | Stored::Bare(document) => document,
    })
}

/// Serializes a document into the versioned persisted shape.
pub(crate) fn encode(document: &Document) -> Result<String, serde_json::Error> {
    let stored = Stored::Versioned {
        meta: Meta::default(),
        document: document.clone(),
    };
    serde_json::to_string_pretty(&stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Case;

    #[test]
    fn decodes_a_bare_document() {
        let document = decode(r#"{"activeCaseId": null, "cases": []}"#).unwrap();
        assert!(document.cases.is_empty());
        assert_eq!(document.ui.tab, "snapshot");
    }

    #[test]
    fn decodes_a_versioned_envelope() {
        let text = r#"{
            "meta": {"version": 1, "appId": "mietlog"},
            "document": {"cases": [{"title": "Flat", "defects": [], "incidents": []}]}
        }"#;
        let document = decode(text).unwrap();
        assert_eq!(document.cases.len(), 1);
        assert_eq!(document.cases[0].title, "Flat");
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let mut document = Document::default();
        let mut case = Case::new("Hauptstr. 5");
        case.warm_rent = 950.0;
        document.add_case(case);

        let text = encode(&document).unwrap();
        let back = decode(&text).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn encoded_shape_carries_meta() {
        let text = encode(&Document::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["meta"]["version"], 1);
        assert_eq!(value["meta"]["appId"], "mietlog");
        assert!(value["document"].is_object());
    }

    #[test]
    fn defaulting_is_idempotent() {
        let sparse = r#"{"cases": [{"title": "Old"}]}"#;
        let once = decode(sparse).unwrap();
        let twice = decode(&encode(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn corrupt_json_is_an_error() {
        assert!(decode("not json at all {").is_err());
    }
}
