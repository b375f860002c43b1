use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field value meaning "absent" in the source data. The upstream ontology
/// export writes a bare dash rather than omitting the field.
pub(crate) const EMPTY_FIELD: &str = "-";

fn empty_field() -> String {
    EMPTY_FIELD.to_string()
}

/// True when a field carries real text rather than the sentinel.
pub(crate) fn field_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != EMPTY_FIELD
}

/// One ontology term. The identifier lives as the key of the surrounding
/// map; the four text fields stay at the sentinel until a pass fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TermRecord {
    #[serde(default = "empty_field")]
    pub(crate) name: String,
    #[serde(default = "empty_field")]
    pub(crate) definition: String,
    #[serde(default = "empty_field")]
    pub(crate) name_cn: String,
    #[serde(default = "empty_field")]
    pub(crate) definition_cn: String,
    /// Parent identifiers from the source ontology. Carried through
    /// `parse`, stripped by `merge`, ignored by the enrichment passes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) is_a: Vec<String>,
}

impl Default for TermRecord {
    fn default() -> Self {
        Self {
            name: empty_field(),
            definition: empty_field(),
            name_cn: empty_field(),
            definition_cn: empty_field(),
            is_a: Vec::new(),
        }
    }
}

/// Keyed dictionary of terms. BTreeMap so every full-store serialization
/// comes out key-sorted.
pub(crate) type TermStore = BTreeMap<String, TermRecord>;

/// One line of the enriched-record log: the durable trace of a single
/// finished translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EnrichedRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) definition: String,
    pub(crate) name_cn: String,
    pub(crate) definition_cn: String,
    pub(crate) ts: i64,
}

/// Counts reported by a driver run.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct PassOutcome {
    pub(crate) processed: usize,
    pub(crate) skipped: usize,
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_present() {
        assert!(field_present("Abnormality of the eye"));
        assert!(!field_present("-"));
        assert!(!field_present(""));
        assert!(!field_present("  "));
        assert!(!field_present(" - "));
    }

    #[test]
    fn test_term_record_defaults_from_partial_json() {
        let record: TermRecord = serde_json::from_str(r#"{"name": "All"}"#).unwrap();
        assert_eq!(record.name, "All");
        assert_eq!(record.definition, EMPTY_FIELD);
        assert_eq!(record.name_cn, EMPTY_FIELD);
        assert_eq!(record.definition_cn, EMPTY_FIELD);
        assert!(record.is_a.is_empty());
    }

    #[test]
    fn test_empty_is_a_not_serialized() {
        let record = TermRecord::default();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("is_a"));
    }
}
