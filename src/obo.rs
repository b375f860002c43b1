use std::io::BufRead;

use crate::{TermRecord, TermStore};

/// Parses the `[Term]` stanzas of an OBO ontology export into a term
/// store. Only the fields the enrichment passes consume are kept;
/// `[Typedef]` and any other stanza kind are ignored until the next
/// `[Term]`. Stanzas without an id are dropped.
pub(crate) fn parse_obo<R: BufRead>(reader: R) -> Result<TermStore, Box<dyn std::error::Error>> {
    let mut store = TermStore::new();
    let mut id: Option<String> = None;
    let mut record = TermRecord::default();
    let mut in_term = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line == "[Term]" {
            if let Some(done) = id.take() {
                store.insert(done, std::mem::take(&mut record));
            }
            record = TermRecord::default();
            in_term = true;
        } else if line.starts_with('[') {
            if let Some(done) = id.take() {
                store.insert(done, std::mem::take(&mut record));
            }
            record = TermRecord::default();
            in_term = false;
        } else if !in_term {
            continue;
        } else if line.is_empty() {
            if let Some(done) = id.take() {
                store.insert(done, std::mem::take(&mut record));
            }
            record = TermRecord::default();
        } else if let Some(value) = line.strip_prefix("id: ") {
            id = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("name: ") {
            record.name = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("def: ") {
            // def lines carry a quoted text followed by reference brackets.
            if let Some(quoted) = extract_quoted(value) {
                record.definition = quoted;
            }
        } else if let Some(value) = line.strip_prefix("is_a: ") {
            if let Some(parent) = value.split_whitespace().next() {
                record.is_a.push(parent.to_string());
            }
        }
    }
    if let Some(done) = id.take() {
        store.insert(done, record);
    }
    Ok(store)
}

fn extract_quoted(value: &str) -> Option<String> {
    let start = value.find('"')? + 1;
    let end = value[start..].find('"')? + start;
    Some(value[start..end].to_string())
}

// ── Tests ────────────────────────────────────────────────────────────────
