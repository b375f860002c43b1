use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::{EnrichedRecord, TermRecord, TermStore};

/// Appends one enriched record as a single JSON line and flushes. The log
/// is the durable per-item trace of the translation pass; the ledger, not
/// this file, decides what counts as done.
pub(crate) fn append_record(
    path: &Path,
    record: &EnrichedRecord,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(record)?;
    writeln!(file, "{json}")?;
    file.flush()?;
    Ok(())
}

/// Replays the record log into a term store. Later lines win for a
/// repeated id. A line that does not parse is an error: silently dropping
/// a corrupt record would discard work the ledger says is finished.
pub(crate) fn replay_records(path: &Path) -> Result<TermStore, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("open record log {}: {e}", path.display()))?;
    let mut store = TermStore::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: EnrichedRecord = serde_json::from_str(&line)
            .map_err(|e| format!("record log line {}: {e}", lineno + 1))?;
        store.insert(
            record.id,
            TermRecord {
                name: record.name,
                definition: record.definition,
                name_cn: record.name_cn,
                definition_cn: record.definition_cn,
                is_a: Vec::new(),
            },
        );
    }
    Ok(store)
}

// ── Tests ────────────────────────────────────────────────────────────────
