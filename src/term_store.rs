use std::path::Path;

use crate::{write_atomic, TermStore};

/// Reads the full term store into memory.
pub(crate) fn load_term_store(path: &Path) -> Result<TermStore, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("read term store {}: {e}", path.display()))?;
    let store: TermStore =
        serde_json::from_str(&data).map_err(|e| format!("parse term store {}: {e}", path.display()))?;
    Ok(store)
}

/// Writes the full term store back in one atomic replace, key-sorted and
/// pretty-printed. serde_json emits unescaped UTF-8, so translated fields
/// stay readable in the file.
pub(crate) fn save_term_store(
    path: &Path,
    store: &TermStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(store)?;
    write_atomic(path, json.as_bytes())
}

// ── Tests ────────────────────────────────────────────────────────────────
