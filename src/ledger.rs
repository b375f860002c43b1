use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Durable record of which identifiers finished the translation pass. One
/// id per line, append-only; presence means "safe to skip on restart".
pub(crate) struct Ledger {
    done: HashSet<String>,
    file: File,
}

impl Ledger {
    /// Opens the ledger, creating it if missing, and scans every id into
    /// memory.
    pub(crate) fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;
        let mut done = HashSet::new();
        for line in BufReader::new(&file).lines() {
            let id = line?.trim().to_string();
            if !id.is_empty() {
                done.insert(id);
            }
        }
        Ok(Self { done, file })
    }

    pub(crate) fn len(&self) -> usize {
        self.done.len()
    }

    pub(crate) fn is_done(&self, id: &str) -> bool {
        self.done.contains(id)
    }

    /// Appends the id and flushes before returning; the run must not
    /// advance past an item whose completion is not on disk. Ids already
    /// present are not written twice.
    pub(crate) fn mark_done(&mut self, id: &str) -> Result<(), Box<dyn std::error::Error>> {
        if !self.done.insert(id.to_string()) {
            return Ok(());
        }
        writeln!(self.file, "{id}")?;
        self.file.flush()?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
