use std::path::Path;

use chrono::Utc;

use crate::{
    append_record, field_present, EnrichedRecord, Ledger, Pacer, PassOutcome, TermStore,
    TranslationBackend, EMPTY_FIELD, ROOT_NAME, ROOT_NAME_CN,
};

/// Runs the translation pass over every term not yet in the ledger.
///
/// Per-item durability: the record line and the ledger line are both on
/// disk before the loop advances, so a kill at any point costs at most the
/// item in flight. Any client failure stops the pass; completed work stays
/// checkpointed for the next run.
pub(crate) fn run_translation_pass(
    store: &TermStore,
    ledger: &mut Ledger,
    log_path: &Path,
    backend: &dyn TranslationBackend,
    pacer: &Pacer,
) -> Result<PassOutcome, Box<dyn std::error::Error>> {
    let mut outcome = PassOutcome::default();
    for (id, term) in store {
        if ledger.is_done(id) {
            outcome.skipped += 1;
            continue;
        }
        println!("[translate] {id}");

        let name_cn = if !field_present(&term.name) {
            EMPTY_FIELD.to_string()
        } else if term.name == ROOT_NAME {
            ROOT_NAME_CN.to_string()
        } else {
            backend.translate(&term.name)?
        };
        let definition_cn = if field_present(&term.definition) {
            backend.translate(&term.definition)?
        } else {
            EMPTY_FIELD.to_string()
        };

        append_record(
            log_path,
            &EnrichedRecord {
                id: id.clone(),
                name: term.name.clone(),
                definition: term.definition.clone(),
                name_cn,
                definition_cn,
                ts: Utc::now().timestamp(),
            },
        )?;
        ledger.mark_done(id)?;
        outcome.processed += 1;
        pacer.pause();
    }
    Ok(outcome)
}

// ── Tests ────────────────────────────────────────────────────────────────
