use crate::{
    field_present, reduce_vector, truncate_chars, ClientError, EmbeddingBackend, Pacer,
    PassOutcome, TermRecord, TermStore, VectorMap,
};

/// Builds the text blob the embedding service sees for one term. Sentinel
/// fields are absent, not text.
pub(crate) fn embedding_text(term: &TermRecord) -> String {
    let mut parts = Vec::new();
    for field in [
        &term.name,
        &term.definition,
        &term.name_cn,
        &term.definition_cn,
    ] {
        if field_present(field) {
            parts.push(field.trim());
        }
    }
    parts.join(" ")
}

/// Runs the embedding pass over every term without a vector in the loaded
/// snapshot. New vectors accumulate in memory only; the caller persists
/// the map afterwards, on success and on the error path alike, so an
/// early stop never discards the portion already fetched.
pub(crate) fn run_embedding_pass(
    store: &TermStore,
    vectors: &mut VectorMap,
    backend: &dyn EmbeddingBackend,
    pacer: &Pacer,
    max_input_chars: usize,
    embed_dim: usize,
) -> Result<PassOutcome, ClientError> {
    let mut outcome = PassOutcome::default();
    for (id, term) in store {
        if vectors.contains_key(id) {
            outcome.skipped += 1;
            continue;
        }
        let text = embedding_text(term);
        if text.trim().is_empty() {
            outcome.skipped += 1;
            continue;
        }
        println!("[embed] {id}");

        let text = if text.chars().count() > max_input_chars {
            eprintln!(
                "[embed] warning: {id} input too long, truncated to {max_input_chars} chars"
            );
            truncate_chars(&text, max_input_chars)
        } else {
            text
        };

        let raw = match backend.embed(&text) {
            Ok(raw) => raw,
            Err(err) => {
                eprintln!("[embed] stopping at {id}: {err}");
                return Err(err);
            }
        };
        vectors.insert(id.clone(), reduce_vector(&raw, embed_dim));
        outcome.processed += 1;
        pacer.pause();
    }
    Ok(outcome)
}

// ── Tests ────────────────────────────────────────────────────────────────
