use crate::TermStore;

/// Combines two term stores: every identifier in `incoming` replaces its
/// `base` counterpart, with the parent links dropped from the incoming
/// side. The result is key-sorted by construction.
pub(crate) fn merge_stores(base: TermStore, incoming: TermStore) -> TermStore {
    let mut merged = base;
    for (id, mut record) in incoming {
        record.is_a.clear();
        merged.insert(id, record);
    }
    merged
}

// ── Tests ────────────────────────────────────────────────────────────────
