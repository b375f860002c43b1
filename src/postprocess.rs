use half::f16;

/// Reduces a raw service vector for storage: every component cast to
/// binary16, then only the first `dim` components kept. Prefix truncation
/// is the storage format's dimensionality contract; stored vectors must
/// stay comparable across runs, so the cut is always the same.
pub(crate) fn reduce_vector(raw: &[f32], dim: usize) -> Vec<f16> {
    raw.iter().take(dim).map(|&v| f16::from_f32(v)).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────
