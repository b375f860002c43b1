use std::collections::BTreeMap;
use std::path::Path;

use half::f16;

use crate::write_atomic;

const SNAPSHOT_MAGIC: &[u8; 4] = b"OGV1";
const SNAPSHOT_VERSION: u16 = 1;
const SNAPSHOT_HEADER_LEN: usize = 14;

/// The embedding store: identifier to reduced vector. Doubles as the
/// resume checkpoint for the embedding pass; membership means done.
pub(crate) type VectorMap = BTreeMap<String, Vec<f16>>;

fn snapshot_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

/// Loads the vector snapshot. A missing file is an empty map; a file that
/// exists but does not decode is an error, never silently dropped.
pub(crate) fn load_snapshot(path: &Path) -> Result<VectorMap, Box<dyn std::error::Error>> {
    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(VectorMap::new()),
        Err(e) => return Err(e.into()),
    };
    if data.len() < SNAPSHOT_HEADER_LEN || &data[0..4] != SNAPSHOT_MAGIC {
        return Err(format!("{} is not an ontoglot snapshot", path.display()).into());
    }
    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != SNAPSHOT_VERSION {
        return Err(format!("unsupported snapshot version: {version}").into());
    }
    let len = u64::from_le_bytes(data[6..SNAPSHOT_HEADER_LEN].try_into()?) as usize;
    if data.len() < SNAPSHOT_HEADER_LEN + len {
        return Err("snapshot truncated".into());
    }
    let decompressed = zstd::decode_all(&data[SNAPSHOT_HEADER_LEN..SNAPSHOT_HEADER_LEN + len])?;
    let (map, _) = bincode::serde::decode_from_slice(&decompressed, snapshot_config())?;
    Ok(map)
}

/// Writes the full snapshot in one atomic replace. Called once per run,
/// after the in-memory map (old vectors plus new) is assembled.
pub(crate) fn save_snapshot(path: &Path, map: &VectorMap) -> Result<(), Box<dyn std::error::Error>> {
    let encoded = bincode::serde::encode_to_vec(map, snapshot_config())?;
    let compressed = zstd::encode_all(encoded.as_slice(), 3)?;
    let mut buf = Vec::with_capacity(SNAPSHOT_HEADER_LEN + compressed.len());
    buf.extend_from_slice(SNAPSHOT_MAGIC);
    buf.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(compressed.len() as u64).to_le_bytes());
    buf.extend(compressed);
    write_atomic(path, &buf)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_snapshot_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("ontoglot_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(format!("test_snapshot_{}_{name}.bin", std::process::id()))
    }

    fn sample_map() -> VectorMap {
        let mut map = VectorMap::new();
        map.insert(
            "HP:0000001".to_string(),
            vec![f16::from_f32(0.5), f16::from_f32(-1.25)],
        );
        map.insert(
            "HP:0000118".to_string(),
            vec![f16::from_f32(3.75), f16::from_f32(0.0625), f16::from_f32(2.0)],
        );
        map
    }

    #[test]
    fn test_missing_file_is_empty_map() {
        let path = temp_snapshot_path("missing");
        let _ = std::fs::remove_file(&path);
        let map = load_snapshot(&path).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let path = temp_snapshot_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        let map = sample_map();
        save_snapshot(&path, &map).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, map);

        // Stored bits, not just approximate values.
        let original: Vec<u16> = map["HP:0000001"].iter().map(|v| v.to_bits()).collect();
        let reloaded: Vec<u16> = loaded["HP:0000001"].iter().map(|v| v.to_bits()).collect();
        assert_eq!(original, reloaded);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_resave_preserves_existing_bytes() {
        let path = temp_snapshot_path("resave");
        let _ = std::fs::remove_file(&path);

        let map = sample_map();
        save_snapshot(&path, &map).unwrap();
        let first = std::fs::read(&path).unwrap();

        // A second run that adds nothing must reproduce the same file.
        let loaded = load_snapshot(&path).unwrap();
        save_snapshot(&path, &loaded).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_garbage_is_an_error() {
        let path = temp_snapshot_path("garbage");
        std::fs::write(&path, b"definitely not a snapshot").unwrap();
        assert!(load_snapshot(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_truncated_is_an_error() {
        let path = temp_snapshot_path("truncated");
        let _ = std::fs::remove_file(&path);

        save_snapshot(&path, &sample_map()).unwrap();
        let full = std::fs::read(&path).unwrap();
        std::fs::write(&path, &full[..full.len() - 4]).unwrap();
        assert!(load_snapshot(&path).is_err());

        std::fs::remove_file(&path).ok();
    }
}
