//! On-disk snapshot format
//!
//! ```text
//! +-------+-------------+------------------------------------+
//! | AGBF  | version u16 | bincode { address_count, filter }  |
//! | 4 B   | LE, 2 B     | varint encoding                    |
//! +-------+-------------+------------------------------------+
//! ```
//!
//! Writes go to a temporary file in the target directory which is then
//! renamed over the target, so a watcher never sees a half-written file.

use std::fs;
use std::io::Write;
use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::domain::BloomFilter;
use crate::error::FilterError;

/// File magic
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"AGBF";

/// Current format version
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 6;

#[derive(Deserialize)]
struct SnapshotBody {
    address_count: u64,
    filter: BloomFilter,
}

#[derive(Serialize)]
struct SnapshotBodyRef<'a> {
    address_count: u64,
    filter: &'a BloomFilter,
}

/// Encode `filter` as a complete snapshot file image.
pub fn encode_snapshot(filter: &BloomFilter) -> Result<Vec<u8>, FilterError> {
    let body = SnapshotBodyRef {
        address_count: filter.elements_inserted() as u64,
        filter,
    };
    let encoded = bincode::DefaultOptions::new()
        .serialize(&body)
        .map_err(|e| FilterError::SerializationError(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + encoded.len());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    out.extend_from_slice(&encoded);
    Ok(out)
}

/// Decode and validate a snapshot file image.
pub fn decode_snapshot(bytes: &[u8]) -> Result<BloomFilter, FilterError> {
    if bytes.len() < HEADER_LEN {
        return Err(FilterError::CorruptSnapshot(format!(
            "{} bytes is shorter than the header",
            bytes.len()
        )));
    }
    if bytes[..4] != SNAPSHOT_MAGIC {
        return Err(FilterError::CorruptSnapshot("bad magic".to_string()));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != SNAPSHOT_VERSION {
        return Err(FilterError::UnsupportedSnapshotVersion(version));
    }

    let payload = &bytes[HEADER_LEN..];
    // A well-formed body never needs more than the bytes that are there
    let body: SnapshotBody = bincode::DefaultOptions::new()
        .with_limit(payload.len() as u64)
        .deserialize(payload)
        .map_err(|e| FilterError::CorruptSnapshot(e.to_string()))?;

    body.filter.validate()?;
    if body.address_count != body.filter.elements_inserted() as u64 {
        return Err(FilterError::CorruptSnapshot(format!(
            "header count {} disagrees with filter count {}",
            body.address_count,
            body.filter.elements_inserted()
        )));
    }
    Ok(body.filter)
}

/// Read and decode the snapshot at `path`.
pub fn read_snapshot(path: &Path) -> Result<BloomFilter, FilterError> {
    let bytes = fs::read(path).map_err(|e| FilterError::io(path, e))?;
    decode_snapshot(&bytes)
}

/// Atomically replace the file at `path` with a snapshot of `filter`.
pub fn write_snapshot(path: &Path, filter: &BloomFilter) -> Result<(), FilterError> {
    let bytes = encode_snapshot(filter)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| FilterError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| FilterError::io(dir, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| FilterError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| FilterError::io(path, e.error))?;
    Ok(())
}
