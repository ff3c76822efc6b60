// src/store.rs
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::error::StoreError;
use crate::model::Snapshot;
use crate::tsv;

/// Create `dir` (and parents) unless it already exists as a directory.
pub fn ensure_directory(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() && !dir.is_dir() {
        return Err(StoreError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| StoreError::Write { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

/// `<name>.tmp` next to `path`.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn read_text(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| StoreError::Read { path: path.to_path_buf(), source })
}

/// Write `contents` to a temp sibling and rename it over `path`, so readers
/// never see a half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let tmp = temp_sibling(path);
    let write = |p: &Path| -> std::io::Result<()> {
        let mut out = BufWriter::new(fs::File::create(p)?);
        out.write_all(contents)?;
        out.flush()
    };
    write(&tmp).map_err(|source| StoreError::Write { path: tmp.clone(), source })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        StoreError::Write { path: path.to_path_buf(), source }
    })
}

/// Previous snapshot. A missing file is an empty snapshot (first run).
pub fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    if !path.exists() {
        logf!("Store: {} not found, starting from an empty snapshot", path.display());
        return Ok(Vec::new());
    }
    let text = read_text(path)?;
    let snapshot: Snapshot = serde_json::from_str(&text)
        .map_err(|source| StoreError::Deserialization { path: path.to_path_buf(), source })?;
    logf!("Store: loaded {} records from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomic(path, json.as_bytes())?;
    logf!("Store: saved {} records to {}", snapshot.len(), path.display());
    Ok(())
}

/// Headed TSV.
pub fn write_table<S: AsRef<str>>(path: &Path, headers: &[&str], rows: &[Vec<S>]) -> Result<(), StoreError> {
    write_atomic(path, tsv::rows_to_string(headers, rows).as_bytes())?;
    logf!("Store: wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>, StoreError> {
    Ok(tsv::parse_rows(&read_text(path)?))
}
