//! # File I/O Module
//!
//! Study files and the JSON inputs of a run:
//! - **Atomic saves**: write `.tmp`, fsync, rename
//! - **Study lock**: one writer per `.dbu`, held for the life of a [`FileLock`]
//! - **Version validation**: reject studies from a newer schema
//!
//! ## File Format
//!
//! Studies are `.dbu` files containing JSON. While a study is locked a
//! `.dbu.lock` file next to it names the holder. The OS lock on that file
//! decides ownership, so a lock file left by a crashed process is taken
//! over on the next acquire.
//!
//! Vehicle and geometry snapshots are plain JSON inputs produced elsewhere;
//! [`load_json`] reads them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drag_core::file_io::{save_study, FileLock};
//! use drag_core::study::DragStudy;
//! use std::path::Path;
//!
//! let study = DragStudy::new("Cruise");
//! let path = Path::new("cruise.dbu");
//!
//! let lock = FileLock::acquire(path, "analyst").unwrap();
//! save_study(&study, path).unwrap();
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{DragError, DragResult};
use crate::study::{DragStudy, SCHEMA_VERSION};

/// Study file extension
pub const STUDY_EXTENSION: &str = "dbu";

/// Who holds a study lock, as written to the `.dbu.lock` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockHolder {
    pub user: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

/// Exclusive lock on a study file, released on drop
pub struct FileLock {
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub holder: LockHolder,
}

impl FileLock {
    /// Lock the study at `path` for `user`.
    ///
    /// Returns `DragError::FileLocked` naming the holder when another
    /// process has it.
    pub fn acquire(path: &Path, user: impl Into<String>) -> DragResult<Self> {
        let lock_path = lock_path_for(path);
        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| DragError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(locked_error(path, read_holder(&mut lock_file)));
        }
        if let Some(previous) = read_holder(&mut lock_file) {
            warn!(holder = %previous.user, pid = previous.pid, "taking over abandoned study lock");
        }

        let holder = LockHolder {
            user: user.into(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&holder).map_err(|e| DragError::serialization(e.to_string()))?;
        let record = |file: &mut File| -> std::io::Result<()> {
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.write_all(json.as_bytes())?;
            file.sync_all()
        };
        record(&mut lock_file)
            .map_err(|e| DragError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), "study lock acquired");
        Ok(FileLock {
            lock_path,
            _lock_file: lock_file,
            holder,
        })
    }

    /// Holder of a live lock on the study at `path`, `None` when it is free
    pub fn holder_of(path: &Path) -> Option<LockHolder> {
        let lock_path = lock_path_for(path);
        let mut file = OpenOptions::new().read(true).write(true).open(&lock_path).ok()?;
        if file.try_lock_exclusive().is_ok() {
            // Dropping the handle releases the lock just taken
            return None;
        }
        Some(read_holder(&mut file).unwrap_or(LockHolder {
            user: "another process".to_string(),
            pid: 0,
            locked_at: DateTime::<Utc>::default(),
        }))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(study_path: &Path) -> PathBuf {
    let mut lock_path = study_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Holder recorded in an open lock file; `None` when empty or unreadable
fn read_holder(file: &mut File) -> Option<LockHolder> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn locked_error(path: &Path, holder: Option<LockHolder>) -> DragError {
    match holder {
        Some(h) => DragError::file_locked(
            path.display().to_string(),
            format!("{} (pid {})", h.user, h.pid),
            h.locked_at.to_rfc3339(),
        ),
        None => DragError::file_locked(path.display().to_string(), "another process", "unknown"),
    }
}

/// Write `contents` next to `path` and rename it into place.
///
/// Serialize, write `<path>.tmp`, fsync, rename. An interrupted save never
/// leaves a half-written file at `path`.
fn write_atomic(contents: &[u8], path: &Path) -> DragResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        DragError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        DragError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        DragError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DragError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp_path = path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

fn read_to_string(path: &Path) -> DragResult<String> {
    let mut file = File::open(path).map_err(|e| {
        DragError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        DragError::file_error("read", path.display().to_string(), e.to_string())
    })?;
    Ok(contents)
}

/// Save a study with atomic write semantics.
///
/// # Example
///
/// ```rust,no_run
/// use drag_core::file_io::save_study;
/// use drag_core::study::DragStudy;
/// use std::path::Path;
///
/// let study = DragStudy::new("Cruise");
/// save_study(&study, Path::new("cruise.dbu"))?;
/// # Ok::<(), drag_core::errors::DragError>(())
/// ```
pub fn save_study(study: &DragStudy, path: &Path) -> DragResult<()> {
    let json = serde_json::to_string_pretty(study).map_err(|e| DragError::serialization(e.to_string()))?;
    write_atomic(json.as_bytes(), path)?;
    debug!(path = %path.display(), "study saved");
    Ok(())
}

/// Load a study from a file.
///
/// # Returns
///
/// * `Ok(DragStudy)` - Successfully loaded study
/// * `Err(DragError::VersionMismatch)` - File version is incompatible
/// * `Err(DragError::SerializationError)` - Invalid JSON
/// * `Err(DragError::FileError)` - I/O error
pub fn load_study(path: &Path) -> DragResult<DragStudy> {
    let contents = read_to_string(path)?;

    let study: DragStudy = serde_json::from_str(&contents)
        .map_err(|e| DragError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&study.meta.version)?;

    Ok(study)
}

/// Load a study along with the holder of any live lock on it
pub fn load_study_with_lock_check(path: &Path) -> DragResult<(DragStudy, Option<LockHolder>)> {
    let study = load_study(path)?;
    Ok((study, FileLock::holder_of(path)))
}

/// Read any JSON input document (vehicle, geometry snapshot)
pub fn load_json<T: DeserializeOwned>(path: &Path) -> DragResult<T> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| DragError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Write a text export (CSV, JSON report) atomically
pub fn save_text(contents: &str, path: &Path) -> DragResult<()> {
    write_atomic(contents.as_bytes(), path)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> DragResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || DragError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() || file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // 0.x: a newer minor is a breaking change
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::ExcrescenceKind;
    use crate::geometry::Vehicle;
    use std::env::temp_dir;

    fn temp_study_path(name: &str) -> PathBuf {
        temp_dir().join(format!("dragline_test_{}.dbu", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let study_path = Path::new("/path/to/cruise.dbu");
        assert_eq!(lock_path_for(study_path), Path::new("/path/to/cruise.dbu.lock"));
        assert_eq!(tmp_path_for(study_path), Path::new("/path/to/cruise.dbu.tmp"));
    }


    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_study_path("roundtrip");

        let mut study = DragStudy::new("Cruise");
        study.settings.sref = 174.0;
        study.add_excrescence("Antenna", ExcrescenceKind::Count, 1.5);
        study.add_excrescence("Margin", ExcrescenceKind::Margin, 5.0);
        save_study(&study, &path).unwrap();

        let loaded = load_study(&path).unwrap();
        assert_eq!(loaded.meta.name, "Cruise");
        assert!((loaded.settings.sref - 174.0).abs() < 1e-12);
        assert_eq!(loaded.excrescences, study.excrescences);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_study_path("atomic");

        save_study(&DragStudy::new("Atomic"), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_study_path("lock_test");
        save_study(&DragStudy::new("Locked"), &path).unwrap();

        let lock = FileLock::acquire(&path, "analyst").unwrap();
        assert_eq!(lock.holder.user, "analyst");
        assert_eq!(lock.holder.pid, std::process::id());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::holder_of(&path).is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let path = temp_study_path("lock_twice");
        save_study(&DragStudy::new("Locked"), &path).unwrap();

        let lock = FileLock::acquire(&path, "first").unwrap();
        let err = FileLock::acquire(&path, "second").err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.to_string().contains("first"));

        let (_, holder) = load_study_with_lock_check(&path).unwrap();
        assert_eq!(holder.map(|h| h.user), Some("first".to_string()));

        drop(lock);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_abandoned_lock_file_is_taken_over() {
        let path = temp_study_path("lock_abandoned");
        let stale = LockHolder {
            user: "crashed".to_string(),
            pid: 1,
            locked_at: Utc::now(),
        };
        fs::write(lock_path_for(&path), serde_json::to_string(&stale).unwrap()).unwrap();
        assert!(FileLock::holder_of(&path).is_none());

        let lock = FileLock::acquire(&path, "analyst").unwrap();
        assert_eq!(lock.holder.user, "analyst");

        drop(lock);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_newer_study_rejected() {
        let path = temp_study_path("newer");
        let mut study = DragStudy::new("Future");
        study.meta.version = "0.9.0".to_string();
        save_study(&study, &path).unwrap();

        let err = load_study(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_study_path("lock_check");
        save_study(&DragStudy::new("Checked"), &path).unwrap();

        let (loaded, lock_info) = load_study_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.name, "Checked");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_json_vehicle() {
        let path = temp_dir().join("dragline_test_vehicle.json");
        let vehicle = Vehicle::default();
        save_text(&serde_json::to_string(&vehicle).unwrap(), &path).unwrap();

        let loaded: Vehicle = load_json(&path).unwrap();
        assert_eq!(loaded.components.len(), vehicle.components.len());

        let missing: DragResult<Vehicle> = load_json(&temp_dir().join("dragline_missing.json"));
        assert_eq!(missing.unwrap_err().error_code(), "FILE_ERROR");

        let _ = fs::remove_file(&path);
    }
}
