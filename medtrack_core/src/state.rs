//! Snapshot persistence for the status store, with file locking.
//!
//! The store itself never touches the filesystem. Hosts that want to keep
//! state between runs save and load a JSON snapshot of the registry and
//! event log through these helpers.
//!
//! Every access goes through an advisory lock on a sidecar file next to the
//! snapshot (`state.json.lock` for `state.json`). The snapshot itself is
//! replaced by rename on every save, so it cannot carry the lock. Readers
//! take the lock shared; [`StatusStore::update`] holds it exclusively across
//! the whole load, modify and save sequence so concurrent writers never
//! overwrite each other.

use crate::{Error, Result, StatusStore};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Sidecar lock file guarding the snapshot at `path`
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "state".into());
    name.push(".lock");
    path.with_file_name(name)
}

fn open_lock(path: &Path) -> Result<File> {
    let parent = parent_dir(path)?;
    std::fs::create_dir_all(parent)?;

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path(path))?;
    Ok(file)
}

fn parent_dir(path: &Path) -> Result<&Path> {
    path.parent()
        .ok_or_else(|| Error::State(format!("state path {} has no parent", path.display())))
}

impl StatusStore {
    /// Load a store snapshot under a shared lock
    ///
    /// Returns an empty store if the file doesn't exist. A file that exists
    /// but cannot be parsed is an error: medication history is never
    /// silently replaced with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let lock = open_lock(path)?;
        lock.lock_shared()?;
        let store = Self::read_snapshot(path);
        lock.unlock()?;
        store
    }

    /// Save a store snapshot under an exclusive lock
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let lock = open_lock(path)?;
        lock.lock_exclusive()?;
        let saved = self.write_snapshot(path);
        lock.unlock()?;
        saved
    }

    /// Load state, modify it, and save it back
    ///
    /// The exclusive lock is held from the read until the new snapshot is
    /// in place, so ids handed out by `f` stay unique across processes.
    /// Nothing is written when `f` fails, so rejected mutations never reach
    /// disk.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut StatusStore) -> Result<T>,
    {
        let lock = open_lock(path)?;
        lock.lock_exclusive()?;

        let mut store = if path.exists() {
            Self::read_snapshot(path)?
        } else {
            Self::default()
        };
        let value = f(&mut store)?;
        store.write_snapshot(path)?;

        lock.unlock()?;
        Ok(value)
    }

    fn read_snapshot(path: &Path) -> Result<Self> {
        let mut contents = String::new();
        std::io::BufReader::new(File::open(path)?).read_to_string(&mut contents)?;

        let store = serde_json::from_str::<StatusStore>(&contents).map_err(|e| {
            tracing::warn!("Failed to parse state file {:?}: {}", path, e);
            Error::State(format!("corrupt state file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            "Loaded {} medications and {} dose events from {:?}",
            store.medications().len(),
            store.events().len(),
            path
        );
        Ok(store)
    }

    fn write_snapshot(&self, path: &Path) -> Result<()> {
        let temp = NamedTempFile::new_in(parent_dir(path)?)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved state to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::{Frequency, TimeSlot};

    fn slot(label: &str) -> TimeSlot {
        TimeSlot::new(label).unwrap()
    }

    fn sample_store() -> StatusStore {
        let mut store = StatusStore::new();
        let med = store
            .add_medication("Aspirin", "100mg", vec![slot("Morning")], Frequency::Weekly)
            .unwrap();
        store
            .record_dose(med.id, parse_date("2024-01-01").unwrap(), slot("Morning"), true)
            .unwrap();
        store
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let store = sample_store();
        store.save(&state_path).unwrap();

        let loaded = StatusStore::load(&state_path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(
            loaded.medications()[0].first_taken,
            Some(parse_date("2024-01-01").unwrap())
        );
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("nonexistent.json");

        let store = StatusStore::load(&state_path).unwrap();
        assert!(store.medications().is_empty());
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_corrupted_state_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("corrupted.json");
        std::fs::write(&state_path, "{ invalid json }").unwrap();

        let result = StatusStore::load(&state_path);
        assert!(matches!(result, Err(Error::State(_))));
        // The corrupt file is left in place for manual recovery
        assert!(state_path.exists());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let med = StatusStore::update(&state_path, |store| {
            store.add_medication("Metformin", "500mg", vec![slot("Evening")], Frequency::Daily)
        })
        .unwrap();

        let loaded = StatusStore::load(&state_path).unwrap();
        assert_eq!(loaded.medication(med.id), Some(&med));
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let result = StatusStore::update(&state_path, |store| {
            store.add_medication("", "500mg", vec![slot("Evening")], Frequency::Daily)
        });

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(!state_path.exists());
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        sample_store().save(&state_path).unwrap();

        // Only the snapshot and its lock file remain, no stray temp files
        assert!(state_path.exists());
        let mut names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["state.json", "state.json.lock"]);
    }

    #[test]
    fn test_lock_path_is_sidecar() {
        assert_eq!(
            lock_path(Path::new("/data/medtrack/state.json")),
            PathBuf::from("/data/medtrack/state.json.lock")
        );
    }

    #[test]
    fn test_concurrent_updates_keep_every_medication() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let state_path = state_path.clone();
                std::thread::spawn(move || {
                    StatusStore::update(&state_path, |store| {
                        store.add_medication(
                            &format!("Med {}", i),
                            "1mg",
                            vec![slot("Morning")],
                            Frequency::Daily,
                        )
                    })
                    .unwrap()
                })
            })
            .collect();

        let mut ids: Vec<u32> = handles
            .into_iter()
            .map(|h| h.join().unwrap().id.0)
            .collect();
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        let loaded = StatusStore::load(&state_path).unwrap();
        assert_eq!(loaded.medications().len(), 8);
    }

    #[test]
    fn test_concurrent_doses_keep_every_event() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        sample_store().save(&state_path).unwrap();

        let handles: Vec<_> = (10..18)
            .map(|day| {
                let state_path = state_path.clone();
                std::thread::spawn(move || {
                    let date = parse_date(&format!("2024-01-{}", day)).unwrap();
                    StatusStore::update(&state_path, |store| {
                        store.record_dose(crate::MedicationId(1), date, slot("Morning"), true)
                    })
                    .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded = StatusStore::load(&state_path).unwrap();
        // Sample day plus eight concurrent days
        assert_eq!(loaded.events().dates().count(), 9);
        assert_eq!(
            loaded.medications()[0].first_taken,
            Some(parse_date("2024-01-01").unwrap())
        );
    }
}
