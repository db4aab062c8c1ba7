//! [`Library`] persisted as a single JSON document.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::RwLock;

use log::debug;
use log::info;

use crate::library::Library;
use crate::library::LibraryState;
use crate::library::error::LibraryError;
use crate::model::ReadEpisode;

const LIBRARY_FILE: &str = "library.json";

pub struct JsonFileLibrary {
    path: PathBuf,
    state: RwLock<LibraryState>,
}

impl JsonFileLibrary {
    /// Opens `library.json` under `data_path`, creating the directory if needed.
    pub fn open(data_path: &Path) -> Result<Self, LibraryError> {
        fs::create_dir_all(data_path).map_err(|e| io_error(data_path, e))?;
        let path = data_path.join(LIBRARY_FILE);

        let state = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            let state: LibraryState = serde_json::from_str(&raw)?;
            info!(
                "Loaded library from {} ({} read records, {} favorites)",
                path.display(),
                state.read.len(),
                state.favorites.len()
            );
            state
        } else {
            debug!("No library at {}, starting empty", path.display());
            LibraryState::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` to a copy of the state, writes it to disk, then swaps it in.
    ///
    /// The in-memory state only changes once the file write succeeded.
    fn update<F>(&self, f: F) -> Result<(), LibraryError>
    where
        F: FnOnce(&mut LibraryState),
    {
        let mut state = self.state.write().map_err(|_| LibraryError::Poisoned)?;
        let mut next = state.clone();
        f(&mut next);

        let raw = serde_json::to_string_pretty(&next)?;
        // Replace atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;

        *state = next;
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LibraryError {
    LibraryError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

impl Library for JsonFileLibrary {
    fn read_episodes(&self, toon_id: &str) -> Result<Vec<ReadEpisode>, LibraryError> {
        let state = self.state.read().map_err(|_| LibraryError::Poisoned)?;
        Ok(state.read_episodes(toon_id))
    }

    fn mark_read(&self, toon_id: &str, episode_id: &str) -> Result<(), LibraryError> {
        self.update(|state| {
            if !state.mark_read(toon_id, episode_id) {
                debug!("Episode {episode_id} of toon_id {toon_id} already marked read");
            }
        })
    }

    fn add_favorite(&self, toon_id: &str) -> Result<(), LibraryError> {
        self.update(|state| {
            state.favorites.insert(toon_id.to_string());
        })
    }

    fn remove_favorite(&self, toon_id: &str) -> Result<(), LibraryError> {
        self.update(|state| {
            state.favorites.remove(toon_id);
        })
    }

    fn is_favorite(&self, toon_id: &str) -> Result<bool, LibraryError> {
        let state = self.state.read().map_err(|_| LibraryError::Poisoned)?;
        Ok(state.favorites.contains(toon_id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;
    use std::time::UNIX_EPOCH;

    use super::*;

    fn temp_dir() -> PathBuf {
        let t = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("toon-episodes-test-{t}"))
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = temp_dir();
        {
            let library = JsonFileLibrary::open(&dir).unwrap();
            library.mark_read("5023", "51234").unwrap();
            library.add_favorite("5023").unwrap();
        }

        let library = JsonFileLibrary::open(&dir).unwrap();
        assert_eq!(
            library.read_episodes("5023").unwrap(),
            vec![ReadEpisode::new("5023", "51234")]
        );
        assert!(library.is_favorite("5023").unwrap());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let dir = temp_dir();
        let library = JsonFileLibrary::open(&dir).unwrap();
        library.mark_read("5023", "1").unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let result = library.add_favorite("5023");
        assert!(matches!(result, Err(LibraryError::Io { .. })));
        assert!(!library.is_favorite("5023").unwrap());

        assert!(library.mark_read("5023", "2").is_err());
        assert_eq!(
            library.read_episodes("5023").unwrap(),
            vec![ReadEpisode::new("5023", "1")]
        );
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(LIBRARY_FILE), "{not json").unwrap();

        assert!(matches!(
            JsonFileLibrary::open(&dir),
            Err(LibraryError::Corrupt(_))
        ));

        let _ = fs::remove_dir_all(dir);
    }
}
