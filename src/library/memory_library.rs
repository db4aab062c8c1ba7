use std::sync::RwLock;

use log::debug;

use crate::library::Library;
use crate::library::LibraryState;
use crate::library::error::LibraryError;
use crate::model::ReadEpisode;

/// Process-local [`Library`]; nothing survives a restart.
#[derive(Default)]
pub struct MemoryLibrary {
    state: RwLock<LibraryState>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LibraryState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl Library for MemoryLibrary {
    fn read_episodes(&self, toon_id: &str) -> Result<Vec<ReadEpisode>, LibraryError> {
        let state = self.state.read().map_err(|_| LibraryError::Poisoned)?;
        Ok(state.read_episodes(toon_id))
    }

    fn mark_read(&self, toon_id: &str, episode_id: &str) -> Result<(), LibraryError> {
        let mut state = self.state.write().map_err(|_| LibraryError::Poisoned)?;
        if !state.mark_read(toon_id, episode_id) {
            debug!("Episode {episode_id} of toon_id {toon_id} already marked read");
        }
        Ok(())
    }

    fn add_favorite(&self, toon_id: &str) -> Result<(), LibraryError> {
        let mut state = self.state.write().map_err(|_| LibraryError::Poisoned)?;
        state.favorites.insert(toon_id.to_string());
        Ok(())
    }

    fn remove_favorite(&self, toon_id: &str) -> Result<(), LibraryError> {
        let mut state = self.state.write().map_err(|_| LibraryError::Poisoned)?;
        state.favorites.remove(toon_id);
        Ok(())
    }

    fn is_favorite(&self, toon_id: &str) -> Result<bool, LibraryError> {
        let state = self.state.read().map_err(|_| LibraryError::Poisoned)?;
        Ok(state.favorites.contains(toon_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_are_per_series() {
        let library = MemoryLibrary::new();
        library.mark_read("a", "1").unwrap();
        library.mark_read("a", "1").unwrap();
        library.mark_read("b", "2").unwrap();

        assert_eq!(
            library.read_episodes("a").unwrap(),
            vec![ReadEpisode::new("a", "1")]
        );
        assert!(library.read_episodes("c").unwrap().is_empty());
    }

    #[test]
    fn test_favorites() {
        let library = MemoryLibrary::new();
        library.add_favorite("a").unwrap();
        assert!(library.is_favorite("a").unwrap());

        library.remove_favorite("a").unwrap();
        library.remove_favorite("missing").unwrap();
        assert!(!library.is_favorite("a").unwrap());
    }
}
