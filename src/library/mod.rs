//! Locally tracked reading state: read episodes and favorite series.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::library::error::LibraryError;
use crate::model::ReadEpisode;

pub mod error;
pub mod json_library;
pub mod memory_library;

pub use json_library::JsonFileLibrary;
pub use memory_library::MemoryLibrary;

/// Local store the episode service consults and updates.
pub trait Library: Send + Sync {
    /// Read records of the given series, oldest first.
    fn read_episodes(&self, toon_id: &str) -> Result<Vec<ReadEpisode>, LibraryError>;

    /// Records that an episode was opened. Recording twice is a no-op.
    fn mark_read(&self, toon_id: &str, episode_id: &str) -> Result<(), LibraryError>;

    fn add_favorite(&self, toon_id: &str) -> Result<(), LibraryError>;

    fn remove_favorite(&self, toon_id: &str) -> Result<(), LibraryError>;

    fn is_favorite(&self, toon_id: &str) -> Result<bool, LibraryError>;
}

/// Serializable snapshot shared by the library implementations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryState {
    #[serde(default)]
    pub read: Vec<ReadEpisode>,
    #[serde(default)]
    pub favorites: BTreeSet<String>,
}

impl LibraryState {
    pub fn read_episodes(&self, toon_id: &str) -> Vec<ReadEpisode> {
        self.read
            .iter()
            .filter(|r| r.toon_id == toon_id)
            .cloned()
            .collect()
    }

    /// Returns false when the record already existed.
    pub fn mark_read(&mut self, toon_id: &str, episode_id: &str) -> bool {
        let exists = self
            .read
            .iter()
            .any(|r| r.toon_id == toon_id && r.episode_id.as_deref() == Some(episode_id));
        if !exists {
            self.read.push(ReadEpisode::new(toon_id, episode_id));
        }
        !exists
    }
}
