//! Events the episode service publishes to its presentation layer.

use crate::model::EpisodeInfo;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EpisodeEvent {
    /// A load or read-state refresh has started.
    Start,
    /// The operation that emitted [`EpisodeEvent::Start`] finished.
    Loaded,
    /// Answer to a first-episode request.
    First(EpisodeInfo),
    /// The last load failed. Details are logged, not carried.
    Error,
    UpdateFavorite { id: String, is_favorite: bool },
}
