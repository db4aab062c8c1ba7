//! Domain types for series, episodes and local read state.

use std::collections::HashSet;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Format providers use for `update_date`, e.g. "2019-04-25 00:00:00".
const UPDATE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifies one page of a series' episode list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EpisodeRequest {
    pub toon_id: String,
    /// Zero-based page index.
    pub page: u32,
}

impl EpisodeRequest {
    pub fn new(toon_id: impl Into<String>, page: u32) -> Self {
        Self {
            toon_id: toon_id.into(),
            page,
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.page == 0
    }
}

/// A single installment of a series.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub id: String,
    pub toon_id: String,
    pub title: String,
    /// Thumbnail URL.
    pub image: String,
    /// Raw timestamp as the provider sent it.
    pub update_date: String,
    #[serde(default)]
    pub is_read: bool,
}

impl EpisodeInfo {
    /// Parses `update_date`, accepting the provider format and RFC 3339.
    ///
    /// Provider timestamps carry no zone and are read as UTC.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.update_date.trim();
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, UPDATE_DATE_FORMAT) {
            return Some(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

/// One fetched page of episodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpisodeResult {
    /// Episodes in the order the provider returned them.
    pub episodes: Vec<EpisodeInfo>,
    /// False once the provider reports the end of the list.
    pub has_more: bool,
    /// Chronologically first episode of the series. Only resolved on page 0.
    pub first: Option<EpisodeInfo>,
}

impl EpisodeResult {
    pub fn new(episodes: Vec<EpisodeInfo>) -> Self {
        Self {
            episodes,
            ..Default::default()
        }
    }
}

/// A series as the reader knows it locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToonInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_favorite: bool,
}

impl ToonInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A locally stored "episode was opened" record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadEpisode {
    pub toon_id: String,
    /// Older records may lack an episode id; those never match anything.
    #[serde(default)]
    pub episode_id: Option<String>,
}

impl ReadEpisode {
    pub fn new(toon_id: impl Into<String>, episode_id: impl Into<String>) -> Self {
        Self {
            toon_id: toon_id.into(),
            episode_id: Some(episode_id.into()),
        }
    }
}

/// Marks every episode whose id matches a read record.
///
/// Unmatched episodes keep their current flag.
pub fn apply_read(episodes: &mut [EpisodeInfo], read: &[ReadEpisode]) {
    let read_ids: HashSet<&str> = read
        .iter()
        .filter_map(|r| r.episode_id.as_deref())
        .collect();

    for episode in episodes.iter_mut() {
        if read_ids.contains(episode.id.as_str()) {
            episode.is_read = true;
        }
    }
}

/// Distinct episode ids of the read records, in first-seen order.
pub fn distinct_read_ids(read: &[ReadEpisode]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids = Vec::new();
    for id in read.iter().filter_map(|r| r.episode_id.as_deref()) {
        if seen.insert(id) {
            ids.push(id.to_string());
        }
    }
    ids
}
