//! Presentation state for one series' episode list.

use std::sync::Arc;

use log::debug;
use log::error;
use tokio::sync::Mutex;
use tokio::sync::broadcast;
use tokio::sync::watch;
use tracing::instrument;

use crate::event::EpisodeEvent;
use crate::feed::EpisodeProvider;
use crate::library::Library;
use crate::model::EpisodeInfo;
use crate::model::EpisodeRequest;
use crate::model::EpisodeResult;
use crate::model::ToonInfo;
use crate::model::apply_read;
use crate::model::distinct_read_ids;
use crate::service::error::ServiceError;

const INIT_PAGE: u32 = 0;
const EVENT_CAPACITY: usize = 32;

struct PagingState {
    page: u32,
    has_more: bool,
    first: Option<EpisodeInfo>,
}

impl Default for PagingState {
    fn default() -> Self {
        Self {
            page: INIT_PAGE,
            has_more: true,
            first: None,
        }
    }
}

/// Sequences fetch, read-state merge and publish for a single series.
///
/// Outputs are exposed as channels: [`EpisodeService::episodes`] holds the most
/// recently loaded page, [`EpisodeService::events`] carries [`EpisodeEvent`]s,
/// [`EpisodeService::read_updates`] the ids of read episodes and
/// [`EpisodeService::favorite`] the series' favorite flag.
pub struct EpisodeService {
    info: ToonInfo,
    provider: Arc<dyn EpisodeProvider>,
    library: Arc<dyn Library>,
    /// Held for a whole load so only one request is in flight.
    paging: Mutex<PagingState>,
    episodes_tx: watch::Sender<Vec<EpisodeInfo>>,
    read_tx: watch::Sender<Vec<String>>,
    favorite_tx: watch::Sender<bool>,
    events_tx: broadcast::Sender<EpisodeEvent>,
}

impl EpisodeService {
    pub fn new(
        info: ToonInfo,
        provider: Arc<dyn EpisodeProvider>,
        library: Arc<dyn Library>,
    ) -> Self {
        let (episodes_tx, _) = watch::channel(Vec::new());
        let (read_tx, _) = watch::channel(Vec::new());
        let (favorite_tx, _) = watch::channel(info.is_favorite);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            info,
            provider,
            library,
            paging: Mutex::new(PagingState::default()),
            episodes_tx,
            read_tx,
            favorite_tx,
            events_tx,
        }
    }

    /// The series with its current favorite flag.
    pub fn info(&self) -> ToonInfo {
        ToonInfo {
            is_favorite: *self.favorite_tx.borrow(),
            ..self.info.clone()
        }
    }

    pub fn episodes(&self) -> watch::Receiver<Vec<EpisodeInfo>> {
        self.episodes_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<EpisodeEvent> {
        self.events_tx.subscribe()
    }

    pub fn read_updates(&self) -> watch::Receiver<Vec<String>> {
        self.read_tx.subscribe()
    }

    pub fn favorite(&self) -> watch::Receiver<bool> {
        self.favorite_tx.subscribe()
    }

    /// Rewinds to the first page.
    pub async fn initialize(&self) {
        *self.paging.lock().await = PagingState::default();
    }

    pub async fn has_more(&self) -> bool {
        self.paging.lock().await.has_more
    }

    /// Loads the next page.
    ///
    /// Returns `Ok(false)` without touching the provider once the last page
    /// was reached. On failure an [`EpisodeEvent::Error`] is emitted and the
    /// same page is retried by the next call.
    #[instrument(skip(self), fields(toon_id = %self.info.id))]
    pub async fn load(&self) -> Result<bool, ServiceError> {
        let mut paging = self.paging.lock().await;
        if !paging.has_more {
            debug!("No more episodes for toon_id: {}", self.info.id);
            return Ok(false);
        }

        self.emit(EpisodeEvent::Start);

        let request = EpisodeRequest::new(self.info.id.clone(), paging.page);
        let result = match self.fetch_page(&request).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "Failed to load episodes for toon_id {} (page {}): {e}",
                    request.toon_id, request.page
                );
                self.emit(EpisodeEvent::Error);
                return Err(e);
            }
        };

        paging.has_more = result.has_more;
        if request.is_first_page() {
            paging.first = result.first;
        }
        if !result.episodes.is_empty() {
            self.episodes_tx.send_replace(result.episodes);
        }
        paging.page += 1;

        self.emit(EpisodeEvent::Loaded);
        Ok(true)
    }

    async fn fetch_page(&self, request: &EpisodeRequest) -> Result<EpisodeResult, ServiceError> {
        let mut result = self.provider.fetch_episodes(request).await?;
        let read = self.library.read_episodes(&request.toon_id)?;
        apply_read(&mut result.episodes, &read);
        Ok(result)
    }

    /// Republishes the ids of every read episode of the series.
    pub async fn read_update(&self) -> Result<(), ServiceError> {
        self.emit(EpisodeEvent::Start);

        let read = match self.library.read_episodes(&self.info.id) {
            Ok(read) => read,
            Err(e) => {
                error!("Failed to read history for toon_id {}: {e}", self.info.id);
                self.emit(EpisodeEvent::Error);
                return Err(e.into());
            }
        };

        self.read_tx.send_replace(distinct_read_ids(&read));
        self.emit(EpisodeEvent::Loaded);
        Ok(())
    }

    /// Emits [`EpisodeEvent::First`] if page 0 resolved a first episode.
    pub async fn request_first(&self) {
        let first = self.paging.lock().await.first.clone();
        if let Some(first) = first {
            self.emit(EpisodeEvent::First(first));
        }
    }

    pub fn set_favorite(&self, is_favorite: bool) -> Result<(), ServiceError> {
        if is_favorite {
            self.library.add_favorite(&self.info.id)?;
        } else {
            self.library.remove_favorite(&self.info.id)?;
        }

        self.favorite_tx.send_replace(is_favorite);
        self.emit(EpisodeEvent::UpdateFavorite {
            id: self.info.id.clone(),
            is_favorite,
        });
        Ok(())
    }

    /// Records that `episode_id` of this series was opened.
    pub fn mark_read(&self, episode_id: &str) -> Result<(), ServiceError> {
        Ok(self.library.mark_read(&self.info.id, episode_id)?)
    }

    fn emit(&self, event: EpisodeEvent) {
        // No receivers is fine.
        let _ = self.events_tx.send(event);
    }
}
