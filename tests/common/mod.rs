//! Common test utilities and mock implementations.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use toon_episodes::feed::BaseProvider;
use toon_episodes::feed::EpisodeProvider;
use toon_episodes::feed::ProviderInfo;
use toon_episodes::feed::error::FeedError;
use toon_episodes::feed::request::Network;
use toon_episodes::feed::request::ProviderRequest;
use toon_episodes::library::Library;
use toon_episodes::library::error::LibraryError;
use toon_episodes::model::EpisodeInfo;
use toon_episodes::model::EpisodeRequest;
use toon_episodes::model::EpisodeResult;
use toon_episodes::model::ReadEpisode;

/// Loads a test response file from the responses directory.
#[allow(dead_code)]
pub fn get_response(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/responses");
    path.push(filename);
    std::fs::read_to_string(path).expect("Failed to read response file")
}

#[allow(dead_code)]
pub fn episode(toon_id: &str, id: &str) -> EpisodeInfo {
    EpisodeInfo {
        id: id.to_string(),
        toon_id: toon_id.to_string(),
        title: format!("Episode {id}"),
        image: format!("https://img.example.com/{id}.jpg"),
        update_date: "2020-01-01 00:00:00".to_string(),
        is_read: false,
    }
}

mockall::mock! {
    pub Library {}

    impl Library for Library {
        fn read_episodes(&self, toon_id: &str) -> Result<Vec<ReadEpisode>, LibraryError>;
        fn mark_read(&self, toon_id: &str, episode_id: &str) -> Result<(), LibraryError>;
        fn add_favorite(&self, toon_id: &str) -> Result<(), LibraryError>;
        fn remove_favorite(&self, toon_id: &str) -> Result<(), LibraryError>;
        fn is_favorite(&self, toon_id: &str) -> Result<bool, LibraryError>;
    }
}

struct NoNetwork;

#[async_trait]
impl Network for NoNetwork {
    async fn request(&self, _req: &ProviderRequest) -> Result<String, FeedError> {
        Err(FeedError::UnexpectedResult {
            message: "MockProvider does not use the network".to_string(),
        })
    }
}

// MOCK PROVIDER

/// Provider answering from a queue of canned results.
#[allow(dead_code)]
pub struct MockProvider {
    pub base: BaseProvider,
    responses: Mutex<VecDeque<Result<EpisodeResult, FeedError>>>,
    pub requests: Mutex<Vec<EpisodeRequest>>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new() -> Self {
        let info = ProviderInfo {
            id: "mock".to_string(),
            name: "MockProvider".to_string(),
            api_url: "https://api.mock.test".to_string(),
            image_url: "https://img.mock.test".to_string(),
        };
        Self {
            base: BaseProvider::new(info, Arc::new(NoNetwork)),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: Result<EpisodeResult, FeedError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().unwrap().iter().map(|r| r.page).collect()
    }
}

#[async_trait]
impl EpisodeProvider for MockProvider {
    async fn fetch_episodes(&self, req: &EpisodeRequest) -> Result<EpisodeResult, FeedError> {
        self.requests.lock().unwrap().push(req.clone());
        // Give a concurrent caller the chance to run mid-request.
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FeedError::UnexpectedResult {
                    message: "No canned response left".to_string(),
                })
            })
    }

    fn get_base(&self) -> &BaseProvider {
        &self.base
    }
}
