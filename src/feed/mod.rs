//! Episode list providers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::feed::error::FeedError;
use crate::feed::request::Network;
use crate::model::EpisodeRequest;
use crate::model::EpisodeResult;

pub mod error;
pub mod kakao_provider;
pub mod providers;
pub mod request;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Clone, Debug)]
pub struct ProviderInfo {
    /// Registry key, e.g. "kakao".
    pub id: String,
    /// Display name, e.g. "Kakao Page".
    pub name: String,
    /// Base API URL without trailing slash, e.g. "https://api2-page.kakao.com/api/v5".
    pub api_url: String,
    /// Base URL thumbnails are resolved against.
    pub image_url: String,
}

#[derive(Clone)]
pub struct BaseProvider {
    pub info: ProviderInfo,
    pub network: Arc<dyn Network>,
}

impl BaseProvider {
    pub fn new(info: ProviderInfo, network: Arc<dyn Network>) -> Self {
        Self { info, network }
    }

    /// Joins an endpoint path onto the API URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.info.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Fetches pages of a series' episode list from one content portal.
#[async_trait]
pub trait EpisodeProvider: Send + Sync {
    /// Fetches one page. The first episode is only resolved for page 0.
    async fn fetch_episodes(&self, req: &EpisodeRequest) -> Result<EpisodeResult, FeedError>;

    fn get_base(&self) -> &BaseProvider;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::NoNetwork;

    #[test]
    fn test_endpoint_joins_slashes() {
        let base = BaseProvider::new(
            ProviderInfo {
                id: "test".to_string(),
                name: "Test".to_string(),
                api_url: "http://127.0.0.1:1234/".to_string(),
                image_url: String::new(),
            },
            Arc::new(NoNetwork),
        );

        assert_eq!(
            base.endpoint("/store/singles"),
            "http://127.0.0.1:1234/store/singles"
        );
        assert_eq!(base.endpoint("store/home"), "http://127.0.0.1:1234/store/home");
    }
}
