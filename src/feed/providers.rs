//! Provider registry and management.

use std::sync::Arc;

use crate::config::Config;
use crate::feed::EpisodeProvider;
use crate::feed::error::FeedError;
use crate::feed::kakao_provider::KakaoProvider;

/// Registry of episode providers, looked up by [`crate::feed::ProviderInfo::id`].
pub struct Providers {
    providers: Vec<Arc<dyn EpisodeProvider>>,
}

impl Providers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Creates a registry with every supported provider.
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let mut providers = Self::new();
        providers.add(Arc::new(KakaoProvider::from_config(config)?));
        Ok(providers)
    }

    /// Adds a provider, replacing any registered under the same id.
    pub fn add(&mut self, provider: Arc<dyn EpisodeProvider>) {
        let id = provider.get_base().info.id.clone();
        self.providers.retain(|p| p.get_base().info.id != id);
        self.providers.push(provider);
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn EpisodeProvider>, FeedError> {
        self.providers
            .iter()
            .find(|p| p.get_base().info.id == id)
            .cloned()
            .ok_or_else(|| FeedError::UnknownProvider { id: id.to_string() })
    }

    /// Returns all registered providers.
    pub fn all(&self) -> Vec<Arc<dyn EpisodeProvider>> {
        self.providers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::kakao_provider::KAKAO_ID;

    #[test]
    fn test_lookup_by_id() {
        let providers = Providers::from_config(&Config::default()).unwrap();

        assert_eq!(providers.all().len(), 1);
        assert_eq!(providers.get(KAKAO_ID).unwrap().get_base().info.name, "Kakao Page");
        assert!(matches!(
            providers.get("naver"),
            Err(FeedError::UnknownProvider { id }) if id == "naver"
        ));
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut providers = Providers::from_config(&Config::default()).unwrap();
        providers.add(Arc::new(KakaoProvider::from_config(&Config::default()).unwrap()));
        assert_eq!(providers.all().len(), 1);
    }
}
