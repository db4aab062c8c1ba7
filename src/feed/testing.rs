use async_trait::async_trait;

use crate::feed::error::FeedError;
use crate::feed::request::Network;
use crate::feed::request::ProviderRequest;

/// [`Network`] that fails every request.
pub(crate) struct NoNetwork;

#[async_trait]
impl Network for NoNetwork {
    async fn request(&self, _req: &ProviderRequest) -> Result<String, FeedError> {
        Err(FeedError::UnexpectedResult {
            message: "offline".to_string(),
        })
    }
}
