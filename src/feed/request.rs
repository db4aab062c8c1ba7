//! HTTP request abstraction shared by every provider.

use std::time::Duration;

use async_trait::async_trait;
use derive_builder::Builder;
use log::debug;
use serde_json::Map;
use serde_json::Value;
use wreq::Client;
use wreq::header::HeaderMap;
use wreq::header::HeaderValue;
use wreq::header::USER_AGENT;

use crate::feed::error::FeedError;

pub type Json = Map<String, Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

/// A single call against a provider endpoint.
///
/// Params go into the query string for GET and into a form body for POST.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
#[builder(setter(into))]
pub struct ProviderRequest {
    #[builder(default)]
    pub method: RequestMethod,
    pub url: String,
    #[builder(default, setter(custom))]
    pub params: Vec<(String, String)>,
}

impl ProviderRequestBuilder {
    pub fn param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.params
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.to_string()));
        self
    }
}

impl ProviderRequest {
    pub fn builder() -> ProviderRequestBuilder {
        ProviderRequestBuilder::default()
    }

    pub fn post(url: impl Into<String>) -> ProviderRequestBuilder {
        let mut builder = Self::builder();
        builder.method(RequestMethod::Post).url(url);
        builder
    }
}

impl From<ProviderRequestBuilderError> for FeedError {
    fn from(e: ProviderRequestBuilderError) -> Self {
        FeedError::InvalidRequest {
            message: e.to_string(),
        }
    }
}

#[async_trait]
pub trait Network: Send + Sync {
    /// Performs the request and returns the response body.
    async fn request(&self, req: &ProviderRequest) -> Result<String, FeedError>;
}

/// [`Network`] backed by a shared `wreq` client.
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent).map_err(|e| FeedError::InvalidRequest {
            message: format!("Invalid user agent `{user_agent}`: {e}"),
        })?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn request(&self, req: &ProviderRequest) -> Result<String, FeedError> {
        debug!("Making {:?} request to: {}", req.method, req.url);

        let builder = match req.method {
            RequestMethod::Get => self.client.get(&req.url).query(&req.params),
            RequestMethod::Post => self.client.post(&req.url).form(&req.params),
        };
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
                url: req.url.clone(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Parses a response body that must be a JSON object.
pub fn parse_json(body: &str) -> Result<Json, FeedError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(FeedError::UnexpectedResult {
            message: format!("Expected a JSON object, got `{other}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_params() {
        let req = ProviderRequest::post("https://example.com/api")
            .param("seriesid", "123")
            .param("page", 2)
            .build()
            .unwrap();

        assert_eq!(req.method, RequestMethod::Post);
        assert_eq!(
            req.params,
            vec![
                ("seriesid".to_string(), "123".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_builder_requires_url() {
        assert!(ProviderRequest::builder().build().is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = parse_json(r#"{"is_end": true}"#).unwrap();
        assert_eq!(json.get("is_end"), Some(&Value::Bool(true)));

        assert!(matches!(
            parse_json("[1, 2]"),
            Err(FeedError::UnexpectedResult { .. })
        ));
        assert!(matches!(
            parse_json("<html>"),
            Err(FeedError::JsonParseFailed(_))
        ));
    }
}
