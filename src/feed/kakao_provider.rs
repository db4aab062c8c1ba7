//! Kakao Page webtoon provider.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use governor::Quota;
use governor::RateLimiter;
use log::debug;
use log::info;
use log::warn;
use serde_json::Value;

use crate::config::Config;
use crate::feed::BaseProvider;
use crate::feed::EpisodeProvider;
use crate::feed::ProviderInfo;
use crate::feed::error::FeedError;
use crate::feed::request::HttpNetwork;
use crate::feed::request::Json;
use crate::feed::request::Network;
use crate::feed::request::ProviderRequest;
use crate::feed::request::parse_json;
use crate::model::EpisodeInfo;
use crate::model::EpisodeRequest;
use crate::model::EpisodeResult;

pub const KAKAO_ID: &str = "kakao";

const PAGE_SIZE: u32 = 20;

pub struct KakaoProvider {
    pub base: BaseProvider,
    limiter: DefaultDirectRateLimiter,
}

impl KakaoProvider {
    pub fn new(config: &Config, network: Arc<dyn Network>) -> Self {
        let info = ProviderInfo {
            id: KAKAO_ID.to_string(),
            name: "Kakao Page".to_string(),
            api_url: config.kakao_api_url.clone(),
            image_url: config.kakao_image_url.clone(),
        };

        // NOTE: Kakao does not publish a limit, so this is our own courtesy quota.
        let per_second = NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::direct(Quota::per_second(per_second));

        Self {
            base: BaseProvider::new(info, network),
            limiter,
        }
    }

    /// Builds the provider on top of a real HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let network = HttpNetwork::new(&config.user_agent, config.request_timeout)?;
        Ok(Self::new(config, Arc::new(network)))
    }

    fn singles_request(&self, req: &EpisodeRequest) -> Result<ProviderRequest, FeedError> {
        Ok(ProviderRequest::post(self.base.endpoint("store/singles"))
            .param("seriesid", &req.toon_id)
            .param("page", req.page)
            .param("direction", "desc")
            .param("page_size", PAGE_SIZE)
            .param("without_hidden", true)
            .build()?)
    }

    fn home_request(&self, toon_id: &str) -> Result<ProviderRequest, FeedError> {
        Ok(ProviderRequest::post(self.base.endpoint("store/home"))
            .param("seriesid", toon_id)
            .build()?)
    }

    async fn send_get_json(&self, request: &ProviderRequest) -> Result<Json, FeedError> {
        if self.limiter.check().is_err() {
            info!("Provider {} is ratelimited. Waiting...", self.base.info.name);
        }
        self.limiter.until_ready().await;

        let body = self.base.network.request(request).await?;
        let resp = parse_json(&body)?;
        self.check_resp_errors(&resp)?;
        Ok(resp)
    }

    fn check_resp_errors(&self, resp: &Json) -> Result<(), FeedError> {
        match resp.get("result_code").and_then(Value::as_i64) {
            Some(code) if code != 0 => Err(FeedError::ApiError {
                message: resp
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("result_code {code}")),
            }),
            _ => Ok(()),
        }
    }

    fn get_singles<'a>(&self, resp: &'a Json) -> Result<&'a Vec<Value>, FeedError> {
        resp.get("singles")
            .ok_or_else(|| FeedError::MissingField {
                field: "singles".to_string(),
            })?
            .as_array()
            .ok_or_else(|| FeedError::UnexpectedResult {
                message: "Failed converting singles to array".to_string(),
            })
    }

    /// Missing or malformed `is_end` means there is nothing more to fetch.
    fn get_is_end(&self, resp: &Json) -> bool {
        resp.get("is_end").and_then(Value::as_bool).unwrap_or(true)
    }

    fn parse_list(&self, toon_id: &str, singles: &[Value]) -> Vec<EpisodeInfo> {
        singles
            .iter()
            .filter_map(Value::as_object)
            .map(|single| EpisodeInfo {
                id: text_field(single, "id"),
                toon_id: toon_id.to_string(),
                title: text_field(single, "title"),
                image: self.thumbnail_url(&text_field(single, "land_thumbnail_url")),
                update_date: text_field(single, "free_change_dt"),
                is_read: false,
            })
            .collect()
    }

    fn thumbnail_url(&self, kid: &str) -> String {
        format!("{}?kid={kid}&filename=th1", self.base.info.image_url)
    }

    /// Looks up the id of the series' first episode.
    async fn fetch_first_id(&self, toon_id: &str) -> Result<Option<String>, FeedError> {
        let request = self.home_request(toon_id)?;
        let resp = self.send_get_json(&request).await?;
        let id = text_field(&resp, "first_single_id");
        Ok(Some(id).filter(|id| !id.is_empty()))
    }
}

/// Reads a scalar field as text. Absent or non-scalar values become empty.
fn text_field(obj: &Json, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[async_trait]
impl EpisodeProvider for KakaoProvider {
    async fn fetch_episodes(&self, req: &EpisodeRequest) -> Result<EpisodeResult, FeedError> {
        debug!(
            "Fetching episodes from {} for toon_id: {}, page: {}",
            self.base.info.name, req.toon_id, req.page
        );

        let request = self.singles_request(req)?;
        let resp = self.send_get_json(&request).await?;

        let episodes = self.parse_list(&req.toon_id, self.get_singles(&resp)?);
        let mut result = EpisodeResult::new(episodes);
        result.has_more = !self.get_is_end(&resp);

        if req.is_first_page() {
            result.first = match self.fetch_first_id(&req.toon_id).await {
                Ok(Some(first_id)) => result.episodes.first().map(|episode| EpisodeInfo {
                    id: first_id,
                    ..episode.clone()
                }),
                Ok(None) => None,
                Err(e) => {
                    warn!(
                        "Failed to resolve first episode for toon_id {}: {e}",
                        req.toon_id
                    );
                    None
                }
            };
        }

        info!(
            "Fetched {} episodes for toon_id: {} (page {}, has_more: {})",
            result.episodes.len(),
            req.toon_id,
            req.page,
            result.has_more
        );

        Ok(result)
    }

    fn get_base(&self) -> &BaseProvider {
        &self.base
    }
}
