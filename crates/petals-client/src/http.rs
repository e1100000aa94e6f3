//! REST client over HTTP
//!
//! One request per call. Rate-limit and error bodies are turned into
//! structured `RestError`s; nothing is retried here.

use async_trait::async_trait;
use petals_common::ClientConfig;
use petals_core::{
    ChannelPayload, CreateMessage, EditMessage, EmojiRef, MessagePayload, ReactionQuery,
    RestClient, RestError, RestResult, Snowflake, UserPayload,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::ClientResult;

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u64>,
    message: Option<String>,
}

/// Body of a 429 response; `retry_after` is in seconds
#[derive(Debug, Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

/// `RestClient` backed by reqwest
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("petals/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RestError::Request(e.to_string()))?;

        let token = config
            .token
            .strip_prefix("Bot ")
            .unwrap_or(&config.token)
            .to_string();

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        debug!(%method, endpoint, "API request");
        self.client
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(AUTHORIZATION, format!("Bot {}", self.token))
    }

    async fn send(&self, request: RequestBuilder) -> RestResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RestError::Request(e.to_string()))?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .json::<RateLimitBody>()
                .await
                .map_or(1.0, |body| body.retry_after);
            warn!(retry_after, "Rate limited");
            return Err(RestError::RateLimited {
                retry_after_ms: (retry_after * 1000.0) as u64,
            });
        }

        if status.is_success() {
            return Ok(response);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RestError::Request(e.to_string()))?;
        let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_else(|_| ApiErrorBody {
            code: None,
            message: Some(String::from_utf8_lossy(&bytes).into_owned()),
        });

        Err(RestError::Status {
            status: status.as_u16(),
            code: body.code,
            message: body
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string()),
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RestResult<T> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RestError::Request(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RestError::Decode(e.to_string()))
    }

    async fn empty(&self, request: RequestBuilder) -> RestResult<()> {
        self.send(request).await.map(|_| ())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Routes
// ============================================================================

fn message_route(channel_id: Snowflake, message_id: Snowflake) -> String {
    format!("/channels/{channel_id}/messages/{message_id}")
}

fn reactions_route(channel_id: Snowflake, message_id: Snowflake, emoji: Option<&EmojiRef>) -> String {
    let base = format!("{}/reactions", message_route(channel_id, message_id));
    match emoji {
        Some(emoji) => format!("{base}/{}", emoji.route_segment()),
        None => base,
    }
}

fn user_segment(user_id: Option<Snowflake>) -> String {
    user_id.map_or_else(|| "@me".to_string(), |id| id.to_string())
}

#[async_trait]
impl RestClient for HttpClient {
    #[instrument(skip(self))]
    async fn fetch_channel(&self, channel_id: Snowflake) -> RestResult<ChannelPayload> {
        self.json(self.request(Method::GET, &format!("/channels/{channel_id}")))
            .await
    }

    #[instrument(skip(self, body))]
    async fn send_message(
        &self,
        channel_id: Snowflake,
        body: &CreateMessage,
    ) -> RestResult<MessagePayload> {
        let request = self
            .request(Method::POST, &format!("/channels/{channel_id}/messages"))
            .json(body);
        self.json(request).await
    }

    #[instrument(skip(self, body))]
    async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        body: &EditMessage,
    ) -> RestResult<MessagePayload> {
        let request = self
            .request(Method::PATCH, &message_route(channel_id, message_id))
            .json(body);
        self.json(request).await
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RestResult<()> {
        self.empty(self.request(Method::DELETE, &message_route(channel_id, message_id)))
            .await
    }

    #[instrument(skip(self))]
    async fn crosspost_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestResult<MessagePayload> {
        let endpoint = format!("{}/crosspost", message_route(channel_id, message_id));
        self.json(self.request(Method::POST, &endpoint)).await
    }

    #[instrument(skip(self))]
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &EmojiRef,
    ) -> RestResult<()> {
        let endpoint = format!("{}/@me", reactions_route(channel_id, message_id, Some(emoji)));
        self.empty(self.request(Method::PUT, &endpoint)).await
    }

    #[instrument(skip(self))]
    async fn remove_user_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &EmojiRef,
        user_id: Option<Snowflake>,
    ) -> RestResult<()> {
        let endpoint = format!(
            "{}/{}",
            reactions_route(channel_id, message_id, Some(emoji)),
            user_segment(user_id)
        );
        self.empty(self.request(Method::DELETE, &endpoint)).await
    }

    #[instrument(skip(self))]
    async fn delete_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: Option<&EmojiRef>,
    ) -> RestResult<()> {
        let endpoint = reactions_route(channel_id, message_id, emoji);
        self.empty(self.request(Method::DELETE, &endpoint)).await
    }

    #[instrument(skip(self))]
    async fn get_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &EmojiRef,
        query: &ReactionQuery,
    ) -> RestResult<Vec<UserPayload>> {
        let endpoint = reactions_route(channel_id, message_id, Some(emoji));
        self.json(self.request(Method::GET, &endpoint).query(query)).await
    }

    #[instrument(skip(self))]
    async fn add_pinned_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestResult<()> {
        let endpoint = format!("/channels/{channel_id}/pins/{message_id}");
        self.empty(self.request(Method::PUT, &endpoint)).await
    }

    #[instrument(skip(self))]
    async fn delete_pinned_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestResult<()> {
        let endpoint = format!("/channels/{channel_id}/pins/{message_id}");
        self.empty(self.request(Method::DELETE, &endpoint)).await
    }
}
