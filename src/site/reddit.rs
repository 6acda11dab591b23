//! Reddit implementation of [`MirrorSite`]
//!
//! Uses the OAuth API directly: a refresh-token grant for the session, the
//! `new` listing to find mirrored posts, `/api/submit` for link posts and
//! `/api/compose` for private messages.

use crate::config::RedditConfig;
use crate::model::{MirrorRecord, SubmittedPost};
use crate::site::MirrorSite;
use crate::{SiteError, SiteResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Number of posts scanned when looking for the latest mirrored chapter
const LISTING_LIMIT: u32 = 100;

/// API error code reported for throttled submissions
const RATE_LIMIT_CODE: &str = "RATELIMIT";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    scope: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Me {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: LinkData,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    title: String,
    url: String,
    author: String,
    created_utc: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    json: ApiJson,
}

#[derive(Debug, Deserialize)]
struct ApiJson {
    #[serde(default)]
    errors: Vec<Vec<serde_json::Value>>,
    data: Option<SubmitData>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    id: String,
    url: Option<String>,
}

/// Authenticated Reddit API client
pub struct RedditClient {
    client: Client,
    config: RedditConfig,
    access_token: String,
}

impl RedditClient {
    /// Creates a client using the configured user agent and access token
    ///
    /// No request is made until [`MirrorSite::authenticate`] is called.
    pub fn new(config: &RedditConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            config: config.clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.config.auth_url.trim_end_matches('/'), path)
    }

    /// Trades the refresh token for a new access token
    async fn refresh_access_token(&mut self) -> SiteResult<()> {
        let endpoint = self.auth_url("/api/v1/access_token");
        tracing::debug!("Refreshing access token");

        let response = self
            .client
            .post(&endpoint)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SiteError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }
        let response = ensure_success(response, &endpoint).await?;
        let token: TokenResponse = decode(response).await?;

        if let Some(error) = token.error {
            return Err(SiteError::Auth(error));
        }

        self.access_token = token
            .access_token
            .ok_or_else(|| SiteError::Auth("no access token in response".to_string()))?;

        if let Some(granted) = token.scope {
            let granted: Vec<&str> = granted.split_whitespace().collect();
            for scope in &self.config.scopes {
                if !granted.contains(&scope.as_str()) && !granted.contains(&"*") {
                    tracing::warn!("Access token was not granted the '{}' scope", scope);
                }
            }
        }

        Ok(())
    }

    async fn current_user(&self) -> SiteResult<String> {
        let endpoint = self.api_url("/api/v1/me");
        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let response = ensure_success(response, &endpoint).await?;
        let me: Me = decode(response).await?;
        Ok(me.name)
    }

    /// Posts a form to an `api_type=json` endpoint and checks its error list
    async fn post_api(&self, path: &str, form: &[(&str, &str)]) -> SiteResult<ApiJson> {
        let endpoint = self.api_url(path);
        let mut params = vec![("api_type", "json")];
        params.extend_from_slice(form);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.access_token)
            .form(&params)
            .send()
            .await?;
        let response = ensure_success(response, &endpoint).await?;
        let body: ApiResponse = decode(response).await?;

        if let Some(error) = body.json.errors.first() {
            return Err(classify_api_error(error));
        }

        Ok(body.json)
    }
}

#[async_trait]
impl MirrorSite for RedditClient {
    async fn authenticate(&mut self) -> SiteResult<String> {
        tracing::info!("Logging into reddit");
        self.refresh_access_token().await?;
        let name = self.current_user().await?;
        tracing::debug!("Authenticated as {}", name);
        Ok(name)
    }

    async fn latest_post(
        &self,
        destination: &str,
        uploaders: &[String],
    ) -> SiteResult<Option<MirrorRecord>> {
        tracing::info!("Getting latest post in {}", destination);
        let endpoint = self.api_url(&format!("/r/{}/new", destination));

        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.access_token)
            .query(&[("limit", LISTING_LIMIT.to_string()), ("raw_json", "1".to_string())])
            .send()
            .await?;
        let response = ensure_success(response, &endpoint).await?;
        let listing: Listing = decode(response).await?;

        let found = listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data)
            .find(|post| {
                uploaders
                    .iter()
                    .any(|uploader| uploader.eq_ignore_ascii_case(&post.author))
            });

        Ok(found.map(|post| {
            tracing::debug!("Post found: {}", post.title);
            MirrorRecord {
                title: post.title,
                url: post.url,
                author: post.author,
                created: post
                    .created_utc
                    .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0)),
            }
        }))
    }

    async fn submit_link(
        &self,
        destination: &str,
        title: &str,
        url: &str,
    ) -> SiteResult<SubmittedPost> {
        let json = self
            .post_api(
                "/api/submit",
                &[
                    ("kind", "link"),
                    ("sr", destination),
                    ("title", title),
                    ("url", url),
                    ("resubmit", "true"),
                ],
            )
            .await?;

        let data = json
            .data
            .ok_or_else(|| SiteError::Decode("submit response has no data".to_string()))?;

        Ok(SubmittedPost {
            permalink: data.url.unwrap_or_default(),
            id: data.id,
        })
    }

    async fn send_message(&self, recipient: &str, subject: &str, body: &str) -> SiteResult<()> {
        self.post_api(
            "/api/compose",
            &[("to", recipient), ("subject", subject), ("text", body)],
        )
        .await?;
        Ok(())
    }
}

/// Maps non-2xx responses to errors, keeping the body for diagnostics
async fn ensure_success(response: Response, endpoint: &str) -> SiteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SiteError::RateLimited(format!(
            "HTTP 429 from {}",
            endpoint
        )));
    }

    Err(SiteError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Decodes a JSON body; transport failures stay [`SiteError::Http`]
async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> SiteResult<T> {
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            SiteError::Decode(e.to_string())
        } else {
            SiteError::Http(e)
        }
    })
}

/// Turns a `[code, message, field]` API error into a [`SiteError`]
fn classify_api_error(error: &[serde_json::Value]) -> SiteError {
    let code = error.first().and_then(|v| v.as_str()).unwrap_or("UNKNOWN");
    let message = error.get(1).and_then(|v| v.as_str()).unwrap_or_default();

    if code == RATE_LIMIT_CODE {
        SiteError::RateLimited(message.to_string())
    } else {
        SiteError::Api(format!("{}: {}", code, message))
    }
}
