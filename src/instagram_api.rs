use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::debug;

use socialscope::config::ApiConfig;
use socialscope::metrics::TrendingHashtag;

const API_KEY_ENV: &str = "RAPIDAPI_KEY";

#[derive(Clone)]
pub struct InstagramClient {
    client: reqwest::Client,
    api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostComment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub likes: u64,
}

#[derive(Deserialize)]
struct TrendingResponse {
    hashtags: Option<Vec<TrendingHashtag>>,
}

#[derive(Deserialize)]
struct CommentsResponse {
    comments: Option<Vec<PostComment>>,
}

impl InstagramClient {
    pub fn from_config(config: &ApiConfig) -> Result<Option<Self>, String> {
        let Some(api_key) = env::var(API_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
        else {
            return Ok(None);
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-rapidapi-key",
            HeaderValue::from_str(api_key.trim())
                .map_err(|err| format!("invalid {}: {}", API_KEY_ENV, err))?,
        );
        headers.insert(
            "x-rapidapi-host",
            HeaderValue::from_str(&config.host)
                .map_err(|err| format!("invalid api host: {}", err))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| format!("failed to build HTTP client: {}", err))?;

        Ok(Some(Self {
            client,
            api_base: config.base_url.trim_end_matches('/').to_string(),
        }))
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<Value, String> {
        let username = username.trim();
        if username.is_empty() {
            return Err("username is required".to_string());
        }
        self.get_json(&format!(
            "/instagram/user/{}",
            urlencoding::encode(username)
        ))
        .await
    }

    pub async fn fetch_trending_hashtags(&self) -> Result<Vec<TrendingHashtag>, String> {
        let body: TrendingResponse = self.get_json("/instagram/trending/hashtags").await?;
        body.hashtags
            .ok_or_else(|| "Instagram API response missing hashtags".to_string())
    }

    pub async fn fetch_post_comments(&self, post_id: &str) -> Result<Vec<PostComment>, String> {
        let body: CommentsResponse = self
            .get_json(&format!(
                "/instagram/posts/{}/comments",
                urlencoding::encode(post_id.trim())
            ))
            .await?;
        Ok(body.comments.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| format!("Instagram API request failed: {}", err))?;

        let status = response.status();
        debug!(%url, %status, "instagram api response");
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("Instagram API error: {}", status));
            }
            return Err(format!("Instagram API error: {} {}", status, detail));
        }

        response
            .json()
            .await
            .map_err(|err| format!("Instagram API response parse failed: {}", err))
    }
}
