use crate::api::protocol::{ENDPOINT_POSTS, PostPayload};
use crate::store::types::Post;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const RETRY_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl PostClient {
    /// Creates a client for the service at `base_url` (e.g. `127.0.0.1:3000/api`).
    ///
    /// A missing scheme defaults to `http://`; trailing slashes are dropped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            http_client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Replaces the per-request timeout (2 s by default).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /post`: every post, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let response = self
            .send_with_retry(Method::GET, self.collection_url(), None)
            .await?;
        expect_json(response, StatusCode::OK).await
    }

    /// `POST /post`: creates a post and returns it with its assigned id.
    pub async fn create_post(&self, heading: &str, content: &str) -> Result<Post> {
        let payload = PostPayload {
            heading: heading.to_string(),
            content: content.to_string(),
        };
        let response = self
            .send_with_retry(Method::POST, self.collection_url(), Some(&payload))
            .await?;
        expect_json(response, StatusCode::CREATED).await
    }

    /// `GET /post/{id}`. `None` if the post does not exist.
    pub async fn get_post(&self, id: u64) -> Result<Option<Post>> {
        let response = self
            .send_with_retry(Method::GET, self.item_url(id), None)
            .await?;
        optional_json(response).await
    }

    /// `PUT /post/{id}`. `None` if the post does not exist.
    pub async fn update_post(&self, id: u64, heading: &str, content: &str) -> Result<Option<Post>> {
        let payload = PostPayload {
            heading: heading.to_string(),
            content: content.to_string(),
        };
        let response = self
            .send_with_retry(Method::PUT, self.item_url(id), Some(&payload))
            .await?;
        optional_json(response).await
    }

    /// `DELETE /post/{id}`: the remaining posts, or `None` if it did not exist.
    pub async fn delete_post(&self, id: u64) -> Result<Option<Vec<Post>>> {
        let response = self
            .send_with_retry(Method::DELETE, self.item_url(id), None)
            .await?;
        optional_json(response).await
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, ENDPOINT_POSTS)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}{}/{}", self.base_url, ENDPOINT_POSTS, id)
    }

    async fn send_with_retry(
        &self,
        method: Method,
        url: String,
        payload: Option<&PostPayload>,
    ) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..RETRY_ATTEMPTS {
            let mut request = self
                .http_client
                .request(method.clone(), url.clone())
                .timeout(self.timeout);
            if let Some(payload) = payload {
                request = request.json(payload);
            }

            match request.send().await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == RETRY_ATTEMPTS || !is_retryable(&method, &e) {
                        return Err(anyhow::anyhow!(e));
                    }
                    tracing::debug!("{} {} failed (attempt {}): {}", method, url, attempt + 1, e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }
}

/// GET and PUT can be repeated safely. POST and DELETE may already have been applied
/// when the error surfaced, so they are retried only if the connection never opened.
fn is_retryable(method: &Method, err: &reqwest::Error) -> bool {
    if *method == Method::GET || *method == Method::PUT {
        return true;
    }
    err.is_connect()
}

async fn expect_json<T: DeserializeOwned>(
    response: reqwest::Response,
    expected: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected {
        return Err(anyhow::anyhow!(
            "Unexpected status {} (expected {})",
            status,
            expected
        ));
    }
    Ok(response.json().await?)
}

async fn optional_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    expect_json(response, StatusCode::OK).await.map(Some)
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}
