use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream rejected credentials ({0})")]
    Unauthorized(StatusCode),

    #[error("Upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Upstream response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid session token")]
    InvalidToken,
}

/// JSON client for the booking provider gateway.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.booking_provider_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, session_token: Option<&str>) -> Result<HeaderMap, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = session_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| UpstreamError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Sends one request and decodes the JSON body. Never retries.
    pub async fn request<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        session_token: Option<&str>,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(session_token)?);

        if let Some(query) = query {
            req = req.query(query);
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(UpstreamError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Upstream error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    UpstreamError::Unauthorized(status)
                }
                _ => UpstreamError::Status { status, body: error_text },
            });
        }

        response.json::<T>().await.map_err(UpstreamError::Decode)
    }

    pub async fn get<T, Q>(
        &self,
        path: &str,
        session_token: &str,
        query: &Q,
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request::<T, Q, ()>(Method::GET, path, Some(session_token), Some(query), None)
            .await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        session_token: Option<&str>,
        body: &B,
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, (), B>(Method::POST, path, session_token, None, Some(body))
            .await
    }
}
