//! HTTP client for the restaurant backend
//!
//! One configured client per process, bound to a base URL, carrying the
//! bearer token once a session exists. No retries, no caching.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::ErrorBody;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
///
/// Requests fail on transport errors and on any non-2xx status. The `*_unit`
/// variants are for endpoints whose response body is not used; they accept
/// an empty body.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<()>;
    async fn put_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<()>;
    async fn put_empty(&self, path: &str) -> ClientResult<()>;
    async fn delete(&self, path: &str) -> ClientResult<()>;

    /// Attach `Authorization: Bearer <token>` to every following request
    fn set_token(&self, token: String);
    fn clear_token(&self);
    fn token(&self) -> Option<String>;
}

/// Network HTTP client (reqwest)
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "Sending request");
        let mut req = self.client.request(method, &url);
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req
    }

    /// Map a non-2xx response to an error, using the backend's message when present.
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.text().map(str::to_string))
            .or_else(|| (!text.trim().is_empty()).then(|| text.clone()));

        tracing::debug!(status = status.as_u16(), body = %text, "Request rejected");

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message.unwrap_or_default()),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message.unwrap_or_default()),
            StatusCode::NOT_FOUND => ClientError::NotFound(message.unwrap_or_default()),
            StatusCode::BAD_REQUEST => ClientError::Validation(message.unwrap_or_default()),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, body = %text, "Unexpected response body");
            ClientError::InvalidResponse(e.to_string())
        })
    }

    async fn handle_unit(response: reqwest::Response) -> ClientResult<()> {
        Self::check_status(response).await.map(|_| ())
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn post_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_unit(response).await
    }

    async fn put_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_unit(response).await
    }

    async fn put_empty(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::PUT, path).send().await?;
        Self::handle_unit(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle_unit(response).await
    }

    fn set_token(&self, token: String) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token);
    }

    fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
