//! API client for communicating with the eventmap REST backend.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{Event, LoginResponse};

use super::ApiError;

/// Backend used when nothing is configured (a local json-server)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// API client for the eventmap backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client. Requests have no timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authenticate with email and password.
    /// A single attempt; rejections carry the server's response body.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        debug!(email = email, "Sending login request");
        self.post("login", &LoginRequest { email, password }).await
    }

    /// Fetch all events
    pub async fn fetch_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get("events").await
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:3333/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
        assert_eq!(client.url("login"), "http://localhost:3333/login");
        assert_eq!(client.url("/events"), "http://localhost:3333/events");
    }

    #[test]
    fn test_auth_headers() {
        let client = ApiClient::new(DEFAULT_API_BASE_URL, None).unwrap();
        assert!(client.auth_headers().unwrap().is_empty());

        let authed = client.with_token("abc.def.ghi".to_string());
        let headers = authed.auth_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer abc.def.ghi"
        );
        assert_eq!(authed.base_url(), client.base_url());
    }

    #[test]
    fn test_login_request_body() {
        let body = serde_json::to_value(LoginRequest {
            email: "user@example.com",
            password: "secret1",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "user@example.com", "password": "secret1"})
        );
    }
}
