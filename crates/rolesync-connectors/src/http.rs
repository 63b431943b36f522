//! Bearer-authenticated HTTP client shared by the billing connectors.
//!
//! Requests are single-shot: the tool is sequential and each account
//! operation is independent, so there is no retry loop, rate limiting, or
//! response caching here. Transport and status failures map onto the
//! [`ServiceError`] taxonomy.

use crate::secure_string::SecureString;
use reqwest::{Client, Response, StatusCode};
use rolesync_core::{ServiceError, ServiceResult};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

/// Authentication applied to every request.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    None,
    BearerToken { token: SecureString },
}

/// Configuration for an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    pub auth: AuthConfig,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn bearer(base_url: impl Into<String>, token: SecureString) -> Self {
        Self {
            base_url: base_url.into(),
            auth: AuthConfig::BearerToken { token },
            timeout_secs: 30,
        }
    }
}

/// Thin JSON-over-HTTP client.
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Joins a path onto the base URL.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Executes a GET request and deserializes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<T> {
        let url = self.build_url(path);
        debug!(%url, "GET");
        let response = self.execute(self.client.get(&url)).await?;
        Self::parse_json(response).await
    }

    /// Executes a PUT request with a JSON body and deserializes the JSON
    /// response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ServiceResult<T> {
        let url = self.build_url(path);
        debug!(%url, "PUT");
        let response = self.execute(self.client.put(&url).json(body)).await?;
        Self::parse_json(response).await
    }

    async fn execute(&self, mut request: reqwest::RequestBuilder) -> ServiceResult<Response> {
        if let AuthConfig::BearerToken { token } = &self.config.auth {
            request = request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(e.to_string())
            } else if e.is_connect() {
                ServiceError::ConnectionFailed(e.to_string())
            } else {
                ServiceError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(match status {
                StatusCode::UNAUTHORIZED => {
                    ServiceError::AuthenticationFailed("Unauthorized".into())
                }
                StatusCode::FORBIDDEN => ServiceError::AuthorizationDenied("Forbidden".into()),
                StatusCode::NOT_FOUND => ServiceError::NotFound("Resource not found".into()),
                StatusCode::BAD_REQUEST => {
                    let body = response.text().await.unwrap_or_default();
                    ServiceError::RequestFailed(format!("Bad request: {}", body))
                }
                _ => ServiceError::RequestFailed(format!("Unexpected status: {}", status)),
            });
        }

        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            ServiceError::InvalidResponse(format!(
                "Failed to parse response (status {}): {} - Body: {}",
                status,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(HttpConfig {
            base_url: "https://api.example.com/".to_string(),
            auth: AuthConfig::None,
            timeout_secs: 30,
        })
        .unwrap()
    }

    #[test]
    fn test_build_url_normalizes_slashes() {
        let client = client();
        assert_eq!(
            client.build_url("/v1/aws_accounts"),
            "https://api.example.com/v1/aws_accounts"
        );
        assert_eq!(
            client.build_url("v1/aws_accounts"),
            "https://api.example.com/v1/aws_accounts"
        );
    }

    #[test]
    fn test_bearer_config() {
        let config = HttpConfig::bearer("https://api.example.com", SecureString::from("tok"));
        assert!(matches!(config.auth, AuthConfig::BearerToken { .. }));
        assert_eq!(config.timeout_secs, 30);
    }
}
