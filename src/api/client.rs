//! HTTP client for the gallery backend.
//!
//! One shared `reqwest` pipeline for the whole process. The client holds a
//! reference to the session context and reads the current token on every
//! request, so outgoing Authorization headers always reflect the session.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use crate::auth::SharedSession;
use crate::models::{AuthResponse, Credentials, ImageRecord, RegisterRequest, Tag};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the gallery backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SharedSession,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>, session: SharedSession) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::NetworkError)?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the Authorization header from the session's current token.
    /// Called per request: a logout or fresh login is reflected immediately.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if a response is successful, returning a typed error with the
    /// body if not. A 401 means the token was rejected; the caller decides
    /// whether to tear the session down.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                warn!("Request rejected with 401, session token is no longer valid");
            }
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Authenticate and return the issued token
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let url = self.url("/auth/login");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(credentials)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .context("Failed to parse login response")
    }

    /// Create a new account
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let url = self.url("/auth/register");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(request)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let text = self.get_text(path).await?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    /// Fetch the user's image list
    pub async fn fetch_images(&self) -> Result<Vec<ImageRecord>> {
        let text = self.get_text("/images").await?;

        // Accept a bare array or a wrapped object
        if let Ok(images) = serde_json::from_str::<Vec<ImageRecord>>(&text) {
            debug!(count = images.len(), "Images fetched");
            return Ok(images);
        }

        #[derive(Deserialize)]
        struct ImagesWrapper {
            #[serde(default)]
            images: Vec<ImageRecord>,
        }

        match serde_json::from_str::<ImagesWrapper>(&text) {
            Ok(wrapper) => {
                debug!(count = wrapper.images.len(), "Images fetched");
                Ok(wrapper.images)
            }
            Err(e) => Err(ApiError::InvalidResponse(format!(
                "unrecognized images payload: {}",
                e
            ))
            .into()),
        }
    }

    /// Fetch all tags known to the backend
    pub async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        self.get("/tags").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionContext, TokenStore};
    use std::sync::Arc;
    use wiremock::matchers::{body_json_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Client backed by a temp-dir session, optionally pre-authenticated
    fn test_client(base_url: &str, stored_token: Option<&str>) -> (tempfile::TempDir, ApiClient) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        if let Some(token) = stored_token {
            store.save(token).unwrap();
        }
        let session: SharedSession = Arc::new(SessionContext::initialize(store));
        let client = ApiClient::new(base_url, session).unwrap();
        (dir, client)
    }

    #[tokio::test]
    async fn test_login_posts_credentials_and_parses_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json_string(
                r#"{"username":"alice1","password":"secret1"}"#,
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"access_token":"tok-42"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, client) = test_client(&server.uri(), None);
        let auth = client
            .login(&Credentials {
                username: "alice1".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(auth.access_token, "tok-42");
    }

    #[tokio::test]
    async fn test_authenticated_request_carries_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .and(header("authorization", "Bearer tok-42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, client) = test_client(&server.uri(), Some("tok-42"));
        let images = client.fetch_images().await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let (_dir, client) = test_client(&server.uri(), None);
        client.fetch_tags().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_network_error() {
        // Nothing listens on port 1, so the connection is refused
        let (_dir, client) = test_client("http://127.0.0.1:1", None);
        let err = client.fetch_tags().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NetworkError(_))
        ));
    }

    #[tokio::test]
    async fn test_401_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"msg":"expired"}"#))
            .mount(&server)
            .await;

        let (_dir, client) = test_client(&server.uri(), Some("tok-old"));
        let err = client.fetch_images().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_fetch_images_accepts_wrapped_payload() {
        let server = MockServer::start().await;
        let body = r#"{"images": [{"id": 1, "originalFilename": "a.jpg"}]}"#;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let (_dir, client) = test_client(&server.uri(), Some("tok"));
        let images = client.fetch_images().await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].original_filename, "a.jpg");
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, client) = test_client(&format!("{}/", server.uri()), None);
        client.fetch_tags().await.unwrap();
    }
}
