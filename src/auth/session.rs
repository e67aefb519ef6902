use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::Credentials;

use super::store::TokenStore;

/// Shared handle to the session, injected into the API client and consulted
/// by the route guard.
pub type SharedSession = Arc<SessionContext>;

/// Process-wide session state: the current bearer token and the transitions
/// that may change it.
///
/// The token is written only by `login` and `clear`; the API client reads it
/// on every request, so the Authorization header can never disagree with the
/// session. Concurrent logins are resolved latest-wins: every attempt takes a
/// ticket from an epoch counter, and a response is applied only while its
/// ticket is still current.
pub struct SessionContext {
    store: TokenStore,
    token: RwLock<Option<String>>,
    login_epoch: AtomicU64,
}

impl SessionContext {
    /// Restore the session from the credential store. A stored token starts
    /// the session authenticated without any login call.
    pub fn initialize(store: TokenStore) -> Self {
        let token = store.load();
        if token.is_some() {
            debug!("Session restored from stored token");
        } else {
            debug!("No stored token, starting anonymous");
        }
        Self {
            store,
            token: RwLock::new(token),
            login_epoch: AtomicU64::new(0),
        }
    }

    /// Current bearer token, if authenticated
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Authenticate against the backend and establish the issued token.
    ///
    /// On success the token is set in memory and persisted in the same step.
    /// On failure the full logout transition runs first (clearing any stale
    /// token), then the error propagates for display.
    pub async fn login(&self, api: &ApiClient, credentials: &Credentials) -> Result<()> {
        let ticket = self.begin_login();
        debug!(username = %credentials.username, "Login attempt started");

        let auth = match api.login(credentials).await {
            Ok(auth) => auth,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.clear();
                return Err(e);
            }
        };

        if auth.access_token.is_empty() {
            self.clear();
            anyhow::bail!("Login response carried an empty token");
        }

        if !self.establish(ticket, auth.access_token) {
            anyhow::bail!("Login superseded by a newer attempt");
        }

        info!("Login successful");
        Ok(())
    }

    /// Drop to anonymous: clear the in-memory token and the stored one.
    /// Idempotent, and invalidates any login still in flight.
    pub fn clear(&self) {
        self.login_epoch.fetch_add(1, Ordering::SeqCst);
        *self.token.write() = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
    }

    /// Take a ticket for a new login attempt, superseding older ones
    fn begin_login(&self) -> u64 {
        self.login_epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a freshly issued token if `ticket` is still the newest attempt.
    /// Returns false when a later login or a logout has superseded it.
    fn establish(&self, ticket: u64, token: String) -> bool {
        let mut current = self.token.write();
        if self.login_epoch.load(Ordering::SeqCst) != ticket {
            debug!("Discarding superseded login response");
            return false;
        }
        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "Failed to persist token");
        }
        *current = Some(token);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_in(dir: &tempfile::TempDir) -> SessionContext {
        SessionContext::initialize(TokenStore::new(dir.path().to_path_buf()))
    }

    #[test]
    fn test_startup_restores_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        TokenStore::new(dir.path().to_path_buf())
            .save("tok-9")
            .unwrap();

        let session = session_in(&dir);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-9".to_string()));
    }

    #[test]
    fn test_starts_anonymous_without_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_establish_sets_memory_and_store() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let ticket = session.begin_login();
        assert!(session.establish(ticket, "tok-1".to_string()));

        assert!(session.is_authenticated());
        assert_eq!(
            TokenStore::new(dir.path().to_path_buf()).load(),
            Some("tok-1".to_string())
        );
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);
        let ticket = session.begin_login();
        session.establish(ticket, "tok-1".to_string());

        session.clear();
        session.clear();

        assert!(!session.is_authenticated());
        assert_eq!(TokenStore::new(dir.path().to_path_buf()).load(), None);
    }

    #[test]
    fn test_latest_login_wins() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let first = session.begin_login();
        let second = session.begin_login();

        // The slower (older) response must not be applied
        assert!(!session.establish(first, "stale".to_string()));
        assert!(!session.is_authenticated());

        assert!(session.establish(second, "fresh".to_string()));
        assert_eq!(session.token(), Some("fresh".to_string()));
    }

    #[test]
    fn test_logout_invalidates_inflight_login() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let ticket = session.begin_login();
        session.clear();

        assert!(!session.establish(ticket, "late".to_string()));
        assert!(!session.is_authenticated());
        assert_eq!(TokenStore::new(dir.path().to_path_buf()).load(), None);
    }

    mod login_flow {
        use super::*;
        use std::sync::Arc;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn credentials(username: &str, password: &str) -> Credentials {
            Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }
        }

        fn shared_session(dir: &tempfile::TempDir) -> SharedSession {
            Arc::new(SessionContext::initialize(TokenStore::new(
                dir.path().to_path_buf(),
            )))
        }

        #[tokio::test]
        async fn test_successful_login_authenticates_and_persists() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/auth/login"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_string(r#"{"access_token":"tok-7"}"#),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/images"))
                .and(header("authorization", "Bearer tok-7"))
                .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
                .expect(1)
                .mount(&server)
                .await;

            let dir = tempfile::tempdir().unwrap();
            let session = shared_session(&dir);
            let api = ApiClient::new(server.uri(), Arc::clone(&session)).unwrap();

            session
                .login(&api, &credentials("alice1", "secret1"))
                .await
                .unwrap();

            assert!(session.is_authenticated());
            assert_eq!(
                TokenStore::new(dir.path().to_path_buf()).load(),
                Some("tok-7".to_string())
            );
            // The freshly issued token is attached without reconfiguration
            api.fetch_images().await.unwrap();
        }

        #[tokio::test]
        async fn test_failed_login_ends_anonymous_with_empty_store() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/auth/login"))
                .respond_with(
                    ResponseTemplate::new(400).set_body_string(r#"{"error":"bad credentials"}"#),
                )
                .mount(&server)
                .await;

            let dir = tempfile::tempdir().unwrap();
            // A stale token from an earlier session must not survive the failure
            TokenStore::new(dir.path().to_path_buf())
                .save("stale")
                .unwrap();
            let session = shared_session(&dir);
            let api = ApiClient::new(server.uri(), Arc::clone(&session)).unwrap();

            let result = session.login(&api, &credentials("x", "bad")).await;
            assert!(result.is_err());
            assert!(!session.is_authenticated());
            assert_eq!(TokenStore::new(dir.path().to_path_buf()).load(), None);
        }

        #[tokio::test]
        async fn test_requests_after_logout_are_unauthenticated() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/tags"))
                .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
                .mount(&server)
                .await;

            let dir = tempfile::tempdir().unwrap();
            TokenStore::new(dir.path().to_path_buf())
                .save("tok-3")
                .unwrap();
            let session = shared_session(&dir);
            let api = ApiClient::new(server.uri(), Arc::clone(&session)).unwrap();

            session.clear();
            api.fetch_tags().await.unwrap();

            let requests = server.received_requests().await.unwrap();
            assert_eq!(requests.len(), 1);
            assert!(!requests[0].headers.contains_key("authorization"));
        }
    }
}
