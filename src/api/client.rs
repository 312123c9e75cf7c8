//! Authenticated API client for the language-learning REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests: bearer token attachment, lazy token hydration from persistent
//! storage, single-flight refresh on 401, and one-shot propagation of
//! unrecoverable auth failure to the embedding application.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{StoredTokens, TokenPair, TokenStore};
use crate::models::{
    AuthSession, Exercise, ExerciseAttempt, ExerciseResult, GrammarTopic, Phrase, UserProfile,
    VocabularyItem,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow mobile networks while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for the token refresh call in seconds.
/// Kept shorter than the general timeout so a stalled refresh does not
/// hold up every queued request behind it.
const REFRESH_TIMEOUT_SECS: u64 = 10;

/// Path of the refresh-token exchange endpoint.
/// A 401 from this path must never trigger another refresh.
const REFRESH_ENDPOINT: &str = "/auth/refresh";

/// Platform marker header sent on every request
const PLATFORM_HEADER: &str = "x-platform";

/// Platform marker value
const PLATFORM_VALUE: &str = "mobile";

// ============================================================================
// Request options
// ============================================================================

/// Per-request options for [`ApiClient::request`].
///
/// Caller headers are merged first; the computed content-type, platform
/// marker, and bearer token override them.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: header::HeaderMap,
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

// ============================================================================
// Single-flight futures and auth-error hook
// ============================================================================

/// Refresh failure detail. Cloneable so every caller sharing the
/// in-flight refresh future receives it.
#[derive(Debug, Clone)]
struct RefreshFailure {
    message: String,
}

type SharedRefresh = Shared<BoxFuture<'static, Result<String, RefreshFailure>>>;
type SharedHydration = Shared<BoxFuture<'static, Result<(), String>>>;

type AuthErrorHandler = Arc<dyn Fn() + Send + Sync>;

/// One-shot callback invoked when authentication is irrecoverably lost.
/// The fired flag debounces concurrent failures; installing a new
/// handler re-arms it.
#[derive(Default)]
struct AuthErrorHook {
    handler: Option<AuthErrorHandler>,
    fired: bool,
}

/// Refresh endpoint success body. The rotated refresh token is optional;
/// when omitted the previous one is kept.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Authenticated API client.
/// Clone is cheap - all shared state lives behind an Arc, so every clone
/// sees the same tokens, in-flight futures, and auth-error hook.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    tokens: Mutex<StoredTokens>,
    refresh_in_flight: Mutex<Option<SharedRefresh>>,
    hydration_in_flight: Mutex<Option<SharedHydration>>,
    auth_error_hook: Mutex<AuthErrorHook>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    /// An empty base URL is a configuration error and fails immediately.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ApiError::MissingBaseUrl);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                store,
                tokens: Mutex::new(StoredTokens::default()),
                refresh_in_flight: Mutex::new(None),
                hydration_in_flight: Mutex::new(None),
                auth_error_hook: Mutex::new(AuthErrorHook::default()),
            }),
        })
    }

    /// Set the in-memory access token.
    /// Used right after login so requests need not wait on storage hydration.
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.inner.tokens.lock().access_token = Some(token.into());
    }

    /// Set the in-memory refresh token.
    pub fn set_refresh_token(&self, token: impl Into<String>) {
        self.inner.tokens.lock().refresh_token = Some(token.into());
    }

    /// Register the callback fired when authentication is irrecoverably
    /// lost, and re-arm the one-shot guard.
    pub fn set_auth_error_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        let mut hook = self.inner.auth_error_hook.lock();
        hook.handler = Some(Arc::new(handler));
        hook.fired = false;
    }

    /// Clear tokens from memory and persistent storage.
    pub async fn logout(&self) {
        self.inner.clear_tokens();
        if let Err(e) = self.inner.store.clear().await {
            warn!(error = %e, "Failed to clear stored tokens on logout");
        }
    }

    /// Issue a request against the configured base URL, attaching bearer
    /// credentials and refreshing them once on 401.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.ensure_hydrated().await?;

        let access = self.inner.access_token();
        let response = self.inner.send(endpoint, &options, access.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && endpoint != REFRESH_ENDPOINT {
            if self.inner.refresh_token().is_none() {
                self.inner.fail_auth().await;
                return Err(ApiError::AuthRequired);
            }

            let new_access = match self.refresh_future().await {
                Ok(token) => token,
                Err(failure) => {
                    self.inner.fail_auth().await;
                    return Err(ApiError::AuthFailed(failure.message));
                }
            };

            // Headers are rebuilt with the new token; exactly one retry.
            let retried = self.inner.send(endpoint, &options, Some(&new_access)).await?;
            if retried.status() == StatusCode::UNAUTHORIZED {
                self.inner.fail_auth().await;
                return Err(ApiError::AuthFailed(
                    "Request unauthorized after token refresh".to_string(),
                ));
            }
            return Self::parse_response(retried).await;
        }

        Self::parse_response(response).await
    }

    /// Convenience GET wrapper
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::default()).await
    }

    /// Convenience POST wrapper with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let options = RequestOptions::default()
            .method(Method::POST)
            .json(serde_json::to_value(body)?);
        self.request(endpoint, options).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    // ===== Auth Endpoints =====

    /// Log in with email and password. On success the returned token pair
    /// is installed in memory and persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session: AuthSession = self.post("/auth/login", &body).await?;
        self.inner.install_session(&session).await;
        Ok(session.user)
    }

    /// Register a new account. Behaves like `login` on success.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<UserProfile, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password, "name": name });
        let session: AuthSession = self.post("/auth/register", &body).await?;
        self.inner.install_session(&session).await;
        Ok(session.user)
    }

    /// Fetch the current user's profile
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.get("/users/me").await
    }

    // ===== Data Fetching Methods =====

    /// Fetch vocabulary items, optionally filtered by category
    pub async fn fetch_vocabulary(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<VocabularyItem>, ApiError> {
        let endpoint = match category {
            Some(category) => format!("/vocabulary?category={}", category),
            None => "/vocabulary".to_string(),
        };
        self.get(&endpoint).await
    }

    /// Fetch phrases, optionally filtered by category
    pub async fn fetch_phrases(&self, category: Option<&str>) -> Result<Vec<Phrase>, ApiError> {
        let endpoint = match category {
            Some(category) => format!("/phrases?category={}", category),
            None => "/phrases".to_string(),
        };
        self.get(&endpoint).await
    }

    /// Fetch all grammar topics
    pub async fn fetch_grammar_topics(&self) -> Result<Vec<GrammarTopic>, ApiError> {
        self.get("/grammar").await
    }

    /// Fetch exercises, optionally scoped to a grammar topic
    pub async fn fetch_exercises(&self, topic_id: Option<i64>) -> Result<Vec<Exercise>, ApiError> {
        let endpoint = match topic_id {
            Some(topic_id) => format!("/exercises?topicId={}", topic_id),
            None => "/exercises".to_string(),
        };
        self.get(&endpoint).await
    }

    /// Submit an exercise answer and return the graded result
    pub async fn submit_exercise_attempt(
        &self,
        attempt: &ExerciseAttempt,
    ) -> Result<ExerciseResult, ApiError> {
        let endpoint = format!("/exercises/{}/attempts", attempt.exercise_id);
        self.post(&endpoint, attempt).await
    }

    // ===== Single-flight coordination =====

    /// Populate in-memory tokens from storage if both are unset.
    /// Concurrent callers share a single storage read.
    async fn ensure_hydrated(&self) -> Result<(), ApiError> {
        {
            let tokens = self.inner.tokens.lock();
            if tokens.access_token.is_some() || tokens.refresh_token.is_some() {
                return Ok(());
            }
        }
        self.hydration_future().await.map_err(ApiError::Storage)
    }

    fn hydration_future(&self) -> SharedHydration {
        let mut slot = self.inner.hydration_in_flight.lock();
        if let Some(fut) = slot.as_ref() {
            return fut.clone();
        }

        let inner = Arc::clone(&self.inner);
        let fut = async move {
            let result = match inner.store.load().await {
                Ok(stored) => {
                    debug!(
                        has_access = stored.access_token.is_some(),
                        has_refresh = stored.refresh_token.is_some(),
                        "Hydrated tokens from storage"
                    );
                    let mut tokens = inner.tokens.lock();
                    // A login may have set a token while the read was in
                    // flight; never overwrite it with a stale stored one.
                    if tokens.access_token.is_none() {
                        tokens.access_token = stored.access_token;
                    }
                    if tokens.refresh_token.is_none() {
                        tokens.refresh_token = stored.refresh_token;
                    }
                    Ok(())
                }
                Err(e) => Err(e.to_string()),
            };
            // Cleared on either outcome so a later call can retry hydration
            inner.hydration_in_flight.lock().take();
            result
        }
        .boxed()
        .shared();

        *slot = Some(fut.clone());
        fut
    }

    /// Obtain the current in-flight refresh, or start one.
    /// At most one refresh call is outstanding at any time.
    fn refresh_future(&self) -> SharedRefresh {
        let mut slot = self.inner.refresh_in_flight.lock();
        if let Some(fut) = slot.as_ref() {
            debug!("Joining in-flight token refresh");
            return fut.clone();
        }

        let inner = Arc::clone(&self.inner);
        let fut = async move {
            let result = inner.perform_refresh().await;
            // Cleared on either outcome so a later 401 can refresh again
            inner.refresh_in_flight.lock().take();
            result
        }
        .boxed()
        .shared();

        *slot = Some(fut.clone());
        fut
    }
}

impl ClientInner {
    fn access_token(&self) -> Option<String> {
        self.tokens.lock().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens.lock().refresh_token.clone()
    }

    fn install_tokens(&self, pair: &TokenPair) {
        let mut tokens = self.tokens.lock();
        tokens.access_token = Some(pair.access_token.clone());
        tokens.refresh_token = Some(pair.refresh_token.clone());
    }

    fn clear_tokens(&self) {
        *self.tokens.lock() = StoredTokens::default();
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn install_session(&self, session: &AuthSession) {
        let pair = TokenPair {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        };
        self.install_tokens(&pair);
        if let Err(e) = self.store.save(&pair).await {
            warn!(error = %e, "Failed to persist session tokens");
        }
    }

    /// Build headers and perform one HTTP call. No retry logic here.
    async fn send(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut headers = options.headers.clone();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(PLATFORM_HEADER, header::HeaderValue::from_static(PLATFORM_VALUE));
        if let Some(token) = access_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }

        let mut request = self
            .http
            .request(options.method.clone(), self.url(endpoint))
            .headers(headers);
        if let Some(ref body) = options.body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    async fn perform_refresh(&self) -> Result<String, RefreshFailure> {
        let Some(refresh_token) = self.refresh_token() else {
            return Err(RefreshFailure {
                message: "No refresh token available".to_string(),
            });
        };

        debug!("Refreshing access token");
        let body = serde_json::json!({ "refreshToken": refresh_token });
        let call = self
            .http
            .post(self.url(REFRESH_ENDPOINT))
            .header(header::CONTENT_TYPE, "application/json")
            .header(PLATFORM_HEADER, PLATFORM_VALUE)
            .json(&body)
            .send();

        let response = match tokio::time::timeout(Duration::from_secs(REFRESH_TIMEOUT_SECS), call)
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(RefreshFailure {
                    message: format!("Token refresh request failed: {}", e),
                })
            }
            Err(_) => {
                return Err(RefreshFailure {
                    message: "Token refresh timed out".to_string(),
                })
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Token refresh rejected");
            return Err(RefreshFailure {
                message: format!("Token refresh failed with status {}", status.as_u16()),
            });
        }

        let parsed: RefreshResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return Err(RefreshFailure {
                    message: format!("Failed to parse refresh response: {}", e),
                })
            }
        };

        let pair = TokenPair {
            access_token: parsed.access_token,
            // The backend may omit the rotated refresh token; keep the old one
            refresh_token: parsed.refresh_token.unwrap_or(refresh_token),
        };

        // Persist before updating memory so the two converge even if the
        // write fails partway through the refresh.
        if let Err(e) = self.store.save(&pair).await {
            return Err(RefreshFailure {
                message: format!("Failed to persist refreshed tokens: {}", e),
            });
        }
        self.install_tokens(&pair);

        Ok(pair.access_token)
    }

    /// Tear down auth state after an unrecoverable failure and notify
    /// the application once.
    async fn fail_auth(&self) {
        self.clear_tokens();
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear stored tokens");
        }
        self.fire_auth_error();
    }

    fn fire_auth_error(&self) {
        let handler = {
            let mut hook = self.auth_error_hook.lock();
            if hook.fired {
                return;
            }
            let Some(handler) = hook.handler.clone() else {
                return;
            };
            hook.fired = true;
            handler
        };
        // Invoked outside the lock so the handler may re-register itself
        handler();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    #[test]
    fn test_new_rejects_empty_base_url() {
        let store = Arc::new(MemoryTokenStore::new());
        assert!(matches!(
            ApiClient::new("", store.clone()),
            Err(ApiError::MissingBaseUrl)
        ));
        assert!(matches!(
            ApiClient::new("   ", store),
            Err(ApiError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new("https://api.example.com/", store)
            .expect("Failed to build client");
        assert_eq!(
            client.inner.url("/vocabulary"),
            "https://api.example.com/vocabulary"
        );
    }

    #[test]
    fn test_request_options_defaults_to_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_refresh_response_optional_rotation() {
        let full: RefreshResponse =
            serde_json::from_str(r#"{"accessToken":"a2","refreshToken":"r2"}"#)
                .expect("Failed to parse refresh response");
        assert_eq!(full.access_token, "a2");
        assert_eq!(full.refresh_token.as_deref(), Some("r2"));

        let partial: RefreshResponse = serde_json::from_str(r#"{"accessToken":"a2"}"#)
            .expect("Failed to parse refresh response without rotation");
        assert!(partial.refresh_token.is_none());

        // Missing accessToken is a refresh failure, not a silent default
        assert!(serde_json::from_str::<RefreshResponse>(r#"{"refreshToken":"r2"}"#).is_err());
    }

    #[tokio::test]
    async fn test_set_tokens_are_visible_across_clones() {
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new("https://api.example.com", store)
            .expect("Failed to build client");
        let clone = client.clone();

        client.set_access_token("a1");
        client.set_refresh_token("r1");
        assert_eq!(clone.inner.access_token().as_deref(), Some("a1"));
        assert_eq!(clone.inner.refresh_token().as_deref(), Some("r1"));

        clone.logout().await;
        assert!(client.inner.access_token().is_none());
        assert!(client.inner.refresh_token().is_none());
    }
}
