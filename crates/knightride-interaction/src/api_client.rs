//! ApiClient - REST client for the Knight Ride API.
//!
//! Every outbound call goes through [`ApiClient::request`], which attaches the
//! session's bearer token and normalizes every outcome into an
//! [`ApiResult`]. No operation here panics or returns anything but a result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use knightride_core::auth::{AuthResponse, Credentials, Registration};
use knightride_core::config::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use knightride_core::contact::{ContactAdded, ContactDeleted, ContactList, EmergencyContact};
use knightride_core::emergency::{SosAlert, SosDispatcher, SosReceipt};
use knightride_core::roadside::{NearbyServices, ServiceQuery, ServiceRequest, ServiceRequestReceipt};
use knightride_core::session::SessionStore;
use knightride_core::user::User;
use knightride_core::{ApiError, ApiResult};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::request::RequestEnvelope;

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
}

/// HTTP client for the Knight Ride API.
///
/// Cloning is cheap; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    timeout: Duration,
}

impl ApiClient {
    /// Creates a client for `base_url` that authenticates with `session`.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let base_url = base_url.into();
        let base_url = if base_url.trim().is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            base_url.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::new(),
            base_url,
            session,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Creates a client from the loaded configuration.
    ///
    /// A `request_timeout_secs` of 0 falls back to the default timeout.
    pub fn from_config(config: &ClientConfig, session: Arc<SessionStore>) -> Self {
        let timeout_secs = match config.request_timeout_secs {
            0 => {
                tracing::warn!(
                    "request_timeout_secs = 0 is not usable, using {} s",
                    DEFAULT_REQUEST_TIMEOUT_SECS
                );
                DEFAULT_REQUEST_TIMEOUT_SECS
            }
            secs => secs,
        };

        Self::new(config.api_base_url.clone(), session)
            .with_timeout(Duration::from_secs(timeout_secs))
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues a request and decodes the success payload as `T`.
    pub async fn request<T: DeserializeOwned>(&self, envelope: RequestEnvelope) -> ApiResult<T> {
        let method = envelope.method.clone();
        let path = envelope.path.clone();

        self.execute(envelope).await.map_err(|e| {
            tracing::warn!(%method, %path, "API request failed: {}", e);
            ApiError::from(e)
        })
    }

    async fn execute<T: DeserializeOwned>(&self, envelope: RequestEnvelope) -> Result<T, RequestError> {
        let url = format!("{}{}", self.base_url, envelope.path);
        tracing::debug!(method = %envelope.method, path = %envelope.path, "API request");

        let mut request = self
            .client
            .request(envelope.method, &url)
            .headers(self.headers(&envelope.headers))
            .timeout(self.timeout);

        if !envelope.query.is_empty() {
            request = request.query(&envelope.query);
        }
        if let Some(body) = &envelope.body {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Network(format!("Failed to reach {}: {}", self.base_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body is treated like an unparseable one.
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::from_response(status.as_u16(), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Network(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| RequestError::Decode(e.to_string()))
    }

    /// Default headers merged with the caller's overrides.
    fn headers(&self, overrides: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.get_token() {
            match HeaderValue::from_str(&token.bearer()) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Session token is not a valid header value, sending unauthenticated"),
            }
        }

        for name in overrides.keys() {
            headers.remove(name);
        }
        for (name, value) in overrides {
            headers.append(name, value.clone());
        }

        headers
    }

    /// Builds an envelope with a JSON body and sends it.
    async fn send_json<B, T>(&self, envelope: RequestEnvelope, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = envelope.json(body)?;
        self.request(envelope).await
    }

    /// Stores the token of a successful register/login response.
    fn remember_token(&self, result: &ApiResult<AuthResponse>) {
        if let Ok(auth) = result
            && !auth.access_token.is_empty()
        {
            self.session.set_token(auth.access_token.clone());
            tracing::info!(user_id = ?auth.user_id, "Signed in");
        }
    }

    // ============================================================================
    // Health
    // ============================================================================

    /// Checks that the API server is reachable.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.request(RequestEnvelope::get("/")).await
    }

    // ============================================================================
    // Authentication
    // ============================================================================

    /// Creates an account. On success the returned token becomes the session.
    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthResponse> {
        let result = self
            .send_json(RequestEnvelope::post("/auth/register"), registration)
            .await;
        self.remember_token(&result);
        result
    }

    /// Signs in. On success the returned token becomes the session.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let result = self
            .send_json(RequestEnvelope::post("/auth/login"), credentials)
            .await;
        self.remember_token(&result);
        result
    }

    /// Ends the session locally. The server keeps no session state.
    pub fn logout(&self) {
        self.session.clear_token();
        tracing::info!("Signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // ============================================================================
    // User profile
    // ============================================================================

    pub async fn get_profile(&self) -> ApiResult<User> {
        self.request(RequestEnvelope::get("/user/profile")).await
    }

    // ============================================================================
    // Services
    // ============================================================================

    /// Lists services near the rider. Absent filters are not sent.
    pub async fn get_nearby_services(&self, query: &ServiceQuery) -> ApiResult<NearbyServices> {
        let envelope =
            RequestEnvelope::get("/location/nearby-services").query(query.to_query_pairs());
        self.request(envelope).await
    }

    pub async fn request_service(&self, request: &ServiceRequest) -> ApiResult<ServiceRequestReceipt> {
        self.send_json(RequestEnvelope::post("/request-service"), request)
            .await
    }

    // ============================================================================
    // Emergency
    // ============================================================================

    pub async fn send_sos(&self, alert: &SosAlert) -> ApiResult<SosReceipt> {
        self.send_json(RequestEnvelope::post("/sos/send"), alert)
            .await
    }

    // ============================================================================
    // Emergency contacts
    // ============================================================================

    pub async fn add_emergency_contact(&self, contact: &EmergencyContact) -> ApiResult<ContactAdded> {
        self.send_json(RequestEnvelope::post("/contacts/add"), contact)
            .await
    }

    pub async fn get_emergency_contacts(&self) -> ApiResult<ContactList> {
        self.request(RequestEnvelope::get("/contacts")).await
    }

    /// Deletes the contact at `index` in the server's current list.
    ///
    /// Indices shift after every deletion; re-fetch the list before deleting
    /// again.
    pub async fn delete_emergency_contact(&self, index: usize) -> ApiResult<ContactDeleted> {
        self.request(RequestEnvelope::delete(format!("/contacts/{}", index)))
            .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl SosDispatcher for ApiClient {
    async fn send_sos(&self, alert: SosAlert) -> ApiResult<SosReceipt> {
        ApiClient::send_sos(self, &alert).await
    }
}
