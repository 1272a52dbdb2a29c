//! Sign-in flow on top of the API client.

use knightride_core::auth::{AuthResponse, Credentials, Registration};
use knightride_core::user::User;
use knightride_core::ApiResult;
use knightride_interaction::ApiClient;

/// Account registration, sign-in and profile lookup.
///
/// Tokens and passwords are never logged.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthResponse> {
        tracing::debug!(email = %registration.email, "Registering account");
        self.client.register(registration).await
    }

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        tracing::debug!(email = %credentials.email, "Signing in");
        self.client.login(credentials).await
    }

    pub fn logout(&self) {
        self.client.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Fetches the signed-in rider's profile.
    ///
    /// Always asks the server, which decides whether the session is valid.
    pub async fn current_user(&self) -> ApiResult<User> {
        self.client.get_profile().await
    }
}
