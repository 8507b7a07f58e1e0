use super::client::ApiClient;
use super::transport::ApiRequest;
use crate::error::{AppResult, Error};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

const TOKEN_PATH: &str = "token/";
const ME_PATH: &str = "me";
const USERS_ME_PATH: &str = "users/me";

/// Route every role lands on after logging in
pub const LANDING_ROUTE: &str = "/calendar";

/// Token pair and role returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub role: String,
}

/// The logged-in user as shown in the header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{} {}", first, last).trim().to_string()
    }
}

/// Login, profile and logout
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange email and password for tokens and store them in the session
    pub async fn login(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let body = json!({ "email": email, "password": password });
        let response = self
            .api
            .send_anonymous(ApiRequest::post(TOKEN_PATH, body))
            .await?;

        if !response.is_success() {
            let message = response
                .json_value()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(Error::Login(message));
        }

        let tokens: TokenPair = response.json()?;
        self.api
            .session()
            .set_session(&tokens.access, &tokens.refresh, &tokens.role)
            .await?;

        info!("Logged in as {} ({})", email, tokens.role);
        Ok(tokens)
    }

    /// Fetch the current user, trying `/me` and then `/users/me`
    pub async fn me(&self) -> AppResult<UserProfile> {
        self.api.require_token().await?;

        let response = self.api.send(ApiRequest::get(ME_PATH)).await?;
        let response = if response.status == 404 {
            debug!("/me not found, falling back to /users/me");
            self.api.send(ApiRequest::get(USERS_ME_PATH)).await?
        } else {
            response
        };

        response.error_for_status()?.json()
    }

    /// Forget every stored credential
    pub async fn logout(&self) -> AppResult<()> {
        self.api.session().clear().await?;
        info!("Logged out");
        Ok(())
    }
}
