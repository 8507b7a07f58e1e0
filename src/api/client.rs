use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::{AppResult, Error};
use crate::session::SessionContext;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) const REFRESH_PATH: &str = "token/refresh/";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Authenticated API client shared by every component.
///
/// Attaches the session's bearer token to each request. A 401 triggers at
/// most one token refresh followed by one retry of the original request.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionContext) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The current access token, or `NotAuthenticated`
    pub async fn require_token(&self) -> AppResult<String> {
        self.session
            .access_token()
            .await?
            .ok_or(Error::NotAuthenticated)
    }

    /// Send without credentials and without the refresh logic (login, refresh)
    pub async fn send_anonymous(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        self.transport.send(request.with_bearer(None)).await
    }

    /// Send with the session's bearer token, refreshing once on 401
    pub async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let token = self.session.access_token().await?;
        let response = self
            .transport
            .send(request.clone().with_bearer(token))
            .await?;

        if response.status != 401 {
            return Ok(response);
        }

        debug!("{} {} returned 401, attempting token refresh", request.method, request.path);

        let refresh_token = match self.session.refresh_token().await? {
            Some(token) => token,
            None => {
                warn!("No refresh token available, login required");
                return Err(Error::SessionExpired);
            }
        };

        let access = match self.refresh_access_token(&refresh_token).await {
            Ok(access) => access,
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                return Err(Error::SessionExpired);
            }
        };

        let retried = self.transport.send(request.with_bearer(Some(access))).await?;
        if retried.status == 401 {
            warn!("Request still unauthorized after token refresh");
            return Err(Error::SessionExpired);
        }
        Ok(retried)
    }

    /// Exchange the refresh token for a new access token and store it
    async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<String> {
        let body = json!({ "refresh": refresh_token });
        let response = self
            .send_anonymous(ApiRequest::post(REFRESH_PATH, body))
            .await?
            .error_for_status()?;
        let refreshed: RefreshResponse = response.json()?;

        self.session.set_access_token(&refreshed.access).await?;
        if let Some(refresh) = &refreshed.refresh {
            self.session.set_refresh_token(refresh).await?;
        }

        info!("Access token refreshed");
        Ok(refreshed.access)
    }
}
