use crate::api::auth::AuthClient;
use crate::error::AppResult;

/// Name and role shown in the page header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub name: String,
    pub role: String,
}

/// Page header: current user and logout
#[derive(Clone)]
pub struct Header {
    auth: AuthClient,
}

impl Header {
    pub fn new(auth: AuthClient) -> Self {
        Self { auth }
    }

    pub async fn info(&self) -> AppResult<HeaderInfo> {
        let profile = self.auth.me().await?;
        Ok(HeaderInfo {
            name: profile.display_name(),
            role: profile.role.unwrap_or_default(),
        })
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.auth.logout().await
    }
}
