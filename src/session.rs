//! Client-side session: access token, refresh token and role.
//!
//! Every component receives a [`SessionContext`] instead of reading a global
//! store. The context is cheap to clone and delegates persistence to a
//! [`SessionStore`].

use crate::error::{session_error, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

/// Staff role as reported by the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Curator,
    Supervisor,
    Superadmin,
}

impl Role {
    /// Supervisors and superadmins see staff and lesson management
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Supervisor | Role::Superadmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Curator => "curator",
            Role::Supervisor => "supervisor",
            Role::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "curator" => Ok(Role::Curator),
            "supervisor" => Ok(Role::Supervisor),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(session_error(&format!("Unknown role: {}", other))),
        }
    }
}

/// Persisted session values, stored under fixed keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Backing storage for the session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the stored session, empty if nothing was stored yet
    async fn load(&self) -> AppResult<Session>;

    /// Replace the stored session
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Remove every stored value
    async fn clear(&self) -> AppResult<()>;
}

/// Session store backed by a TOML file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AppResult<Session> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Session::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = toml::to_string(session)?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only from creation, the file holds credentials
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;

        // Files created by older versions keep their mode on open
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
        }

        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session store, used by tests and one-shot tooling
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Session> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        *self.session.write().await = session.clone();
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.session.write().await = Session::default();
        Ok(())
    }
}

/// Shared session handle injected into every component
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Session context over an in-memory store
    pub fn in_memory(session: Session) -> Self {
        Self::new(Arc::new(MemorySessionStore::new(session)))
    }

    /// Current access token; empty tokens count as absent
    pub async fn access_token(&self) -> AppResult<Option<String>> {
        let session = self.store.load().await?;
        Ok(session.access_token.filter(|t| !t.is_empty()))
    }

    pub async fn refresh_token(&self) -> AppResult<Option<String>> {
        let session = self.store.load().await?;
        Ok(session.refresh_token.filter(|t| !t.is_empty()))
    }

    /// Current role; unknown role strings are treated as no role
    pub async fn role(&self) -> AppResult<Option<Role>> {
        let session = self.store.load().await?;
        Ok(session.role.as_deref().and_then(|raw| match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                debug!("Ignoring stored role: {}", e);
                None
            }
        }))
    }

    /// Whether the current role may see privileged controls
    pub async fn is_privileged(&self) -> AppResult<bool> {
        Ok(self.role().await?.map(Role::is_privileged).unwrap_or(false))
    }

    /// Store a fresh login
    pub async fn set_session(&self, access: &str, refresh: &str, role: &str) -> AppResult<()> {
        let session = Session {
            access_token: Some(access.to_string()),
            refresh_token: Some(refresh.to_string()),
            role: Some(role.to_string()),
        };
        self.store.save(&session).await
    }

    /// Replace only the access token, keeping refresh token and role
    pub async fn set_access_token(&self, access: &str) -> AppResult<()> {
        let mut session = self.store.load().await?;
        session.access_token = Some(access.to_string());
        self.store.save(&session).await
    }

    /// Replace the refresh token after a rotating refresh
    pub async fn set_refresh_token(&self, refresh: &str) -> AppResult<()> {
        let mut session = self.store.load().await?;
        session.refresh_token = Some(refresh.to_string());
        self.store.save(&session).await
    }

    /// Forget the session (logout)
    pub async fn clear(&self) -> AppResult<()> {
        self.store.clear().await
    }
}
