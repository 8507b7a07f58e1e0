use crate::api::{HttpTransport, JuzengApi, Transport};
use crate::config::Config;
use crate::error::AppResult;
use crate::session::{FileSessionStore, SessionContext};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Shared dependencies handed to every component
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<RwLock<Config>>,
    pub api: JuzengApi,
}

impl AppContext {
    pub fn new(config: Arc<RwLock<Config>>, api: JuzengApi) -> Self {
        Self { config, api }
    }

    /// Wire the HTTP transport and file session store from configuration
    pub fn from_config(config: Config) -> AppResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?);
        let session = SessionContext::new(Arc::new(FileSessionStore::new(&config.session_file)));

        Ok(Self::new(Arc::new(RwLock::new(config)), JuzengApi::new(transport, session)))
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }
}
