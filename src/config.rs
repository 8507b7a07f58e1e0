use crate::components::documents::Document;
use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default base URL of the JuzEng REST API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const COMPONENTS_FILE: &str = "config/components.toml";
const DOCUMENTS_FILE: &str = "config/documents.toml";

/// Main configuration structure for the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL every API path is resolved against
    pub api_base_url: String,
    /// File holding the access token, refresh token and role
    pub session_file: PathBuf,
    /// Timezone used to display calendar events
    pub timezone: String,
    /// Locale for console messages
    pub locale: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
    /// Document catalog shown on the documents page
    pub documents: Vec<Document>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentsFile {
    #[serde(default)]
    documents: Vec<Document>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: default_session_file(),
            timezone: String::from("UTC"),
            locale: String::from("en"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            components: default_components(),
            documents: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config files
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Config::default();

        if let Ok(url) = env::var("JUZENG_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(path) = env::var("JUZENG_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }
        if let Ok(timezone) = env::var("TIMEZONE") {
            config.timezone = timezone;
        }
        if let Ok(locale) = env::var("JUZENG_LOCALE") {
            config.locale = locale;
        }
        if let Ok(timeout) = env::var("JUZENG_REQUEST_TIMEOUT") {
            config.request_timeout_secs = timeout
                .parse::<u64>()
                .map_err(|_| env_error("JUZENG_REQUEST_TIMEOUT"))?;
        }

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string(COMPONENTS_FILE) {
            config.merge_components(&content)?;
        }

        if Path::new(DOCUMENTS_FILE).exists() {
            let content = fs::read_to_string(DOCUMENTS_FILE)?;
            config.documents = parse_documents(&content)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Merge component flags from TOML over the defaults
    pub fn merge_components(&mut self, content: &str) -> AppResult<()> {
        let file_components = toml::from_str::<HashMap<String, bool>>(content)?;
        for (key, value) in file_components {
            self.components.insert(key, value);
        }
        Ok(())
    }

    /// Check the values that are parsed lazily elsewhere
    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.api_base_url)?;
        self.tz()?;
        if self.request_timeout_secs == 0 {
            return Err(config_error("request timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Configured display timezone
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }
}

/// Parse the `[[documents]]` table list of a documents file
pub fn parse_documents(content: &str) -> AppResult<Vec<Document>> {
    let file: DocumentsFile = toml::from_str(content)?;
    Ok(file.documents)
}

fn default_components() -> HashMap<String, bool> {
    ["calendar", "staff", "lessons", "documents"]
        .into_iter()
        .map(|name| (name.to_string(), true))
        .collect()
}

fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("juzeng").join("session.toml"))
        .unwrap_or_else(|| PathBuf::from(".juzeng-session.toml"))
}
