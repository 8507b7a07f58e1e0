use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Not authenticated: no access token in the current session")]
    #[diagnostic(code(juzeng::not_authenticated), help("Run `juzeng login` first"))]
    NotAuthenticated,

    #[error("Session expired, please log in again")]
    #[diagnostic(code(juzeng::session_expired), help("Run `juzeng login` to start a new session"))]
    SessionExpired,

    #[error("Login failed: {0}")]
    #[diagnostic(code(juzeng::login))]
    Login(String),

    #[error("Permission denied: {0}")]
    #[diagnostic(code(juzeng::permission_denied))]
    PermissionDenied(String),

    #[error("API error: HTTP {status} - {body}")]
    #[diagnostic(code(juzeng::api))]
    Api { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    #[diagnostic(code(juzeng::transport))]
    Transport(String),

    #[error("Failed to load events: {0}")]
    #[diagnostic(code(juzeng::event_load))]
    EventLoad(String),

    #[error("Failed to save event: {0}")]
    #[diagnostic(code(juzeng::event_save))]
    EventSave(String),

    #[error("{0}")]
    #[diagnostic(code(juzeng::staff))]
    Staff(String),

    #[error("Lesson parsing failed: {0}")]
    #[diagnostic(code(juzeng::lesson_parsing))]
    LessonParsing(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(juzeng::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(juzeng::config))]
    Config(String),

    #[error("Session store error: {0}")]
    #[diagnostic(code(juzeng::session))]
    Session(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(juzeng::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(juzeng::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(juzeng::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(juzeng::other))]
    Other(String),
}

impl Error {
    /// Whether this error means the user has to log in (again)
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::NotAuthenticated | Error::SessionExpired)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid URL: {}", err))
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create session store errors
pub fn session_error(message: &str) -> Error {
    Error::Session(message.to_string())
}

/// Helper to create API status errors
pub fn api_error(status: u16, body: &str) -> Error {
    Error::Api {
        status,
        body: body.to_string(),
    }
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
