//! Typed client for the JuzEng REST API.

pub mod auth;
pub mod client;
pub mod events;
pub mod lessons;
pub mod transport;
pub mod users;

pub use auth::{AuthClient, TokenPair, UserProfile};
pub use client::ApiClient;
pub use events::{CreateEventRequest, CreateLessonRequest, CreateMeetingRequest, EventsClient, RemoteEvent};
pub use lessons::{LessonsClient, ParsedLesson};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use users::{NewStaffMember, StaffMember, UsersClient};

use crate::session::SessionContext;
use std::sync::Arc;

/// All API clients over one transport and session
#[derive(Clone)]
pub struct JuzengApi {
    pub auth: AuthClient,
    pub events: EventsClient,
    pub lessons: LessonsClient,
    pub users: UsersClient,
    client: ApiClient,
}

impl JuzengApi {
    pub fn new(transport: Arc<dyn Transport>, session: SessionContext) -> Self {
        let client = ApiClient::new(transport, session);

        Self {
            auth: AuthClient::new(client.clone()),
            events: EventsClient::new(client.clone()),
            lessons: LessonsClient::new(client.clone()),
            users: UsersClient::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }
}

pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept `"1.0"`, `1.0` or `7` as an optional string
    pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
    }
}
