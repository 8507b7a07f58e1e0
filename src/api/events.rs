use super::client::ApiClient;
use super::de::opt_string_or_number;
use super::transport::ApiRequest;
use crate::error::AppResult;
use serde::{Deserialize, Serialize};

const EVENTS_PATH: &str = "events/";
const LESSONS_PATH: &str = "lessons/";
const MEETINGS_PATH: &str = "meetings/";

/// Lesson or meeting record as returned by `GET /events/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: i64,
    pub event_type: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub teacher_first_name: Option<String>,
    #[serde(default)]
    pub teacher_last_name: Option<String>,
    #[serde(default)]
    pub event_link: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub flow_number: Option<String>,
}

/// Body of `POST /lessons/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateLessonRequest {
    pub flow_number: String,
    pub start_time: String,
    pub end_time: String,
    pub teacher: Option<i64>,
    pub group: String,
    pub student_count: Option<u32>,
    pub event_link: String,
}

/// Body of `POST /meetings/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateMeetingRequest {
    pub start_time: String,
    pub end_time: String,
    pub name: String,
    pub event_link: String,
    pub participants: Vec<i64>,
}

/// A creation request for either event type
#[derive(Debug, Clone, PartialEq)]
pub enum CreateEventRequest {
    Lesson(CreateLessonRequest),
    Meeting(CreateMeetingRequest),
}

impl CreateEventRequest {
    /// Endpoint the request is posted to
    pub fn path(&self) -> &'static str {
        match self {
            CreateEventRequest::Lesson(_) => LESSONS_PATH,
            CreateEventRequest::Meeting(_) => MEETINGS_PATH,
        }
    }

    fn to_request(&self) -> AppResult<ApiRequest> {
        let body = match self {
            CreateEventRequest::Lesson(lesson) => serde_json::to_value(lesson)?,
            CreateEventRequest::Meeting(meeting) => serde_json::to_value(meeting)?,
        };
        Ok(ApiRequest::post(self.path(), body))
    }
}

/// Calendar event endpoints
#[derive(Clone)]
pub struct EventsClient {
    api: ApiClient,
}

impl EventsClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All lessons and meetings, merged by the backend
    pub async fn list(&self) -> AppResult<Vec<RemoteEvent>> {
        self.api
            .send(ApiRequest::get(EVENTS_PATH))
            .await?
            .error_for_status()?
            .json()
    }

    /// Create a lesson or meeting; the response body is not used
    pub async fn create(&self, request: &CreateEventRequest) -> AppResult<()> {
        self.api
            .send(request.to_request()?)
            .await?
            .error_for_status()?;
        Ok(())
    }
}
