#![allow(dead_code)]

use async_trait::async_trait;
use juzeng_admin::api::{ApiRequest, ApiResponse, JuzengApi, Method, Transport};
use juzeng_admin::error::{AppResult, Error};
use juzeng_admin::session::{Session, SessionContext};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted transport: queued responses per method and path, plus a log of
/// every request sent.
///
/// The last queued response for a route is repeated for later calls.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for `method path`
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse::new(status, body));
        self
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to one route
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap()),
            Some(queue) if !queue.is_empty() => Ok(queue[0].clone()),
            _ => Err(Error::Transport(format!("no response scripted for {} {}", key.0, key.1))),
        }
    }
}

/// Session holding both tokens and the given role
pub fn logged_in(role: &str) -> SessionContext {
    SessionContext::in_memory(Session {
        access_token: Some("access-1".to_string()),
        refresh_token: Some("refresh-1".to_string()),
        role: Some(role.to_string()),
    })
}

pub fn logged_out() -> SessionContext {
    SessionContext::in_memory(Session::default())
}

pub fn api(transport: &Arc<MockTransport>, session: SessionContext) -> JuzengApi {
    let transport: Arc<dyn Transport> = transport.clone();
    JuzengApi::new(transport, session)
}

pub const LESSON_EV3: &str = r#"{
    "id": 7,
    "event_type": "Lesson",
    "group": "EV-3",
    "start_time": "2024-01-01T20:15:00Z",
    "end_time": "2024-01-01T21:15:00Z",
    "teacher_first_name": "Yenlik",
    "teacher_last_name": "Alibaeva",
    "event_link": "https://meet.example.com/ev-3",
    "flow_number": 1.0
}"#;

pub const MEETING_SYNC: &str = r#"{
    "id": 9,
    "event_type": "Meeting",
    "name": "Staff Sync",
    "start_time": "2024-01-02T10:00:00Z",
    "end_time": "2024-01-02T11:00:00Z"
}"#;

pub fn events_body(events: &[&str]) -> String {
    format!("[{}]", events.join(","))
}
