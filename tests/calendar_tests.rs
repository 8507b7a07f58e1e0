mod common;

use chrono::TimeZone;
use chrono_tz::UTC;
use common::*;
use juzeng_admin::api::Method;
use juzeng_admin::components::calendar::{
    CalendarHandle, DraftEvent, EventColor, LessonDraft, MeetingDraft,
};
use juzeng_admin::error::Error;
use juzeng_admin::session::SessionContext;
use std::sync::Arc;

fn calendar(transport: &Arc<MockTransport>, session: SessionContext) -> CalendarHandle {
    let api = api(transport, session.clone());
    CalendarHandle::new(UTC, api.events.clone(), api.users.clone(), session)
}

#[tokio::test]
async fn test_load_projects_lesson_event() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3]));
    let handle = calendar(&transport, logged_in("teacher"));

    assert_eq!(handle.load().await.unwrap(), 1);

    let snapshot = handle.snapshot().await.unwrap();
    let event = &snapshot.events[0];
    assert_eq!(event.id, 7);
    assert_eq!(event.title, "Lesson: EV-3");
    assert_eq!(event.color, EventColor::Blue);
    assert_eq!(event.kind, "lesson");
    assert_eq!(event.start, UTC.with_ymd_and_hms(2024, 1, 1, 20, 15, 0).unwrap());
    assert_eq!(event.end, UTC.with_ymd_and_hms(2024, 1, 1, 21, 15, 0).unwrap());
    assert_eq!(event.teacher.as_deref(), Some("Yenlik Alibaeva"));
    assert_eq!(event.flow_number.as_deref(), Some("1.0"));

    let sent = transport.requests_to(Method::Get, "events/");
    assert_eq!(sent[0].bearer.as_deref(), Some("access-1"));
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_load_meeting_is_green() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 200, &events_body(&[MEETING_SYNC]));
    let handle = calendar(&transport, logged_in("teacher"));

    handle.load().await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.events[0].title, "Meeting: Staff Sync");
    assert_eq!(snapshot.events[0].color, EventColor::Green);
    assert!(snapshot.events[0].is_meeting());
}

#[tokio::test]
async fn test_load_keeps_every_event_in_order() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3, MEETING_SYNC]));
    let handle = calendar(&transport, logged_in("teacher"));

    assert_eq!(handle.load().await.unwrap(), 2);

    let snapshot = handle.snapshot().await.unwrap();
    let ids: Vec<i64> = snapshot.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![7, 9]);
    let titles: Vec<&str> = snapshot.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Lesson: EV-3", "Meeting: Staff Sync"]);
}

#[tokio::test]
async fn test_empty_list_loads_no_events() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3]))
        .respond(Method::Get, "events/", 200, "[]");
    let handle = calendar(&transport, logged_in("teacher"));

    assert_eq!(handle.load().await.unwrap(), 1);
    assert_eq!(handle.load().await.unwrap(), 0);
    assert!(handle.snapshot().await.unwrap().events.is_empty());
}

#[tokio::test]
async fn test_load_without_token_sends_nothing() {
    let transport = MockTransport::new();
    let handle = calendar(&transport, logged_out());

    let err = handle.load().await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated), "{err:?}");
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_failed_load_keeps_previous_events() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3, MEETING_SYNC]))
        .respond(Method::Get, "events/", 500, "boom");
    let handle = calendar(&transport, logged_in("teacher"));

    handle.load().await.unwrap();
    assert!(handle.load().await.is_err());

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.events.len(), 2);
}

#[tokio::test]
async fn test_unparseable_timestamp_fails_whole_load() {
    let transport = MockTransport::new();
    let broken = r#"{"id": 3, "event_type": "Lesson", "group": "X",
        "start_time": "tomorrow", "end_time": "2024-01-01T21:15:00Z"}"#;
    transport.respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3, broken]));
    let handle = calendar(&transport, logged_in("teacher"));

    assert!(handle.load().await.is_err());
    assert!(handle.snapshot().await.unwrap().events.is_empty());
}

#[tokio::test]
async fn test_select_slot_opens_draft_with_exact_times() {
    let transport = MockTransport::new();
    let handle = calendar(&transport, logged_in("teacher"));
    let start = UTC.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap();
    let end = UTC.with_ymd_and_hms(2024, 3, 4, 19, 45, 0).unwrap();

    let draft = handle.select_slot(start, end).await.unwrap();
    assert_eq!(draft.start, start);
    assert_eq!(draft.end, end);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.draft, Some(draft));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_select_event_opens_detail_without_fetch() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3, MEETING_SYNC]));
    let handle = calendar(&transport, logged_in("teacher"));
    handle.load().await.unwrap();

    let event = handle.select_event_by_id(9).await.unwrap();
    assert_eq!(event.title, "Meeting: Staff Sync");

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.is_detail_open());
    assert_eq!(snapshot.selected.map(|e| e.id), Some(9));
    assert_eq!(transport.requests().len(), 1);

    handle.close_detail().await.unwrap();
    assert!(!handle.snapshot().await.unwrap().is_detail_open());
    assert!(handle.select_event_by_id(404).await.is_err());
}

#[tokio::test]
async fn test_submit_lesson_creates_then_reloads() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 200, "[]")
        .respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3]))
        .respond(Method::Post, "lessons/", 201, "{}");
    let handle = calendar(&transport, logged_in("teacher"));
    handle.load().await.unwrap();

    let start = UTC.with_ymd_and_hms(2024, 1, 1, 20, 15, 0).unwrap();
    let end = UTC.with_ymd_and_hms(2024, 1, 1, 21, 15, 0).unwrap();
    let draft = DraftEvent::lesson(
        start,
        end,
        LessonDraft {
            group: "EV-3".to_string(),
            flow_number: "1".to_string(),
            teacher_id: Some(12),
            student_count: Some(8),
        },
    )
    .with_link("https://meet.example.com/ev-3");
    handle.select_slot(start, end).await.unwrap();
    handle.submit_draft(draft).await.unwrap();

    let created = transport.requests_to(Method::Post, "lessons/");
    assert_eq!(created.len(), 1);
    let body = created[0].body.as_ref().unwrap();
    assert_eq!(body["group"], "EV-3");
    assert_eq!(body["teacher"], 12);
    assert_eq!(body["event_link"], "https://meet.example.com/ev-3");

    assert_eq!(transport.requests_to(Method::Get, "events/").len(), 2);
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.events.len(), 1);
    assert!(snapshot.draft.is_none());
}

#[tokio::test]
async fn test_failed_submit_keeps_draft() {
    let transport = MockTransport::new();
    transport.respond(Method::Post, "meetings/", 400, r#"{"name": ["required"]}"#);
    let handle = calendar(&transport, logged_in("supervisor"));

    let start = UTC.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
    let end = UTC.with_ymd_and_hms(2024, 1, 2, 11, 0, 0).unwrap();
    let draft = DraftEvent::meeting(
        start,
        end,
        MeetingDraft {
            name: String::new(),
            participants: vec![1, 2],
        },
    );

    let err = handle.submit_draft(draft.clone()).await.unwrap_err();
    assert!(matches!(err, Error::EventSave(_)), "{err:?}");
    assert_eq!(handle.snapshot().await.unwrap().draft, Some(draft));
    assert!(transport.requests_to(Method::Get, "events/").is_empty());
}

#[tokio::test]
async fn test_roster_loaded_only_for_privileged_roles() {
    let roster = r#"[{"id": 12, "first_name": "Yenlik", "last_name": "Alibaeva", "role": "teacher"}]"#;

    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 200, "[]")
        .respond(Method::Get, "users/", 200, roster);

    let teacher = calendar(&transport, logged_in("teacher"));
    teacher.load().await.unwrap();
    assert!(transport.requests_to(Method::Get, "users/").is_empty());
    assert!(teacher.snapshot().await.unwrap().teachers.is_empty());

    let supervisor = calendar(&transport, logged_in("supervisor"));
    supervisor.load().await.unwrap();
    let roster_requests = transport.requests_to(Method::Get, "users/");
    assert_eq!(roster_requests.len(), 1);
    assert_eq!(
        roster_requests[0].query,
        vec![("role".to_string(), "teacher".to_string())]
    );
    assert_eq!(supervisor.snapshot().await.unwrap().teachers[0].id, 12);
}

#[tokio::test]
async fn test_roster_failure_does_not_fail_load() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 200, &events_body(&[LESSON_EV3]))
        .respond(Method::Get, "users/", 500, "down");
    let handle = calendar(&transport, logged_in("superadmin"));

    assert_eq!(handle.load().await.unwrap(), 1);
}
