use crate::api::events::{CreateEventRequest, CreateLessonRequest, CreateMeetingRequest};
use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

/// The two kinds of calendar events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Lesson,
    Meeting,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Lesson => "lesson",
            EventKind::Meeting => "meeting",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color of an event on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColor {
    Green,
    Blue,
}

impl EventColor {
    pub fn as_str(self) -> &'static str {
        match self {
            EventColor::Green => "green",
            EventColor::Blue => "blue",
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar-ready projection of a remote event
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEvent {
    pub id: i64,
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub color: EventColor,
    /// Lowercased `event_type` as sent by the backend
    pub kind: String,
    pub teacher: Option<String>,
    pub link: Option<String>,
    pub group: Option<String>,
    pub flow_number: Option<String>,
}

impl DisplayEvent {
    pub fn is_meeting(&self) -> bool {
        self.kind == EventKind::Meeting.as_str()
    }
}

/// Lesson-specific draft fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonDraft {
    pub group: String,
    pub flow_number: String,
    pub teacher_id: Option<i64>,
    pub student_count: Option<u32>,
}

/// Meeting-specific draft fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingDraft {
    pub name: String,
    pub participants: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftDetails {
    Lesson(LessonDraft),
    Meeting(MeetingDraft),
}

/// An event being composed, not yet sent to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEvent {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub event_link: String,
    pub details: DraftDetails,
}

impl DraftEvent {
    /// Empty lesson draft for the given slot
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start,
            end,
            event_link: String::new(),
            details: DraftDetails::Lesson(LessonDraft::default()),
        }
    }

    pub fn lesson(start: DateTime<Tz>, end: DateTime<Tz>, lesson: LessonDraft) -> Self {
        Self {
            details: DraftDetails::Lesson(lesson),
            ..Self::new(start, end)
        }
    }

    pub fn meeting(start: DateTime<Tz>, end: DateTime<Tz>, meeting: MeetingDraft) -> Self {
        Self {
            details: DraftDetails::Meeting(meeting),
            ..Self::new(start, end)
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.event_link = link.into();
        self
    }

    pub fn kind(&self) -> EventKind {
        match self.details {
            DraftDetails::Lesson(_) => EventKind::Lesson,
            DraftDetails::Meeting(_) => EventKind::Meeting,
        }
    }

    /// Switch the draft type, resetting type-specific fields
    pub fn set_kind(&mut self, kind: EventKind) {
        if self.kind() == kind {
            return;
        }
        self.details = match kind {
            EventKind::Lesson => DraftDetails::Lesson(LessonDraft::default()),
            EventKind::Meeting => DraftDetails::Meeting(MeetingDraft::default()),
        };
    }

    /// Build the creation payload for the draft's type
    pub fn to_request(&self) -> CreateEventRequest {
        let start_time = self.start.to_rfc3339();
        let end_time = self.end.to_rfc3339();
        let event_link = self.event_link.clone();

        match &self.details {
            DraftDetails::Lesson(lesson) => CreateEventRequest::Lesson(CreateLessonRequest {
                flow_number: lesson.flow_number.clone(),
                start_time,
                end_time,
                teacher: lesson.teacher_id,
                group: lesson.group.clone(),
                student_count: lesson.student_count,
                event_link,
            }),
            DraftDetails::Meeting(meeting) => CreateEventRequest::Meeting(CreateMeetingRequest {
                start_time,
                end_time,
                name: meeting.name.clone(),
                event_link,
                participants: meeting.participants.clone(),
            }),
        }
    }
}
