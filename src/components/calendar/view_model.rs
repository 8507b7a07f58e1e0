use super::models::{DisplayEvent, DraftEvent, EventColor, EventKind};
use crate::api::events::RemoteEvent;
use crate::api::users::StaffMember;
use crate::error::AppResult;
use crate::utils::time::parse_backend_timestamp;
use chrono::DateTime;
use chrono_tz::Tz;

/// Project a remote event into its calendar form
pub fn to_display_event(event: &RemoteEvent, tz: &Tz) -> AppResult<DisplayEvent> {
    let kind = event.event_type.to_lowercase();

    let title = if kind == EventKind::Lesson.as_str() {
        format!("Lesson: {}", event.group.as_deref().unwrap_or_default())
    } else {
        format!("Meeting: {}", event.name.as_deref().unwrap_or_default())
    };

    let color = if kind == EventKind::Meeting.as_str() {
        EventColor::Green
    } else {
        EventColor::Blue
    };

    let teacher = match (&event.teacher_first_name, &event.teacher_last_name) {
        (None, None) => None,
        (first, last) => Some(format!(
            "{} {}",
            first.as_deref().unwrap_or("N/A"),
            last.as_deref().unwrap_or("N/A")
        )),
    };

    Ok(DisplayEvent {
        id: event.id,
        title,
        start: parse_backend_timestamp(&event.start_time, tz)?,
        end: parse_backend_timestamp(&event.end_time, tz)?,
        color,
        kind,
        teacher,
        link: event.event_link.clone(),
        group: event.group.clone(),
        flow_number: event.flow_number.clone(),
    })
}

/// Read-only copy of the calendar state for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarSnapshot {
    pub events: Vec<DisplayEvent>,
    pub teachers: Vec<StaffMember>,
    pub draft: Option<DraftEvent>,
    pub selected: Option<DisplayEvent>,
}

impl CalendarSnapshot {
    pub fn is_detail_open(&self) -> bool {
        self.selected.is_some()
    }
}

/// Calendar page state: the projected event list, the teacher roster, the
/// draft being composed and the event open in the detail view.
///
/// Pure state, no I/O. The calendar actor owns one instance.
#[derive(Debug)]
pub struct CalendarViewModel {
    timezone: Tz,
    events: Vec<DisplayEvent>,
    teachers: Vec<StaffMember>,
    draft: Option<DraftEvent>,
    selected: Option<DisplayEvent>,
}

impl CalendarViewModel {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            events: Vec::new(),
            teachers: Vec::new(),
            draft: None,
            selected: None,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    pub fn teachers(&self) -> &[StaffMember] {
        &self.teachers
    }

    pub fn draft(&self) -> Option<&DraftEvent> {
        self.draft.as_ref()
    }

    pub fn selected(&self) -> Option<&DisplayEvent> {
        self.selected.as_ref()
    }

    /// Replace the whole event list. Nothing changes if any event fails to
    /// project.
    pub fn replace_events(&mut self, remote: &[RemoteEvent]) -> AppResult<()> {
        let events = remote
            .iter()
            .map(|event| to_display_event(event, &self.timezone))
            .collect::<AppResult<Vec<_>>>()?;
        self.events = events;
        Ok(())
    }

    pub fn set_teachers(&mut self, teachers: Vec<StaffMember>) {
        self.teachers = teachers;
    }

    /// Start composing an event for the selected slot
    pub fn select_slot(&mut self, start: DateTime<Tz>, end: DateTime<Tz>) -> &DraftEvent {
        self.draft.insert(DraftEvent::new(start, end))
    }

    pub fn update_draft(&mut self, draft: DraftEvent) {
        self.draft = Some(draft);
    }

    pub fn discard_draft(&mut self) -> Option<DraftEvent> {
        self.draft.take()
    }

    pub fn select_event(&mut self, event: DisplayEvent) {
        self.selected = Some(event);
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn is_detail_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn find_event(&self, id: i64) -> Option<&DisplayEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn snapshot(&self) -> CalendarSnapshot {
        CalendarSnapshot {
            events: self.events.clone(),
            teachers: self.teachers.clone(),
            draft: self.draft.clone(),
            selected: self.selected.clone(),
        }
    }
}
