use super::actor::{CalendarActor, CalendarActorHandle};
use super::models::{DisplayEvent, DraftEvent};
use super::view_model::CalendarSnapshot;
use crate::api::events::EventsClient;
use crate::api::users::UsersClient;
use crate::error::{component_error, AppResult};
use crate::session::SessionContext;
use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the calendar actor
#[derive(Clone)]
pub struct CalendarHandle {
    actor_handle: CalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CalendarHandle {
    /// Create a new CalendarHandle and spawn the actor
    pub fn new(
        timezone: Tz,
        events: EventsClient,
        users: UsersClient,
        session: SessionContext,
    ) -> Self {
        let (mut actor, handle) = CalendarActor::new(timezone, events, users, session);

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Fetch events from the backend, returns how many were loaded
    pub async fn load(&self) -> AppResult<usize> {
        self.actor_handle.load().await
    }

    /// Start a draft for a chosen calendar slot
    pub async fn select_slot(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> AppResult<DraftEvent> {
        self.actor_handle.select_slot(start, end).await
    }

    /// Start a draft for the next free hour
    pub async fn open_add_event(&self) -> AppResult<DraftEvent> {
        self.actor_handle.open_add_event().await
    }

    pub async fn update_draft(&self, draft: DraftEvent) -> AppResult<()> {
        self.actor_handle.update_draft(draft).await
    }

    pub async fn discard_draft(&self) -> AppResult<Option<DraftEvent>> {
        self.actor_handle.discard_draft().await
    }

    pub async fn select_event(&self, event: DisplayEvent) -> AppResult<()> {
        self.actor_handle.select_event(event).await
    }

    /// Open the loaded event with the given id in the detail view
    pub async fn select_event_by_id(&self, id: i64) -> AppResult<DisplayEvent> {
        let snapshot = self.snapshot().await?;
        let event = snapshot
            .events
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| component_error(&format!("No event with id {}", id)))?;
        self.select_event(event.clone()).await?;
        Ok(event)
    }

    pub async fn close_detail(&self) -> AppResult<()> {
        self.actor_handle.close_detail().await
    }

    /// Create the event, then reload the calendar
    pub async fn submit_draft(&self, draft: DraftEvent) -> AppResult<()> {
        self.actor_handle.submit_draft(draft).await
    }

    pub async fn snapshot(&self) -> AppResult<CalendarSnapshot> {
        self.actor_handle.snapshot().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}
