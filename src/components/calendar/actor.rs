use super::models::{DisplayEvent, DraftEvent};
use super::view_model::{CalendarSnapshot, CalendarViewModel};
use crate::api::events::EventsClient;
use crate::api::users::UsersClient;
use crate::error::{component_error, AppResult, Error};
use crate::session::SessionContext;
use crate::utils::time::default_slot;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The calendar actor that owns the view-model and processes messages
pub struct CalendarActor {
    view_model: CalendarViewModel,
    events: EventsClient,
    users: UsersClient,
    session: SessionContext,
    command_rx: mpsc::Receiver<CalendarCommand>,
}

/// Commands that can be sent to the calendar actor
pub enum CalendarCommand {
    Load(mpsc::Sender<AppResult<usize>>),
    SelectSlot(DateTime<Tz>, DateTime<Tz>, mpsc::Sender<DraftEvent>),
    OpenAddEvent(mpsc::Sender<DraftEvent>),
    UpdateDraft(DraftEvent, mpsc::Sender<()>),
    DiscardDraft(mpsc::Sender<Option<DraftEvent>>),
    SelectEvent(DisplayEvent, mpsc::Sender<()>),
    CloseDetail(mpsc::Sender<()>),
    SubmitDraft(DraftEvent, mpsc::Sender<AppResult<()>>),
    Snapshot(mpsc::Sender<CalendarSnapshot>),
    Shutdown,
}

/// Handle for communicating with the calendar actor
#[derive(Clone)]
pub struct CalendarActorHandle {
    command_tx: mpsc::Sender<CalendarCommand>,
}

impl CalendarActorHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<T>) -> CalendarCommand,
    ) -> AppResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(build(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    /// Fetch the event list (and roster for privileged roles)
    pub async fn load(&self) -> AppResult<usize> {
        self.request(CalendarCommand::Load).await?
    }

    pub async fn select_slot(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> AppResult<DraftEvent> {
        self.request(|tx| CalendarCommand::SelectSlot(start, end, tx)).await
    }

    pub async fn open_add_event(&self) -> AppResult<DraftEvent> {
        self.request(CalendarCommand::OpenAddEvent).await
    }

    pub async fn update_draft(&self, draft: DraftEvent) -> AppResult<()> {
        self.request(|tx| CalendarCommand::UpdateDraft(draft, tx)).await
    }

    pub async fn discard_draft(&self) -> AppResult<Option<DraftEvent>> {
        self.request(CalendarCommand::DiscardDraft).await
    }

    pub async fn select_event(&self, event: DisplayEvent) -> AppResult<()> {
        self.request(|tx| CalendarCommand::SelectEvent(event, tx)).await
    }

    pub async fn close_detail(&self) -> AppResult<()> {
        self.request(CalendarCommand::CloseDetail).await
    }

    pub async fn submit_draft(&self, draft: DraftEvent) -> AppResult<()> {
        self.request(|tx| CalendarCommand::SubmitDraft(draft, tx)).await?
    }

    pub async fn snapshot(&self) -> AppResult<CalendarSnapshot> {
        self.request(CalendarCommand::Snapshot).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(CalendarCommand::Shutdown).await;
        Ok(())
    }
}

// Keep login errors as they are, everything else is a load failure
fn load_error(e: Error) -> Error {
    if e.requires_login() {
        e
    } else {
        Error::EventLoad(e.to_string())
    }
}

fn save_error(e: Error) -> Error {
    if e.requires_login() {
        e
    } else {
        Error::EventSave(e.to_string())
    }
}

impl CalendarActor {
    /// Create a new actor and return its handle
    pub fn new(
        timezone: Tz,
        events: EventsClient,
        users: UsersClient,
        session: SessionContext,
    ) -> (Self, CalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            view_model: CalendarViewModel::new(timezone),
            events,
            users,
            session,
            command_rx,
        };

        (actor, CalendarActorHandle { command_tx })
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Calendar actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                CalendarCommand::Load(response_tx) => {
                    let result = self.load().await;
                    let _ = response_tx.send(result).await;
                }
                CalendarCommand::SelectSlot(start, end, response_tx) => {
                    let draft = self.view_model.select_slot(start, end).clone();
                    let _ = response_tx.send(draft).await;
                }
                CalendarCommand::OpenAddEvent(response_tx) => {
                    let now = Utc::now().with_timezone(&self.view_model.timezone());
                    let (start, end) = default_slot(now);
                    let draft = self.view_model.select_slot(start, end).clone();
                    let _ = response_tx.send(draft).await;
                }
                CalendarCommand::UpdateDraft(draft, response_tx) => {
                    self.view_model.update_draft(draft);
                    let _ = response_tx.send(()).await;
                }
                CalendarCommand::DiscardDraft(response_tx) => {
                    let _ = response_tx.send(self.view_model.discard_draft()).await;
                }
                CalendarCommand::SelectEvent(event, response_tx) => {
                    debug!("Opening event {} in detail view", event.id);
                    self.view_model.select_event(event);
                    let _ = response_tx.send(()).await;
                }
                CalendarCommand::CloseDetail(response_tx) => {
                    self.view_model.close_detail();
                    let _ = response_tx.send(()).await;
                }
                CalendarCommand::SubmitDraft(draft, response_tx) => {
                    let result = self.submit_draft(draft).await;
                    let _ = response_tx.send(result).await;
                }
                CalendarCommand::Snapshot(response_tx) => {
                    let _ = response_tx.send(self.view_model.snapshot()).await;
                }
                CalendarCommand::Shutdown => {
                    info!("Calendar actor shutting down");
                    break;
                }
            }
        }

        info!("Calendar actor shut down");
    }

    /// Replace the event list with the backend's current state
    async fn load(&mut self) -> AppResult<usize> {
        if self.session.access_token().await?.is_none() {
            return Err(Error::NotAuthenticated);
        }
        let privileged = self.session.is_privileged().await?;

        // Event list and roster are independent, fetch them together
        let (events_client, users_client) = (&self.events, &self.users);
        let (events, teachers) = tokio::join!(events_client.list(), async {
            if privileged {
                Some(users_client.teachers().await)
            } else {
                None
            }
        });

        match teachers {
            Some(Ok(teachers)) => {
                debug!("Loaded {} teachers", teachers.len());
                self.view_model.set_teachers(teachers);
            }
            Some(Err(e)) => warn!("Failed to load teacher roster: {}", e),
            None => {}
        }

        let remote = events.map_err(load_error)?;
        self.view_model.replace_events(&remote).map_err(load_error)?;

        info!("Loaded {} calendar events", remote.len());
        Ok(remote.len())
    }

    /// Create the drafted event, then reload the authoritative list
    async fn submit_draft(&mut self, draft: DraftEvent) -> AppResult<()> {
        if self.session.access_token().await?.is_none() {
            return Err(Error::NotAuthenticated);
        }

        let request = draft.to_request();
        if let Err(e) = self.events.create(&request).await {
            warn!("Failed to create {}: {}", draft.kind(), e);
            // Keep the draft so it can be resubmitted
            self.view_model.update_draft(draft);
            return Err(save_error(e));
        }

        info!("Created {} starting {}", draft.kind(), draft.start);
        self.view_model.discard_draft();

        if let Err(e) = self.load().await {
            warn!("Event saved but reloading the calendar failed: {}", e);
        }
        Ok(())
    }
}
