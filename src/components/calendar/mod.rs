mod actor;
mod handle;
pub mod models;
pub mod view_model;

pub use handle::CalendarHandle;
pub use models::{DisplayEvent, DraftDetails, DraftEvent, EventColor, EventKind, LessonDraft, MeetingDraft};
pub use view_model::{to_display_event, CalendarSnapshot, CalendarViewModel};

use crate::context::AppContext;
use crate::error::AppResult;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Calendar page (the dashboard)
#[derive(Default)]
pub struct Calendar {
    handle: RwLock<Option<CalendarHandle>>,
}

impl Calendar {
    /// Create a new calendar component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if the component was initialized
    pub async fn get_handle(&self) -> Option<CalendarHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Calendar {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn route(&self) -> &'static str {
        "/calendar"
    }

    fn title(&self) -> String {
        t!("nav_dashboard").to_string()
    }

    async fn init(&self, ctx: &AppContext) -> AppResult<()> {
        let timezone = ctx.config.read().await.tz()?;

        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(CalendarHandle::new(
                timezone,
                ctx.api.events.clone(),
                ctx.api.users.clone(),
                ctx.session().clone(),
            ));
        }
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
