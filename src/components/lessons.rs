use crate::api::lessons::{LessonsClient, ParsedLesson};
use crate::context::AppContext;
use crate::error::{AppResult, Error};
use crate::session::SessionContext;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// Result of the last action on the pasted text
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParseStatus {
    #[default]
    Unchecked,
    Valid(Vec<ParsedLesson>),
    Invalid(String),
    Added(Vec<ParsedLesson>),
}

#[derive(Debug, Default)]
struct ParserState {
    text: String,
    status: ParseStatus,
}

/// Lesson links page: check pasted schedule text, then add it to calendars
pub struct LessonLinks {
    lessons: LessonsClient,
    session: SessionContext,
    state: RwLock<ParserState>,
}

impl LessonLinks {
    pub fn new(lessons: LessonsClient, session: SessionContext) -> Self {
        Self {
            lessons,
            session,
            state: RwLock::new(ParserState::default()),
        }
    }

    pub async fn status(&self) -> ParseStatus {
        self.state.read().await.status.clone()
    }

    /// "Add to Calendars" is only enabled after a successful check
    pub async fn can_add(&self) -> bool {
        matches!(self.state.read().await.status, ParseStatus::Valid(_))
    }

    async fn require_privileged(&self) -> AppResult<()> {
        if self.session.access_token().await?.is_none() {
            return Err(Error::NotAuthenticated);
        }
        if !self.session.is_privileged().await? {
            return Err(Error::PermissionDenied(
                "lesson links are limited to supervisors".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate the pasted text
    pub async fn check(&self, text: &str) -> AppResult<Vec<ParsedLesson>> {
        self.require_privileged().await?;

        let result = self.lessons.check_parsing(text).await;

        let mut state = self.state.write().await;
        state.text = text.to_string();
        state.status = match &result {
            Ok(lessons) => ParseStatus::Valid(lessons.clone()),
            Err(Error::LessonParsing(message)) => ParseStatus::Invalid(message.clone()),
            Err(_) => ParseStatus::Unchecked,
        };

        if let Ok(lessons) = &result {
            info!("Checked lesson text: {} lessons recognized", lessons.len());
        }
        result
    }

    /// Create the lessons from the last successfully checked text
    pub async fn add_to_calendars(&self) -> AppResult<Vec<ParsedLesson>> {
        self.require_privileged().await?;

        let text = {
            let state = self.state.read().await;
            match &state.status {
                ParseStatus::Valid(_) => state.text.clone(),
                _ => {
                    return Err(Error::LessonParsing(
                        "check the text before adding it to calendars".to_string(),
                    ))
                }
            }
        };

        let result = self.lessons.parse_lessons(&text).await;

        let mut state = self.state.write().await;
        match &result {
            Ok(lessons) => {
                info!("Added {} lessons to calendars", lessons.len());
                state.status = ParseStatus::Added(lessons.clone());
            }
            Err(Error::LessonParsing(message)) => {
                state.status = ParseStatus::Invalid(message.clone());
            }
            Err(_) => {}
        }
        result
    }
}

#[async_trait]
impl super::Component for LessonLinks {
    fn name(&self) -> &'static str {
        "lessons"
    }

    fn route(&self) -> &'static str {
        "/lessons"
    }

    fn title(&self) -> String {
        t!("nav_lessons").to_string()
    }

    fn requires_privilege(&self) -> bool {
        true
    }

    async fn init(&self, _ctx: &AppContext) -> AppResult<()> {
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
