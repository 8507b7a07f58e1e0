use crate::context::AppContext;
use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A document in the shared library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: u32,
    pub title: String,
    pub link: String,
}

/// Documents page, backed by the configured catalog
#[derive(Debug, Default)]
pub struct Documents {
    documents: Vec<Document>,
}

impl Documents {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    pub fn find(&self, id: u32) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}

#[async_trait]
impl super::Component for Documents {
    fn name(&self) -> &'static str {
        "documents"
    }

    fn route(&self) -> &'static str {
        "/documents"
    }

    fn title(&self) -> String {
        t!("nav_documents").to_string()
    }

    async fn init(&self, _ctx: &AppContext) -> AppResult<()> {
        tracing::debug!("{} documents in catalog", self.documents.len());
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
