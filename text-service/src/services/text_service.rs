use crate::models::Text;
use crate::services::repository::{EntityStream, TextRepository};
use metrics::counter;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::Arc;

/// One operation per endpoint, each forwarding to the repository.
#[derive(Clone)]
pub struct TextService {
    repository: Arc<TextRepository>,
}

impl TextService {
    pub fn new(repository: Arc<TextRepository>) -> Self {
        Self { repository }
    }

    pub async fn insert(&self, text: Text) -> Result<Text, AppError> {
        let saved = self.repository.save(text).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to insert text");
            e
        })?;

        counter!("texts_inserted_total").increment(1);
        tracing::info!(
            text_id = %saved.id.map(|id| id.to_hex()).unwrap_or_default(),
            "Text inserted"
        );

        Ok(saved)
    }

    pub async fn get(&self, id: ObjectId) -> Result<Option<Text>, AppError> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_all(&self) -> Result<EntityStream<Text>, AppError> {
        self.repository.find_all().await
    }

    /// Read-then-write with no concurrency check: the last writer wins.
    /// A missing target yields `None` and nothing is created. A text with
    /// no id cannot be looked up and fails as an internal error.
    pub async fn update(&self, text: Text) -> Result<Option<Text>, AppError> {
        let id = text.id.ok_or_else(|| {
            tracing::error!("Update attempted without a text id");
            AppError::InternalError(anyhow::anyhow!("Text id is required"))
        })?;

        let Some(mut existing) = self.repository.find_by_id(id).await? else {
            counter!("texts_updated_total", "outcome" => "missing").increment(1);
            tracing::info!(text_id = %id, "Update skipped, text not found");
            return Ok(None);
        };

        existing.text = text.text;
        let saved = self.repository.save(existing).await.map_err(|e| {
            tracing::error!(text_id = %id, error = %e, "Failed to update text");
            e
        })?;

        counter!("texts_updated_total", "outcome" => "updated").increment(1);
        tracing::info!(text_id = %id, "Text updated");

        Ok(Some(saved))
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.health_check().await
    }
}
