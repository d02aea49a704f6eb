//! Text CRUD handlers.
//!
//! Lookups that find nothing still answer 200, with an empty body.

use crate::dtos::{TextResponse, UpdateTextRequest};
use crate::models::Text;
use crate::services::EntityStream;
use crate::startup::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::{self, StreamExt};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// When `text` is repeated the first value is used.
pub async fn insert_text(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<TextResponse>, AppError> {
    let text = params
        .into_iter()
        .find_map(|(key, value)| (key == "text").then_some(value))
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Missing query parameter: text")))?;

    let saved = state.texts.insert(Text::new(text)).await?;

    Ok(Json(TextResponse::from(saved)))
}

/// A malformed `id` is not validated up front; the parse error becomes a 500.
pub async fn get_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = ObjectId::parse_str(&id)?;
    let text = state.texts.get(id).await?;

    Ok(ok_or_empty(text))
}

pub async fn list_texts(State(state): State<AppState>) -> Result<Response, AppError> {
    let texts = state.texts.get_all().await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(json_array(texts)),
    )
        .into_response())
}

/// The path `id` is matched by the route but the body `id` is the one used.
pub async fn update_text(
    State(state): State<AppState>,
    Path(_path_id): Path<String>,
    Json(payload): Json<UpdateTextRequest>,
) -> Result<Response, AppError> {
    let text = Text::try_from(payload)?;
    let updated = state.texts.update(text).await?;

    Ok(ok_or_empty(updated))
}

fn ok_or_empty(text: Option<Text>) -> Response {
    match text {
        Some(text) => Json(TextResponse::from(text)).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// Encode the stream as a JSON array one element per chunk, so documents
/// go out as the cursor yields them.
fn json_array(
    texts: EntityStream<Text>,
) -> impl futures::Stream<Item = Result<Vec<u8>, AppError>> + Send + 'static {
    let elements = texts.enumerate().map(|(index, item)| -> Result<Vec<u8>, AppError> {
        let text = item?;
        let mut chunk = if index == 0 { Vec::new() } else { vec![b','] };
        serde_json::to_writer(&mut chunk, &TextResponse::from(text))
            .map_err(|e| AppError::InternalError(e.into()))?;
        Ok(chunk)
    });

    stream::once(async { Ok::<_, AppError>(vec![b'[']) })
        .chain(elements)
        .chain(stream::once(async { Ok(vec![b']']) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn encode(texts: Vec<Text>) -> serde_json::Value {
        let stream: EntityStream<Text> = stream::iter(texts.into_iter().map(Ok)).boxed();
        let chunks: Vec<Vec<u8>> = json_array(stream).try_collect().await.unwrap();
        serde_json::from_slice(&chunks.concat()).unwrap()
    }

    #[tokio::test]
    async fn empty_stream_encodes_as_empty_array() {
        assert_eq!(encode(vec![]).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn elements_are_comma_separated() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let texts = vec![
            Text {
                id: Some(a),
                text: "a".to_string(),
            },
            Text {
                id: Some(b),
                text: "b".to_string(),
            },
        ];

        assert_eq!(
            encode(texts).await,
            serde_json::json!([
                { "id": a.to_hex(), "text": "a" },
                { "id": b.to_hex(), "text": "b" }
            ])
        );
    }

    #[tokio::test]
    async fn stream_error_aborts_encoding() {
        let stream: EntityStream<Text> = stream::iter(vec![
            Ok(Text::new("ok")),
            Err(AppError::DatabaseError(anyhow::anyhow!("cursor died"))),
        ])
        .boxed();

        let result: Result<Vec<Vec<u8>>, AppError> = json_array(stream).try_collect().await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }
}
