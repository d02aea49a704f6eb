use crate::models::Text;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// External representation: the identifier is always its hex string.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextResponse {
    pub id: String,
    pub text: String,
}

impl From<Text> for TextResponse {
    fn from(text: Text) -> Self {
        Self {
            id: text.id.map(|id| id.to_hex()).unwrap_or_default(),
            text: text.text,
        }
    }
}

/// Body of `PUT /texts/:id`. The body `id` is authoritative.
#[derive(Debug, Deserialize)]
pub struct UpdateTextRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

impl TryFrom<UpdateTextRequest> for Text {
    type Error = AppError;

    fn try_from(request: UpdateTextRequest) -> Result<Self, Self::Error> {
        Ok(Text {
            id: request.id.map(ObjectId::parse_str).transpose()?,
            text: request.text,
        })
    }
}
