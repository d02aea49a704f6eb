use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A stored text document. `id` is `None` until the datastore assigns one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Text {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub text: String,
}

impl Text {
    /// A not-yet-persisted document built from user input.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }
}
