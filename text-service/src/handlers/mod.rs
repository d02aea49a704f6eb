pub mod health;
pub mod texts;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use texts::{get_text, insert_text, list_texts, update_text};
