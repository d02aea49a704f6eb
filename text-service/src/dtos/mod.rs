pub mod texts;

pub use texts::{TextResponse, UpdateTextRequest};
