pub mod database;
pub mod metrics;
pub mod repository;
pub mod text_service;

pub use database::MongoDb;
pub use self::metrics::{get_metrics, init_metrics};
pub use repository::{
    CrudRepository, EntityStream, InMemoryTextRepository, MongoTextRepository, TextRepository,
};
pub use text_service::TextService;
