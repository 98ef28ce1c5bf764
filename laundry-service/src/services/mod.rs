pub mod database;
pub mod jwt;
pub mod memory;
pub mod metrics;
pub mod repository;

pub use database::{is_duplicate_key, DocumentStore, MongoDb, DEFAULT_STORE_TIMEOUT};
pub use jwt::{Claims, JwtService};
pub use memory::InMemoryStore;
pub use repository::Repository;
