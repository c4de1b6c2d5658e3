// Storage backends shared by the domain repositories
pub use memory::{InMemoryStore, Tables};
pub use postgres::PostgresStore;
pub(crate) use postgres::{is_unique_violation, storage_error};

mod memory;
mod postgres;
pub mod seed;
