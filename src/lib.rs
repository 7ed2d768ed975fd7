pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{BookRepository, RepositoryError, SqliteBookRepository};
pub use domain::{Book, CreateBookRequest};
pub use infra::config::Settings;
pub use infra::shutdown::{DrainOutcome, ShutdownController};
pub use storage::SqliteStore;
