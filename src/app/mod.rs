pub mod repository;

pub use repository::{BookRepository, RepositoryError, SqliteBookRepository};
