//! Domain types for the book resource.

pub mod book;
pub mod validation;

pub use book::{Book, CreateBookRequest};
pub use validation::{validate_create_book, ValidationError};
