//! Pure checks applied to a create payload before it reaches the repository.

use crate::domain::book::CreateBookRequest;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title and author are required")]
    MissingRequiredField,

    #[error("price must be zero or greater")]
    NegativePrice,
}

/// Returns the first violated rule. Only exact emptiness counts as missing; whitespace is kept.
pub fn validate_create_book(req: &CreateBookRequest) -> Result<(), ValidationError> {
    if req.title.is_empty() || req.author.is_empty() {
        return Err(ValidationError::MissingRequiredField);
    }
    if req.price < 0 {
        return Err(ValidationError::NegativePrice);
    }
    Ok(())
}
