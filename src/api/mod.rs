//! REST API module.
//!
//! Handlers for the groups, members and tasks contract. Bodies are bare
//! JSON entities; failures use the [`crate::errors::ErrorResponse`] envelope.

mod groups;
mod members;
mod tasks;

pub use groups::*;
pub use members::*;
pub use tasks::*;

use axum::Json;
use serde::Serialize;

use crate::errors::AppError;

/// Response type for every handler.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

pub fn message(text: impl Into<String>) -> ApiResult<MessageResponse> {
    success(MessageResponse {
        message: text.into(),
    })
}

/// Reject a required text field that is empty after trimming.
pub fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Reject an address that is not `local@domain` with a dotted domain.
pub fn require_email(value: &str) -> Result<(), AppError> {
    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
                && !value.trim().contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!(
            "{:?} is not a valid email address",
            value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_email() {
        assert!(require_email("ada@example.com").is_ok());
        assert!(require_email("a.b+c@mail.example.org").is_ok());

        for bad in [
            "",
            "ada",
            "@example.com",
            "ada@",
            "ada@localhost",
            "a@b@c.com",
            "ada@x..com",
            "a da@x.com",
        ] {
            assert!(
                matches!(require_email(bad), Err(AppError::Validation(_))),
                "accepted {:?}",
                bad
            );
        }
    }
}
