//! Service error taxonomy shared across crates.

use thiserror::Error;

/// Per-request service error.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::InvalidRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Dao`] → 500
/// - [`ServiceError::Render`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body could not be bound or failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested resource does not exist (the distinguished "no rows" condition).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A data-access operation failed for a reason other than "no rows".
    #[error("DAO error: {0}")]
    Dao(String),

    /// The response payload could not be rendered.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::InvalidRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Dao(_) => 500,
            ServiceError::Render(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::InvalidRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::Dao("x".into()).http_status(), 500);
        assert_eq!(ServiceError::Render("x".into()).http_status(), 500);
    }

    #[test]
    fn display_includes_operation() {
        let e = ServiceError::NotFound("list hellos".into());
        assert_eq!(e.to_string(), "Not found: list hellos");
    }
}
