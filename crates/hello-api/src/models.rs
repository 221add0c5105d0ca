//! Domain entities persisted by the data-access layer.

use sqlx::FromRow;

/// A greeting from one person to another.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Hello {
    /// Storage-assigned identifier; `0` before the record is persisted and
    /// immutable once assigned.
    pub id: i64,
    /// Address of the greeting author.
    pub sender: String,
    /// Address the greeting is for.
    pub recipient: String,
    /// Free-form greeting text.
    pub message: String,
}

impl Hello {
    /// A not-yet-persisted hello; the identifier is assigned by `record`.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            sender: sender.into(),
            recipient: recipient.into(),
            message: message.into(),
        }
    }
}
