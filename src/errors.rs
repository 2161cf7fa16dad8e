use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Message sent to clients in place of the details of an unclassified failure
pub const GENERIC_INTERNAL_MESSAGE: &str = "There is an error on our system";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// A broken invariant detected by the application itself
    #[error("{0}")]
    Internal(String),

    #[error("Connection reset by peer")]
    ConnectionReset,

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed HTTP message: {0}")]
    Http(#[from] httparse::Error),

    #[error("Invalid route table: {0}")]
    Route(#[from] matchit::InsertError),
}

impl Error {
    /// HTTP status code the error is surfaced with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Machine readable code put in error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "BAD_REQUEST",
            Error::NotFound(_) => "NOT_FOUND",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Whether the message can be shown to a client as is.
    ///
    /// Only errors raised deliberately by the application qualify, anything bubbling up from a
    /// dependency is replaced by a generic message.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Error::BadRequest(_) | Error::NotFound(_) | Error::Internal(_)
        )
    }

    /// Message suitable for the body of an error response
    pub fn public_message(&self) -> String {
        if self.is_classified() {
            self.to_string()
        } else {
            GENERIC_INTERNAL_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::BadRequest("id is invalid".into()).status_code(), 400);
        assert_eq!(Error::NotFound("menu item not found".into()).status_code(), 404);
        assert_eq!(Error::Internal("broken".into()).status_code(), 500);
        assert_eq!(Error::ConnectionReset.status_code(), 500);
    }

    #[test]
    fn test_unclassified_errors_hide_their_cause() {
        let err = Error::from(rusqlite::Error::InvalidQuery);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.public_message(), GENERIC_INTERNAL_MESSAGE);

        let err = Error::Internal("something is wrong when add order to db".into());
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.public_message(), "something is wrong when add order to db");
    }
}
