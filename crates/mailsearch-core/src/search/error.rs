//! Search failures.

use super::response::ErrorCode;

/// A required request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Sender address.
    From,
    /// Recipient address.
    To,
    /// Subject line.
    Subject,
}

impl Field {
    /// Name of the field in the request payload.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::From => "from",
            Self::To => "to",
            Self::Subject => "subject",
        }
    }

    /// Message shown when the field is missing.
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::From => "sender is required",
            Self::To => "recipient is required",
            Self::Subject => "subject is required",
        }
    }
}

/// Why a search request was rejected or failed.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Payload could not be decoded into a search request.
    #[error("malformed search request: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// A required field was empty or absent.
    #[error("missing field `{}`", .0.name())]
    MissingField(Field),

    /// Recipient is not `local@domain` or its domain is not accepted.
    #[error("recipient `{0}` is not an address on an accepted domain")]
    InvalidRecipientDomain(String),

    /// The message store failed to run the query.
    #[error("search failed: {0}")]
    Store(#[from] crate::Error),
}

impl SearchError {
    /// Caller-facing message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) | Self::InvalidRecipientDomain(_) => "params error",
            Self::MissingField(field) => field.required_message(),
            Self::Store(_) => "search failed",
        }
    }

    /// Diagnostic detail returned alongside the message.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::MalformedInput(e) => e.to_string(),
            Self::MissingField(field) => field.required_message().to_string(),
            Self::InvalidRecipientDomain(_) => String::new(),
            Self::Store(e) => e.to_string(),
        }
    }

    /// Response error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedInput(_) | Self::MissingField(_) | Self::InvalidRecipientDomain(_) => {
                ErrorCode::ParamsError
            }
            Self::Store(_) => ErrorCode::ServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_messages() {
        let err = SearchError::MissingField(Field::To);
        assert_eq!(err.message(), "recipient is required");
        assert_eq!(err.detail(), "recipient is required");
        assert_eq!(err.code(), ErrorCode::ParamsError);
        assert_eq!(err.to_string(), "missing field `to`");
    }

    #[test]
    fn test_invalid_domain_has_no_detail() {
        let err = SearchError::InvalidRecipientDomain("c@unknown.com".into());
        assert_eq!(err.message(), "params error");
        assert!(err.detail().is_empty());
        assert_eq!(err.code(), ErrorCode::ParamsError);
    }

    #[test]
    fn test_store_error_is_server_error() {
        let err = SearchError::from(crate::Error::Config("boom".into()));
        assert_eq!(err.code(), ErrorCode::ServerError);
        assert_eq!(err.message(), "search failed");
        assert_eq!(err.detail(), "Configuration error: boom");
    }
}
