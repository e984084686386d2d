//! Response envelope returned to callers.

use serde::{Serialize, Serializer};

use super::error::SearchError;
use crate::email::EmailRecord;

/// Envelope status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request succeeded.
    Success,
    /// Request was rejected.
    ParamsError,
    /// Request failed server-side.
    ServerError,
}

impl ErrorCode {
    /// Numeric wire value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ParamsError => 100,
            Self::ServerError => 500,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

/// Payload of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Matching records, newest first.
    pub emails: Vec<EmailRecord>,
}

/// Data carried by the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseData<T> {
    /// Success payload.
    Value(T),
    /// Diagnostic detail of a failure.
    Detail(String),
}

/// `{"errorNo", "errorMsg", "data"}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Status code.
    pub error_no: ErrorCode,
    /// Caller-facing message; empty on success.
    pub error_msg: String,
    /// Payload or diagnostic detail.
    pub data: ResponseData<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub const fn success(data: T) -> Self {
        Self {
            error_no: ErrorCode::Success,
            error_msg: String::new(),
            data: ResponseData::Value(data),
        }
    }

    /// Failure response.
    pub fn error(code: ErrorCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error_no: code,
            error_msg: message.into(),
            data: ResponseData::Detail(detail.into()),
        }
    }

    /// Whether this is a success response.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.error_no, ErrorCode::Success)
    }
}

impl<T> From<&SearchError> for ApiResponse<T> {
    fn from(err: &SearchError) -> Self {
        Self::error(err.code(), err.message(), err.detail())
    }
}
