//! Message search by sender and recipient.
//!
//! A request is validated first (required fields, recipient on an accepted
//! domain) and only then turned into a [`Query`](crate::query::Query):
//! sender equality AND recipient containment, newest first.

mod error;
mod request;
mod response;
mod service;

pub use error::{Field, SearchError};
pub use request::{SearchRequest, validate_request};
pub use response::{ApiResponse, ErrorCode, ResponseData, SearchResults};
pub use service::{SearchService, build_filter, build_query};
