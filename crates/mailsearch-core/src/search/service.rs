//! Search execution.

use tracing::{debug, error, warn};

use super::error::SearchError;
use super::request::{SearchRequest, validate_request};
use super::response::{ApiResponse, SearchResults};
use crate::config::AcceptedDomains;
use crate::email::EmailRecord;
use crate::query::{Column, Direction, Predicate, Query};
use crate::store::MessageStore;

/// Filter for messages from `from` to `to`.
///
/// An empty argument contributes no clause, so `build_filter("", "")` matches
/// every record.
#[must_use]
pub fn build_filter(from: &str, to: &str) -> Predicate {
    let mut filter = Predicate::always();

    if !from.is_empty() {
        filter = filter.and(Predicate::eq(Column::FromAddress, from));
    }

    if !to.is_empty() {
        filter = filter.and(Predicate::recipient_contains_to(to));
    }

    filter
}

/// Query for messages from `from` to `to`, newest first, unbounded.
#[must_use]
pub fn build_query(from: &str, to: &str) -> Query {
    Query::new(build_filter(from, to)).order_by(Column::Id, Direction::Desc)
}

/// Validates search requests and runs them against a message store.
pub struct SearchService<S> {
    store: S,
    domains: AcceptedDomains,
}

impl<S: MessageStore> SearchService<S> {
    /// Create a service over `store` accepting recipients on `domains`.
    pub const fn new(store: S, domains: AcceptedDomains) -> Self {
        Self { store, domains }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Decode and validate a raw request payload.
    ///
    /// # Errors
    ///
    /// Returns a validation error; see [`validate_request`].
    pub fn validate(&self, raw: &[u8]) -> Result<SearchRequest, SearchError> {
        validate_request(raw, &self.domains)
    }

    /// Find messages sent by `from` with `to` among the recipients.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Store`] if the query fails.
    pub async fn search(&self, from: &str, to: &str) -> Result<Vec<EmailRecord>, SearchError> {
        let query = build_query(from, to);
        let emails = self.store.find(&query).await.map_err(|e| {
            error!("Email search failed: {e}");
            SearchError::Store(e)
        })?;

        debug!(from, to, count = emails.len(), "Email search complete");
        Ok(emails)
    }

    /// Validate `raw`, run the search and return the response envelope.
    ///
    /// Invalid requests are answered without touching the store.
    pub async fn handle(&self, raw: &[u8]) -> ApiResponse<SearchResults> {
        let request = match self.validate(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected search request: {e}");
                return ApiResponse::from(&e);
            }
        };

        match self.search(&request.from, &request.to).await {
            Ok(emails) => ApiResponse::success(SearchResults { emails }),
            Err(e) => ApiResponse::from(&e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::search::{ErrorCode, Field, ResponseData};
    use crate::{Error, Result};

    /// Store that records queries and returns nothing (or fails).
    #[derive(Default)]
    struct RecordingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MessageStore for RecordingStore {
        async fn find(&self, _query: &Query) -> Result<Vec<EmailRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Database(sqlx::Error::PoolTimedOut))
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn service(store: RecordingStore) -> SearchService<RecordingStore> {
        SearchService::new(store, AcceptedDomains::new(["accepted.com"]))
    }

    #[test]
    fn test_build_filter_both_fields() {
        assert_eq!(
            build_filter("alice@x.com", "user@accepted.com"),
            Predicate::And(vec![
                Predicate::eq(Column::FromAddress, "alice@x.com"),
                Predicate::recipient_contains_to("user@accepted.com"),
            ])
        );
    }

    #[test]
    fn test_build_filter_omits_empty_fields() {
        assert_eq!(
            build_filter("", "user@accepted.com"),
            Predicate::And(vec![Predicate::recipient_contains_to("user@accepted.com")])
        );
        assert_eq!(
            build_filter("alice@x.com", ""),
            Predicate::And(vec![Predicate::eq(Column::FromAddress, "alice@x.com")])
        );
        assert!(build_filter("", "").is_always());
    }

    #[test]
    fn test_build_query_newest_first() {
        assert_eq!(build_query("a", "b").order, (Column::Id, Direction::Desc));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_store() {
        let service = service(RecordingStore::default());

        let response = service
            .handle(br#"{"from":"a@b.com","to":"c@unknown.com","subject":"hi"}"#)
            .await;
        assert_eq!(response.error_no, ErrorCode::ParamsError);
        assert_eq!(response.error_msg, "params error");

        let response = service.handle(br#"{"to":"c@accepted.com"}"#).await;
        assert_eq!(
            response.error_msg,
            SearchError::MissingField(Field::From).message()
        );

        assert_eq!(service.store().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_request_queries_store_once() {
        let service = service(RecordingStore::default());

        let response = service
            .handle(br#"{"from":"a@b.com","to":"c@accepted.com","subject":"hi"}"#)
            .await;
        assert!(response.is_success());
        assert_eq!(
            response.data,
            ResponseData::Value(SearchResults { emails: Vec::new() })
        );
        assert_eq!(service.store().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let service = service(RecordingStore {
            fail: true,
            ..RecordingStore::default()
        });

        let err = service.search("a@b.com", "c@accepted.com").await.unwrap_err();
        assert!(matches!(err, SearchError::Store(_)));

        let response = service
            .handle(br#"{"from":"a@b.com","to":"c@accepted.com","subject":"hi"}"#)
            .await;
        assert_eq!(response.error_no, ErrorCode::ServerError);
        assert_eq!(response.error_msg, "search failed");
        assert!(matches!(response.data, ResponseData::Detail(ref d) if d.contains("timed out")));
        assert_eq!(service.store().calls.load(Ordering::SeqCst), 2);
    }
}
