//! The message store seam used by search.

use std::future::Future;

use crate::Result;
use crate::email::EmailRecord;
use crate::query::Query;

/// Anything that can evaluate a [`Query`] over stored messages.
///
/// Implementations must honour every [`Predicate`](crate::query::Predicate)
/// variant, including structural recipient containment, and return full
/// records in the requested order.
pub trait MessageStore {
    /// Run `query` and return every matching record.
    fn find(&self, query: &Query) -> impl Future<Output = Result<Vec<EmailRecord>>> + Send;
}

impl<S: MessageStore + Sync> MessageStore for &S {
    fn find(&self, query: &Query) -> impl Future<Output = Result<Vec<EmailRecord>>> + Send {
        (**self).find(query)
    }
}
