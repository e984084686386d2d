//! # mailsearch-core
//!
//! Core search logic for `mailsearch`.
//!
//! This crate provides:
//! - Stored email records and their `SQLite` repository
//! - A store-agnostic predicate tree with `SQLite` rendering
//! - **Recipient containment** - structural matching on JSON recipient lists
//! - Search request validation against accepted domains
//! - Search execution and the response envelope
//! - Process configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod email;
mod error;
pub mod query;
pub mod search;
mod store;

pub use config::{AcceptedDomains, Config};
pub use email::{EmailRecord, EmailRepository, NewEmail, Recipient};
pub use error::{Error, Result};
pub use query::{Predicate, Query};
pub use search::{ApiResponse, SearchError, SearchRequest, SearchResults, SearchService};
pub use store::MessageStore;
