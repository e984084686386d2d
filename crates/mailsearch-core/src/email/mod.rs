//! Stored email messages.
//!
//! Records live in a single `email` table; recipient collections are JSON
//! arrays of address objects.

mod model;
mod repository;

pub use model::{DeliveryStatus, EmailRecord, MessageKind, NewEmail, Recipient, UnknownCode};
pub use repository::EmailRepository;
