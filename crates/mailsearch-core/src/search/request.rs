//! Search request decoding and validation.

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use super::error::{Field, SearchError};
use crate::config::AcceptedDomains;

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sender address, matched exactly against `from_address`.
    pub from: String,
    /// Recipient address on an accepted domain.
    pub to: String,
    /// Subject line. Required, but not used to filter.
    pub subject: String,
}

/// Wire shape. Only a JSON object decodes. Keys match case-insensitively,
/// a later duplicate overwrites an earlier one, `null` leaves the field as it
/// was and unknown keys are ignored. Absent fields stay empty and are
/// reported as missing rather than as decode failures.
#[derive(Debug, Default)]
struct RawSearchRequest {
    from: String,
    to: String,
    subject: String,
}

impl<'de> Deserialize<'de> for RawSearchRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawSearchRequestVisitor)
    }
}

struct RawSearchRequestVisitor;

impl<'de> Visitor<'de> for RawSearchRequestVisitor {
    type Value = RawSearchRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a search request object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut raw = RawSearchRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            let slot = match key.to_lowercase().as_str() {
                "from" => &mut raw.from,
                "to" => &mut raw.to,
                "subject" => &mut raw.subject,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if let Some(value) = map.next_value::<Option<String>>()? {
                *slot = value;
            }
        }
        Ok(raw)
    }
}

/// Decode and validate a raw search payload.
///
/// Checks run in a fixed order and the first failure is returned: sender
/// present, recipient present, recipient domain accepted, subject present.
///
/// # Errors
///
/// Returns [`SearchError::MalformedInput`], [`SearchError::MissingField`] or
/// [`SearchError::InvalidRecipientDomain`].
pub fn validate_request(
    raw: &[u8],
    domains: &AcceptedDomains,
) -> Result<SearchRequest, SearchError> {
    let RawSearchRequest { from, to, subject } = serde_json::from_slice(raw)?;

    if from.is_empty() {
        return Err(SearchError::MissingField(Field::From));
    }
    if to.is_empty() {
        return Err(SearchError::MissingField(Field::To));
    }
    if !is_accepted_recipient(&to, domains) {
        return Err(SearchError::InvalidRecipientDomain(to));
    }
    if subject.is_empty() {
        return Err(SearchError::MissingField(Field::Subject));
    }

    Ok(SearchRequest { from, to, subject })
}

/// `address` is `local@domain` with both parts non-empty and `domain` accepted.
fn is_accepted_recipient(address: &str, domains: &AcceptedDomains) -> bool {
    let parts: Vec<&str> = address.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty() && !domain.is_empty() && domains.contains(domain)
}
