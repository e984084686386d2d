//! Stored email data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integer code in a stored column that does not map to a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    /// Which enum the code was decoded for.
    pub kind: &'static str,
    /// The offending value.
    pub code: i8,
}

/// Direction/state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum MessageKind {
    /// Delivered to a local mailbox.
    #[default]
    Received,
    /// Sent by a local user.
    Sent,
    /// Not yet sent.
    Draft,
}

impl From<MessageKind> for i8 {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Received => 0,
            MessageKind::Sent => 1,
            MessageKind::Draft => 2,
        }
    }
}

impl TryFrom<i8> for MessageKind {
    type Error = UnknownCode;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Received),
            1 => Ok(Self::Sent),
            2 => Ok(Self::Draft),
            _ => Err(UnknownCode {
                kind: "message kind",
                code,
            }),
        }
    }
}

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum DeliveryStatus {
    /// Waiting to be sent (or received, for inbound mail).
    #[default]
    Pending,
    /// Delivered successfully.
    Sent,
    /// Delivery failed; see the record's `error`.
    Failed,
    /// Moved to trash.
    Deleted,
    /// Saved as a draft.
    Draft,
}

impl From<DeliveryStatus> for i8 {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Pending => 0,
            DeliveryStatus::Sent => 1,
            DeliveryStatus::Failed => 2,
            DeliveryStatus::Deleted => 3,
            DeliveryStatus::Draft => 5,
        }
    }
}

impl TryFrom<i8> for DeliveryStatus {
    type Error = UnknownCode;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Sent),
            2 => Ok(Self::Failed),
            3 => Ok(Self::Deleted),
            5 => Ok(Self::Draft),
            _ => Err(UnknownCode {
                kind: "delivery status",
                code,
            }),
        }
    }
}

/// One entry of a recipient collection (`to`, `cc`, `bcc`).
///
/// Stored as a JSON object; the `EmailAddress` key is what recipient
/// searches match against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Mailbox address.
    #[serde(rename = "EmailAddress")]
    pub email_address: String,
    /// Display name, if any.
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    /// Recipient without a display name.
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            name: None,
        }
    }

    /// Recipient with a display name.
    pub fn with_name(email_address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            name: Some(name.into()),
        }
    }
}

/// A stored message as returned by searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Store-assigned identifier, increasing in creation order.
    pub id: i64,
    /// Received, sent or draft.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Subject line.
    pub subject: String,
    /// Reply-To address.
    pub reply_to: String,
    /// Sender display name.
    pub from_name: String,
    /// Sender address.
    pub from_address: String,
    /// Primary recipients.
    pub to: Vec<Recipient>,
    /// Blind-copy recipients.
    pub bcc: Vec<Recipient>,
    /// Copy recipients.
    pub cc: Vec<Recipient>,
    /// Plain-text body.
    pub text: Option<String>,
    /// HTML body.
    pub html: Option<String>,
    /// Sender header.
    pub sender: String,
    /// Serialized attachment metadata.
    pub attachments: String,
    /// SPF verification passed.
    pub spf_check: bool,
    /// DKIM verification passed.
    pub dkim_check: bool,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// Scheduled send time.
    pub cron_send_time: DateTime<Utc>,
    /// Last modification time.
    pub update_time: DateTime<Utc>,
    /// Owning user.
    pub send_user_id: i64,
    /// Message size in bytes.
    pub size: i64,
    /// Last delivery error.
    pub error: Option<String>,
    /// Actual send time.
    pub send_date: DateTime<Utc>,
    /// Creation time.
    pub create_time: DateTime<Utc>,
}

/// A message that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmail {
    /// Received, sent or draft.
    pub kind: MessageKind,
    /// Subject line.
    pub subject: String,
    /// Reply-To address.
    pub reply_to: String,
    /// Sender display name.
    pub from_name: String,
    /// Sender address.
    pub from_address: String,
    /// Primary recipients.
    pub to: Vec<Recipient>,
    /// Blind-copy recipients.
    pub bcc: Vec<Recipient>,
    /// Copy recipients.
    pub cc: Vec<Recipient>,
    /// Plain-text body.
    pub text: Option<String>,
    /// HTML body.
    pub html: Option<String>,
    /// Sender header.
    pub sender: String,
    /// Serialized attachment metadata.
    pub attachments: String,
    /// SPF verification passed.
    pub spf_check: bool,
    /// DKIM verification passed.
    pub dkim_check: bool,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// Scheduled send time.
    pub cron_send_time: DateTime<Utc>,
    /// Last modification time.
    pub update_time: DateTime<Utc>,
    /// Owning user.
    pub send_user_id: i64,
    /// Message size in bytes.
    pub size: i64,
    /// Last delivery error.
    pub error: Option<String>,
    /// Actual send time.
    pub send_date: DateTime<Utc>,
    /// Creation time.
    pub create_time: DateTime<Utc>,
}

impl NewEmail {
    /// An inbound message from `from_address` to the given recipients.
    ///
    /// All timestamps are set to now; optional fields are absent.
    #[must_use]
    pub fn received(from_address: &str, to: Vec<Recipient>) -> Self {
        let now = Utc::now();
        Self {
            kind: MessageKind::Received,
            subject: String::new(),
            reply_to: String::new(),
            from_name: String::new(),
            from_address: from_address.to_string(),
            to,
            bcc: Vec::new(),
            cc: Vec::new(),
            text: None,
            html: None,
            sender: String::new(),
            attachments: "[]".to_string(),
            spf_check: false,
            dkim_check: false,
            status: DeliveryStatus::Pending,
            cron_send_time: now,
            update_time: now,
            send_user_id: 0,
            size: 0,
            error: None,
            send_date: now,
            create_time: now,
        }
    }

    /// Set the subject line.
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }
}
