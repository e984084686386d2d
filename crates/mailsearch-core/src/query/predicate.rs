//! Store-agnostic filter expressions.

/// A column of the `email` table.
///
/// Identifiers always come from this enum, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// `id`
    Id,
    /// `type`
    Kind,
    /// `subject`
    Subject,
    /// `reply_to`
    ReplyTo,
    /// `from_name`
    FromName,
    /// `from_address`
    FromAddress,
    /// `to`
    To,
    /// `bcc`
    Bcc,
    /// `cc`
    Cc,
    /// `text`
    Text,
    /// `html`
    Html,
    /// `sender`
    Sender,
    /// `attachments`
    Attachments,
    /// `spf_check`
    SpfCheck,
    /// `dkim_check`
    DkimCheck,
    /// `status`
    Status,
    /// `cron_send_time`
    CronSendTime,
    /// `update_time`
    UpdateTime,
    /// `send_user_id`
    SendUserId,
    /// `size`
    Size,
    /// `error`
    Error,
    /// `send_date`
    SendDate,
    /// `create_time`
    CreateTime,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Self; 23] = [
        Self::Id,
        Self::Kind,
        Self::Subject,
        Self::ReplyTo,
        Self::FromName,
        Self::FromAddress,
        Self::To,
        Self::Bcc,
        Self::Cc,
        Self::Text,
        Self::Html,
        Self::Sender,
        Self::Attachments,
        Self::SpfCheck,
        Self::DkimCheck,
        Self::Status,
        Self::CronSendTime,
        Self::UpdateTime,
        Self::SendUserId,
        Self::Size,
        Self::Error,
        Self::SendDate,
        Self::CreateTime,
    ];

    /// Column name as stored.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Kind => "type",
            Self::Subject => "subject",
            Self::ReplyTo => "reply_to",
            Self::FromName => "from_name",
            Self::FromAddress => "from_address",
            Self::To => "to",
            Self::Bcc => "bcc",
            Self::Cc => "cc",
            Self::Text => "text",
            Self::Html => "html",
            Self::Sender => "sender",
            Self::Attachments => "attachments",
            Self::SpfCheck => "spf_check",
            Self::DkimCheck => "dkim_check",
            Self::Status => "status",
            Self::CronSendTime => "cron_send_time",
            Self::UpdateTime => "update_time",
            Self::SendUserId => "send_user_id",
            Self::Size => "size",
            Self::Error => "error",
            Self::SendDate => "send_date",
            Self::CreateTime => "create_time",
        }
    }
}

/// A recipient collection column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientField {
    /// Primary recipients.
    To,
    /// Copy recipients.
    Cc,
    /// Blind-copy recipients.
    Bcc,
}

impl RecipientField {
    /// The column holding this collection.
    #[must_use]
    pub const fn column(self) -> Column {
        match self {
            Self::To => Column::To,
            Self::Cc => Column::Cc,
            Self::Bcc => Column::Bcc,
        }
    }
}

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Boolean filter evaluated by the store against each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Column equals value.
    Eq(Column, Value),
    /// Recipient collection holds an entry whose `EmailAddress` equals the
    /// address. This is a structural test on the stored JSON, not a
    /// substring match.
    RecipientContains(RecipientField, String),
    /// All of the inner predicates hold. Empty means always true.
    And(Vec<Predicate>),
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl Predicate {
    /// The predicate every record satisfies.
    #[must_use]
    pub const fn always() -> Self {
        Self::And(Vec::new())
    }

    /// `column = value`.
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::Eq(column, value.into())
    }

    /// Recipient collection `field` contains `address`.
    pub fn recipient_contains(field: RecipientField, address: impl Into<String>) -> Self {
        Self::RecipientContains(field, address.into())
    }

    /// `to` contains `address`.
    pub fn recipient_contains_to(address: impl Into<String>) -> Self {
        Self::recipient_contains(RecipientField::To, address)
    }

    /// Conjunction of `self` and `other`.
    ///
    /// Nested conjunctions are flattened and always-true operands dropped,
    /// so `always().and(p)` is `And([p])`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut terms = self.into_terms();
        terms.extend(other.into_terms());
        Self::And(terms)
    }

    /// Whether this predicate is trivially true.
    #[must_use]
    pub fn is_always(&self) -> bool {
        match self {
            Self::And(terms) => terms.iter().all(Self::is_always),
            _ => false,
        }
    }

    fn into_terms(self) -> Vec<Self> {
        match self {
            Self::And(terms) => terms.into_iter().flat_map(Self::into_terms).collect(),
            other => vec![other],
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl Direction {
    /// SQL keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A filtered, ordered selection of full email records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Rows must satisfy this.
    pub filter: Predicate,
    /// Sort key and direction.
    pub order: (Column, Direction),
}

impl Query {
    /// Query with the given filter, newest first.
    #[must_use]
    pub const fn new(filter: Predicate) -> Self {
        Self {
            filter,
            order: (Column::Id, Direction::Desc),
        }
    }

    /// Replace the sort order.
    #[must_use]
    pub fn order_by(mut self, column: Column, direction: Direction) -> Self {
        self.order = (column, direction);
        self
    }
}
