//! Message storage repository.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::types::Json;
use sqlx::{FromRow, Row};

use super::model::{DeliveryStatus, EmailRecord, MessageKind, NewEmail, Recipient};
use crate::Result;
use crate::query::{Query, sql};
use crate::store::MessageStore;

/// Repository for stored messages.
pub struct EmailRepository {
    pool: SqlitePool,
}

impl EmailRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        // Recipient columns hold JSON arrays of {"EmailAddress": .., "Name": ..}
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "email" (
                "id" INTEGER PRIMARY KEY AUTOINCREMENT,
                "type" INTEGER NOT NULL DEFAULT 0,
                "subject" TEXT NOT NULL DEFAULT '',
                "reply_to" TEXT NOT NULL DEFAULT '',
                "from_name" TEXT NOT NULL DEFAULT '',
                "from_address" TEXT NOT NULL DEFAULT '',
                "to" TEXT NOT NULL DEFAULT '[]',
                "bcc" TEXT NOT NULL DEFAULT '[]',
                "cc" TEXT NOT NULL DEFAULT '[]',
                "text" TEXT,
                "html" TEXT,
                "sender" TEXT NOT NULL DEFAULT '',
                "attachments" TEXT NOT NULL DEFAULT '[]',
                "spf_check" INTEGER NOT NULL DEFAULT 0,
                "dkim_check" INTEGER NOT NULL DEFAULT 0,
                "status" INTEGER NOT NULL DEFAULT 0,
                "cron_send_time" TEXT NOT NULL,
                "update_time" TEXT NOT NULL,
                "send_user_id" INTEGER NOT NULL DEFAULT 0,
                "size" INTEGER NOT NULL DEFAULT 0,
                "error" TEXT,
                "send_date" TEXT NOT NULL,
                "create_time" TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_email_from_address ON "email"("from_address")
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a message and return its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert(&self, email: &NewEmail) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO "email"
                ("type", "subject", "reply_to", "from_name", "from_address", "to", "bcc", "cc",
                 "text", "html", "sender", "attachments", "spf_check", "dkim_check", "status",
                 "cron_send_time", "update_time", "send_user_id", "size", "error", "send_date",
                 "create_time")
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(i8::from(email.kind))
        .bind(&email.subject)
        .bind(&email.reply_to)
        .bind(&email.from_name)
        .bind(&email.from_address)
        .bind(Json(&email.to))
        .bind(Json(&email.bcc))
        .bind(Json(&email.cc))
        .bind(&email.text)
        .bind(&email.html)
        .bind(&email.sender)
        .bind(&email.attachments)
        .bind(email.spf_check)
        .bind(email.dkim_check)
        .bind(i8::from(email.status))
        .bind(email.cron_send_time)
        .bind(email.update_time)
        .bind(email.send_user_id)
        .bind(email.size)
        .bind(&email.error)
        .bind(email.send_date)
        .bind(email.create_time)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, "Stored email from {}", email.from_address);
        Ok(id)
    }
}

impl MessageStore for EmailRepository {
    async fn find(&self, query: &Query) -> Result<Vec<EmailRecord>> {
        let mut builder = sql::select(query);
        tracing::debug!(sql = builder.sql(), "Running email query");

        let records = builder
            .build_query_as::<EmailRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}

fn decode_code<T>(row: &SqliteRow, column: &str) -> sqlx::Result<T>
where
    T: TryFrom<i8>,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    let code: i8 = row.try_get(column)?;
    T::try_from(code).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn decode_recipients(row: &SqliteRow, column: &str) -> sqlx::Result<Vec<Recipient>> {
    let Json(recipients) = row.try_get::<Json<Vec<Recipient>>, _>(column)?;
    Ok(recipients)
}

impl FromRow<'_, SqliteRow> for EmailRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            kind: decode_code::<MessageKind>(row, "type")?,
            subject: row.try_get("subject")?,
            reply_to: row.try_get("reply_to")?,
            from_name: row.try_get("from_name")?,
            from_address: row.try_get("from_address")?,
            to: decode_recipients(row, "to")?,
            bcc: decode_recipients(row, "bcc")?,
            cc: decode_recipients(row, "cc")?,
            text: row.try_get("text")?,
            html: row.try_get("html")?,
            sender: row.try_get("sender")?,
            attachments: row.try_get("attachments")?,
            spf_check: row.try_get("spf_check")?,
            dkim_check: row.try_get("dkim_check")?,
            status: decode_code::<DeliveryStatus>(row, "status")?,
            cron_send_time: row.try_get("cron_send_time")?,
            update_time: row.try_get("update_time")?,
            send_user_id: row.try_get("send_user_id")?,
            size: row.try_get("size")?,
            error: row.try_get("error")?,
            send_date: row.try_get("send_date")?,
            create_time: row.try_get("create_time")?,
        })
    }
}

#[cfg(test)]
impl EmailRepository {
    /// Run a raw statement; lets tests plant rows the typed API refuses to write.
    async fn execute_raw(&self, statement: &str) -> Result<()> {
        sqlx::query(statement).execute(&self.pool).await?;
        Ok(())
    }
}
