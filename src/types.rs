use chrono::{DateTime, Utc};

/// The parsed result of fetching one feed URL. Entries are kept in
/// feed-native order, which for RSS/Atom is conventionally newest-first.
#[derive(Debug, Clone)]
pub struct RawFeedDocument {
    pub title: Option<String>,
    pub entries: Vec<RawEntry>,
}

/// One entry of a feed, with every field optional. Real-world feeds omit
/// any of these; the resolver and extractor own the fallback policy.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub id: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Primary body candidate (full content).
    pub content: Option<String>,
    /// Fallback body candidate (summary/description).
    pub summary: Option<String>,
}

/// Stable identity of an entry: the dedup key within a feed's scope plus
/// the title used for the notification subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIdentity {
    pub key: String,
    pub title: String,
}

/// Best-available timestamp and body for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub timestamp: String,
    pub body: String,
}

/// Outcome of a write-once ledger insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    AlreadyExists,
}

/// Ephemeral mail value handed to the notifier. Not persisted.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Display name for the sender mailbox, typically the feed title.
    pub sender_name: Option<String>,
    pub sender_address: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("mail delivery failed: {0}")]
    Delivery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CourierError>;
