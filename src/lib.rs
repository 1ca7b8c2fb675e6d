pub mod config;
pub mod content;
pub mod fetcher;
pub mod identity;
pub mod ledger;
pub mod notifier;
pub mod poller;
pub mod types;

pub use config::{AppConfig, FeedGroup, MailConfig};
pub use fetcher::{FeedFetcher, FetchConfig, HttpFeedFetcher};
pub use ledger::{Ledger, SqliteLedger};
pub use notifier::{Notifier, SmtpNotifier};
pub use poller::{CycleSummary, FeedFailure, FeedPoller};
pub use types::*;
