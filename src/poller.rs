use crate::config::{AppConfig, FeedGroup};
use crate::fetcher::FeedFetcher;
use crate::ledger::Ledger;
use crate::notifier::{render_body, Notifier};
use crate::types::{CourierError, InsertOutcome, Notification, Result};
use crate::{content, identity};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One feed that failed during a cycle, reported alongside the totals so
/// errored feeds never distort the sent count.
#[derive(Debug, Clone)]
pub struct FeedFailure {
    pub group: String,
    pub url: String,
    pub error: String,
}

/// Result of one poll cycle across all feedgroups.
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub groups: Vec<String>,
    pub total_sent: usize,
    pub failures: Vec<FeedFailure>,
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Polled groups ({}), sent {} updates.",
            self.groups.join(" "),
            self.total_sent
        )
    }
}

/// Orchestrates fetch → identity → dedup → notify for configured feeds.
///
/// The ledger insert happens before the send, so a crash or delivery
/// failure after the insert suppresses that entry forever: at-most-once
/// notification, never duplicates on retry.
pub struct FeedPoller {
    fetcher: Arc<dyn FeedFetcher>,
    ledger: Arc<dyn Ledger>,
    notifier: Arc<dyn Notifier>,
}

impl FeedPoller {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        ledger: Arc<dyn Ledger>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fetcher,
            ledger,
            notifier,
        }
    }

    /// Polls one feed URL and returns the number of notifications sent.
    ///
    /// The dedup scope is the feed URL itself. That choice is pinned:
    /// switching to a feed-native id would partition the ledger
    /// differently and replay every entry of a deployed feed.
    pub async fn poll_feed(
        &self,
        url: &str,
        group: &FeedGroup,
        config: &AppConfig,
    ) -> Result<usize> {
        // Resolve the notification policy first so a misconfigured group
        // fails before any fetch or ledger write.
        let sender_address = config.sender_address(&group.name)?;
        let recipients = config.recipients_for(group);
        if recipients.is_empty() {
            return Err(CourierError::Config(format!(
                "no recipients configured for group {}",
                group.name
            )));
        }

        let document = self.fetcher.fetch(url).await?;
        let scope_key = url;
        let mut sent = 0;

        // Feeds list newest-first; walk oldest-first so sends and ledger
        // writes are monotonic with publication time.
        for entry in document.entries.iter().rev() {
            let Some(entry_identity) = identity::resolve(entry) else {
                debug!("Skipping entry without id or link in {}", url);
                continue;
            };

            if self.ledger.exists(scope_key, &entry_identity.key).await? {
                continue;
            }

            let Some(extracted) = content::extract(entry) else {
                debug!("Skipping entry {} with no content", entry_identity.key);
                continue;
            };

            // Record before sending. A ledger error aborts the rest of
            // this feed; skipping the record and sending anyway would
            // break the at-most-once guarantee.
            if self.ledger.insert(scope_key, &entry_identity.key).await?
                == InsertOutcome::AlreadyExists
            {
                debug!(
                    "Entry {} claimed by a concurrent poller, skipping",
                    entry_identity.key
                );
                continue;
            }

            let notification = Notification {
                sender_name: document.title.clone(),
                sender_address: sender_address.clone(),
                recipients: recipients.clone(),
                subject: entry_identity.title.clone(),
                html_body: render_body(
                    entry.link.as_deref(),
                    &extracted.timestamp,
                    &entry_identity.title,
                    &extracted.body,
                ),
            };

            match self.notifier.send(&notification).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    // The ledger row already exists, so this entry will
                    // never be retried. Surface that loudly.
                    warn!(
                        "Entry {} recorded but undelivered for {}: {}",
                        entry_identity.key, url, e
                    );
                }
            }
        }

        Ok(sent)
    }

    /// Runs one poll cycle over every feedgroup, in configuration order.
    /// A failing feed is reported and the cycle moves on.
    pub async fn run_cycle(&self, config: &AppConfig) -> CycleSummary {
        let mut groups = Vec::new();
        let mut total_sent = 0;
        let mut failures = Vec::new();

        for group in &config.feedgroups {
            groups.push(group.name.clone());
            for url in &group.feeds {
                match self.poll_feed(url, group, config).await {
                    Ok(sent) => {
                        info!("Polled {} ({}): sent {}", url, group.name, sent);
                        total_sent += sent;
                    }
                    Err(e) => {
                        error!("Failed to poll {} ({}): {}", url, group.name, e);
                        failures.push(FeedFailure {
                            group: group.name.clone(),
                            url: url.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        CycleSummary {
            groups,
            total_sent,
            failures,
        }
    }
}
