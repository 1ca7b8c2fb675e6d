use crate::types::{CourierError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

/// A named set of feed URLs sharing one notification policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedGroup {
    pub name: String,
    pub feeds: Vec<String>,
    /// Extra recipients for this group, additive to the global list.
    #[serde(default)]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Recipients for every feedgroup.
    pub recipients: Vec<String>,
    /// Explicit sender address. Takes precedence over `sender_domain`.
    #[serde(default)]
    pub sender: Option<String>,
    /// Domain used to derive per-group senders: `rss+<group>@<domain>`.
    #[serde(default)]
    pub sender_domain: Option<String>,
    /// SMTP relay host; localhost when unset.
    #[serde(default)]
    pub smtp_relay: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feedgroups: Vec<FeedGroup>,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        debug!(
            "Loaded config with {} feedgroups from {}",
            config.feedgroups.len(),
            path.as_ref().display()
        );
        Ok(config)
    }

    /// Rejects configurations whose feed URLs are not http(s) URLs. Run once
    /// at startup so a typo fails the process instead of one poll cycle.
    pub fn validate(&self) -> Result<()> {
        for group in &self.feedgroups {
            for feed in &group.feeds {
                let parsed = Url::parse(feed)?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(CourierError::Config(format!(
                        "feed URL {feed} in group {} is not http(s)",
                        group.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Sender address for a feedgroup: the explicit `mail.sender` if
    /// configured, else `rss+<group>@<sender_domain>`. Having neither is a
    /// configuration error and fails the group's feeds.
    pub fn sender_address(&self, feedgroup_name: &str) -> Result<String> {
        if let Some(sender) = &self.mail.sender {
            return Ok(sender.trim().to_string());
        }
        if let Some(domain) = &self.mail.sender_domain {
            return Ok(format!("rss+{}@{}", feedgroup_name, domain.trim()));
        }
        Err(CourierError::Config(
            "no mail.sender nor mail.sender_domain configured".to_string(),
        ))
    }

    /// Recipient set for a group: global recipients plus the group's own,
    /// each trimmed of surrounding whitespace.
    pub fn recipients_for(&self, group: &FeedGroup) -> Vec<String> {
        self.mail
            .recipients
            .iter()
            .chain(group.recipients.iter())
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect()
    }
}
