use anyhow::Context;
use clap::Parser;
use rss_courier::{
    AppConfig, FeedPoller, FetchConfig, HttpFeedFetcher, SmtpNotifier, SqliteLedger,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "rss-courier", about = "Polls RSS/Atom feeds and mails new entries")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = "courier.json")]
    config: PathBuf,

    /// Path to the SQLite dedup ledger.
    #[arg(long, default_value = "courier.db")]
    ledger: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    config.validate().context("invalid configuration")?;

    let fetcher = Arc::new(HttpFeedFetcher::new(FetchConfig::default())?);
    let ledger = Arc::new(SqliteLedger::open(&cli.ledger).await?);
    let notifier = Arc::new(SmtpNotifier::new(config.mail.smtp_relay.as_deref())?);
    let poller = FeedPoller::new(fetcher, ledger, notifier);

    info!("Starting poll cycle over {} feedgroups", config.feedgroups.len());
    let summary = poller.run_cycle(&config).await;

    for failure in &summary.failures {
        error!(
            "Feed {} in group {} failed: {}",
            failure.url, failure.group, failure.error
        );
    }
    println!("{summary}");

    if summary.failures.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} feed(s) failed during the cycle", summary.failures.len())
    }
}
