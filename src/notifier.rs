use crate::types::{CourierError, Notification, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

/// Renders the fixed HTML mail body. Content is embedded as given;
/// sanitization is the feed parser's concern upstream. Entries without a
/// link get a plain "Published ..." line instead of a dangling anchor.
pub fn render_body(link: Option<&str>, timestamp: &str, title: &str, content: &str) -> String {
    let published = match link {
        Some(link) => format!("<a href='{link}'>Original post</a> published {timestamp}"),
        None => format!("Published {timestamp}"),
    };
    format!(
        r#"<html>
    <body>
        <p>{published}</p>
        <h1>{title}</h1>
        <div>{content}</div>
    </body>
</html>"#
    )
}

/// Mail-send collaborator: one call per new entry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// TLS relay when a host is given, plain localhost delivery otherwise.
    pub fn new(relay: Option<&str>) -> Result<Self> {
        let transport = match relay {
            Some(host) => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| CourierError::Delivery(e.to_string()))?
                .build(),
            None => AsyncSmtpTransport::<Tokio1Executor>::unencrypted_localhost(),
        };
        Ok(Self { transport })
    }
}

fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox> {
    let address: Address = address
        .parse()
        .map_err(|e| CourierError::Config(format!("invalid mail address {address}: {e}")))?;
    Ok(Mailbox::new(name.map(String::from), address))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let from = mailbox(
            notification.sender_name.as_deref(),
            &notification.sender_address,
        )?;

        let mut builder = Message::builder()
            .from(from)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_HTML);
        for recipient in &notification.recipients {
            builder = builder.to(mailbox(None, recipient)?);
        }

        let message = builder
            .body(notification.html_body.clone())
            .map_err(|e| CourierError::Delivery(e.to_string()))?;

        debug!(
            "Sending \"{}\" to {} recipients",
            notification.subject,
            notification.recipients.len()
        );
        self.transport
            .send(message)
            .await
            .map_err(|e| CourierError::Delivery(e.to_string()))?;
        info!("Sent notification: {}", notification.subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_embeds_all_fields() {
        let body = render_body(
            Some("https://example.com/1"),
            "Tue, 02 Jan 2024 03:04:05 UTC",
            "Hello",
            "<p>world</p>",
        );
        assert!(body.contains("<a href='https://example.com/1'>Original post</a>"));
        assert!(body.contains("published Tue, 02 Jan 2024 03:04:05 UTC"));
        assert!(body.contains("<h1>Hello</h1>"));
        assert!(body.contains("<div><p>world</p></div>"));
    }

    #[test]
    fn body_without_link_has_no_anchor() {
        let body = render_body(None, "UNKNOWN", "Hello", "world");
        assert!(!body.contains("<a href"));
        assert!(body.contains("<p>Published UNKNOWN</p>"));
        assert!(body.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn mailbox_carries_display_name() {
        let mb = mailbox(Some("Example Blog"), "rss+tech@x.com").unwrap();
        assert_eq!(mb.name.as_deref(), Some("Example Blog"));
        assert_eq!(mb.email.to_string(), "rss+tech@x.com");
    }

    #[test]
    fn invalid_address_is_config_error() {
        assert!(matches!(
            mailbox(None, "not-an-address"),
            Err(CourierError::Config(_))
        ));
    }
}
