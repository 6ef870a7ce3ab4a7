//! SMTP transport implementation for submitting outbound notices.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Body, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

use crate::{error, AttachmentPayload, Error, Mailer, OutboundMessage};

/// Configuration for the SMTP client.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// SMTP relay host.
    pub host: String,
    /// SMTP relay port.
    pub port: u16,
    /// Account used to authenticate against the relay.
    pub username: String,
    /// Password for the relay account.
    pub password: String,
    /// Sender address; falls back to `username` when absent.
    pub sender: Option<String>,
    /// Negotiate STARTTLS on a plain connection instead of implicit TLS.
    pub starttls: bool,
}

/// SMTP client for submitting notices.
#[derive(Clone)]
pub struct Client {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Client {
    /// Creates a new SMTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host is not a valid transport target.
    pub fn new(config: Config) -> Result<Self, Error> {
        let Config { host, port, username, password, sender, starttls } = config;

        let from_address = sender.unwrap_or_else(|| username.clone());

        tracing::info!(host = %host, port = port, sender = %from_address, "Creating SMTP transport");

        let builder = if starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
        }
        .context(error::CreateTransportSnafu)?
        .port(port);

        let builder = if username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(username, password))
        };

        Ok(Self { transport: builder.build(), from_address })
    }

    /// The configured sender identity.
    #[inline]
    #[must_use]
    pub fn from_address(&self) -> &str { &self.from_address }
}

#[async_trait]
impl Mailer for Client {
    async fn send(&self, outbound: &OutboundMessage) -> Result<(), Error> {
        let email = build_message(&self.from_address, outbound)?;

        let response = self.transport.send(email).await.context(error::SubmitSnafu)?;

        tracing::info!(to = %outbound.to, code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

/// Builds a `lettre` message from an outbound notice.
///
/// # Errors
///
/// Returns an error if an address is invalid or the message can not be
/// assembled.
pub fn build_message(from: &str, outbound: &OutboundMessage) -> Result<Message, Error> {
    let from_mailbox: Mailbox =
        from.parse().ok().context(error::InvalidAddressSnafu { address: from })?;
    let to_mailbox: Mailbox = outbound
        .to
        .parse()
        .ok()
        .context(error::InvalidAddressSnafu { address: outbound.to.clone() })?;

    let builder =
        Message::builder().from(from_mailbox).to(to_mailbox).subject(outbound.subject.as_str());

    match &outbound.attachment {
        Some(attachment) => builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(outbound.body.clone()),
                    )
                    .singlepart(attachment_part(attachment)),
            )
            .context(error::BuildEmailSnafu),
        None => builder.body(outbound.body.clone()).context(error::BuildEmailSnafu),
    }
}

fn attachment_part(attachment: &AttachmentPayload) -> SinglePart {
    let content_type =
        ContentType::parse("application/octet-stream").expect("static media type is valid; qed");

    Attachment::new(attachment.filename.clone())
        .body(Body::new(attachment.content.clone()), content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_notice() -> OutboundMessage {
        OutboundMessage {
            to: "student@example.com".to_string(),
            subject: "Regarding Quiz Q42".to_string(),
            body: "Hello Alice,\n\nThis is a notification regarding Quiz Q42.".to_string(),
            attachment: None,
        }
    }

    #[test]
    fn test_build_message() {
        let message = build_message("noreply@example.com", &quiz_notice()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("noreply@example.com"));
        assert!(formatted.contains("student@example.com"));
        assert!(formatted.contains("Regarding Quiz Q42"));
        assert!(formatted.contains("Hello Alice,"));
    }

    #[test]
    fn test_build_message_with_attachment() {
        let mut outbound = quiz_notice();
        outbound.attachment = Some(AttachmentPayload {
            filename: "lecture-notes.pdf".to_string(),
            content: b"%PDF-1.4".to_vec(),
        });

        let message = build_message("noreply@example.com", &outbound).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("lecture-notes.pdf"));
    }

    #[test]
    fn test_build_message_invalid_from() {
        let result = build_message("invalid-email", &quiz_notice());

        assert!(matches!(result, Err(Error::InvalidAddress { .. })));
    }

    #[test]
    fn test_build_message_invalid_to() {
        let mut outbound = quiz_notice();
        outbound.to = "invalid-email".to_string();

        let result = build_message("noreply@example.com", &outbound);

        assert!(matches!(result, Err(Error::InvalidAddress { .. })));
    }
}
