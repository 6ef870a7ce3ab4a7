//! Example: Submit a quiz notice through an SMTP relay.
//!
//! # Prerequisites
//!
//! 1. An SMTP account that allows relaying (an app password for Gmail)
//! 2. Replace the credentials and recipient below
//!
//! # Usage
//!
//! ```bash
//! cargo run --example send_quiz_notice
//! ```

use notification::{smtp, Mailer, OutboundMessage};

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting quiz notice example");

    let config = smtp::Config {
        host: "smtp.gmail.com".to_string(),
        port: 587,
        username: "noreply@yourdomain.com".to_string(),
        password: "app-password".to_string(),
        sender: None,
        starttls: true,
    };

    let client = smtp::Client::new(config)?;

    let outbound = OutboundMessage {
        to: "student@example.com".to_string(),
        subject: "Regarding Quiz Q42".to_string(),
        body: "Hello Ms. Rivera,\n\nThis is a notification regarding Quiz Q42. Please reach out \
               to student@example.com for further details."
            .to_string(),
        attachment: None,
    };

    tracing::info!("Submitting quiz notice");
    client.send(&outbound).await?;

    tracing::info!("Notice submitted successfully");
    Ok(())
}
