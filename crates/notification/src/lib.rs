//! # Notification Crate
//!
//! This crate carries notices to their recipients. It exposes the [`Mailer`]
//! trait consumed by the dispatch layer and an SMTP implementation backed by
//! `lettre`.
//!
//! ## Features
//!
//! - SMTP submission with STARTTLS and credential authentication
//! - Plain-text bodies with optional inline file attachments
//! - Async/await support

mod error;
pub mod smtp;

use std::fmt;

use async_trait::async_trait;
pub use error::Error;

/// A fully composed, single-recipient message ready for submission.
///
/// The sender identity is not part of the message; it is process-wide
/// configuration owned by the transport.
#[derive(Clone, Debug)]
pub struct OutboundMessage {
    /// The recipient's email address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The plain-text body.
    pub body: String,
    /// Optional inline attachment.
    pub attachment: Option<AttachmentPayload>,
}

/// File content attached to an [`OutboundMessage`].
#[derive(Clone)]
pub struct AttachmentPayload {
    /// File name presented to the recipient.
    pub filename: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl fmt::Debug for AttachmentPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentPayload")
            .field("filename", &self.filename)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// Trait for transports that can submit an outbound message.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Submits one message to the underlying transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the message can not be built or the transport
    /// rejects the submission.
    async fn send(&self, outbound: &OutboundMessage) -> Result<(), Error>;
}
