use snafu::Snafu;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Failed to create the SMTP transport.
    #[snafu(display("Failed to create SMTP transport, error: {source}"))]
    CreateTransport { source: lettre::transport::smtp::Error },

    /// A sender or recipient address could not be parsed as a mailbox.
    #[snafu(display("Invalid mailbox address `{address}`"))]
    InvalidAddress { address: String },

    /// Failed to assemble the email message.
    #[snafu(display("Failed to build email message, error: {source}"))]
    BuildEmail { source: lettre::error::Error },

    /// The SMTP server rejected or failed the submission.
    #[snafu(display("Failed to submit email, error: {source}"))]
    Submit { source: lettre::transport::smtp::Error },
}
