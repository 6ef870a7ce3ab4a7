use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use quill_axum::{json_response, response, response::EncapsulatedJsonError};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Missing required field: {field}"))]
    MissingField { field: &'static str },

    #[snafu(display("No students enrolled in class: {class_id}"))]
    EmptyClass { class_id: String },

    #[snafu(display("Fail to acquire database connection, error: {source}"))]
    AcquireConnection { source: sqlx::Error },

    #[snafu(display("Fail to list students of class {class_id}, error: {source}"))]
    ListClassStudents { class_id: String, source: sqlx::Error },

    #[snafu(display("Recipient store did not answer within {timeout_secs}s for class {class_id}"))]
    StoreTimeout { class_id: String, timeout_secs: u64 },

    #[snafu(display("Attachment not found: {}", path.display()))]
    AttachmentNotFound { path: PathBuf },

    #[snafu(display(
        "Attachment {} is {size_bytes} bytes, above the {limit_bytes} byte ceiling",
        path.display()
    ))]
    AttachmentTooLarge { path: PathBuf, size_bytes: u64, limit_bytes: u64 },

    #[snafu(display("Fail to read attachment {}, error: {source}", path.display()))]
    ReadAttachment { path: PathBuf, source: std::io::Error },

    #[snafu(display("Fail to deliver notice to {recipient}, error: {source}"))]
    DeliverNotice { recipient: String, source: notification::Error },

    #[snafu(display("Mail transport did not answer within {timeout_secs}s for {recipient}"))]
    SendTimeout { recipient: String, timeout_secs: u64 },
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        match self {
            Self::MissingField { .. } => json_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                error: response::Error {
                    type_: response::ErrorType::Validation,
                    message: self.to_string(),
                    additional_fields: IndexMap::default(),
                }
            },
            Self::AttachmentNotFound { .. } | Self::AttachmentTooLarge { .. } => json_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                error: response::Error {
                    type_: response::ErrorType::BadRequest,
                    message: self.to_string(),
                    additional_fields: IndexMap::default(),
                }
            },
            Self::EmptyClass { .. } => json_response! {
                reason: self,
                status: StatusCode::NOT_FOUND,
                error: response::Error {
                    type_: response::ErrorType::NotFound,
                    message: self.to_string(),
                    additional_fields: IndexMap::default(),
                }
            },
            Self::AcquireConnection { .. }
            | Self::ListClassStudents { .. }
            | Self::StoreTimeout { .. } => json_response! {
                reason: self,
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: response::Error {
                    type_: response::ErrorType::ServiceUnavailable,
                    message: self.to_string(),
                    additional_fields: IndexMap::default(),
                }
            },
            _ => json_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: response::Error {
                    type_: response::ErrorType::Internal,
                    message: self.to_string(),
                    additional_fields: IndexMap::default(),
                }
            },
        }
    }
}
