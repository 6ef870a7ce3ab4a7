use std::{sync::Arc, time::Duration};

use classnotify_core::config::DispatchConfig;
use notification::Mailer;
use quill_metrics::DefaultMetrics;
use snafu::ResultExt;
use sqlx::PgPool;
use tokio::time::timeout;

use super::{
    attachment::{self, AdmittedAttachment},
    compose::{self, LectureMaterial},
    dispatch::Dispatcher,
    error::{self, Error, Result},
    sql_executor::RecipientSqlExecutor,
};
use crate::entity::{
    ClassBroadcastRequest, ClassInviteRequest, DispatchReport, LecturePacketRequest,
    QuizNoticeRequest, Recipient,
};

/// Notification service orchestrating validation, recipient resolution,
/// attachment admission, composition and dispatch.
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    dispatcher: Dispatcher,
    store_timeout: Duration,
}

impl NotificationService {
    /// Create a new notification service
    #[must_use]
    pub fn new(
        db: PgPool,
        mailer: Arc<dyn Mailer>,
        metrics: DefaultMetrics,
        dispatch: &DispatchConfig,
    ) -> Self {
        let dispatcher =
            Dispatcher::new(mailer, dispatch.pacing_interval, dispatch.send_timeout, metrics);

        Self { db, dispatcher, store_timeout: dispatch.store_timeout }
    }

    /// Sends the quiz notice for a single student contact.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The transport rejects the submission
    pub async fn send_quiz_notice(&self, request: QuizNoticeRequest) -> Result<()> {
        let notice = request.validate()?;
        let outbound = compose::quiz_notice(&notice)?;

        self.dispatcher.dispatch_one(&outbound).await
    }

    /// Notifies every student enrolled in the class about a new quiz.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The class has no enrolled students
    /// - The recipient store is unreachable
    ///
    /// Per-recipient delivery failures do not error; they are reported in
    /// the returned [`DispatchReport`].
    pub async fn broadcast_quiz(&self, request: ClassBroadcastRequest) -> Result<DispatchReport> {
        let broadcast = request.validate()?;

        let recipients = self.resolve_recipients(&broadcast.class_id).await?;
        if recipients.is_empty() {
            return Err(Error::EmptyClass { class_id: broadcast.class_id });
        }

        tracing::info!(
            class_id = %broadcast.class_id,
            recipients = recipients.len(),
            "Dispatching class broadcast"
        );

        let report = self
            .dispatcher
            .dispatch_all(&recipients, |recipient| {
                compose::broadcast_notice(&broadcast, recipient)
            })
            .await;

        Ok(report)
    }

    /// Sends a class invitation to a single student.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The transport rejects the submission
    pub async fn send_class_invite(&self, request: ClassInviteRequest) -> Result<()> {
        let invite = request.validate()?;
        let outbound = compose::invite_notice(&invite)?;

        self.dispatcher.dispatch_one(&outbound).await
    }

    /// Delivers lecture materials to a single student.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The attachment reference is missing on disk or above the ceiling
    /// - The transport rejects the submission
    pub async fn send_lecture_packet(&self, request: LecturePacketRequest) -> Result<()> {
        let packet = request.validate()?;

        // Admission runs before any composition so a doomed attachment
        // aborts the request with zero side effects.
        let admitted = attachment::admit(packet.attachment_ref.as_deref()).await?;

        let material = match admitted {
            AdmittedAttachment::None => LectureMaterial::None,
            AdmittedAttachment::Remote { url } => LectureMaterial::Link(url),
            // Bytes are pulled in right before dispatch so no file handle
            // stays open across the send.
            AdmittedAttachment::Inline { path, .. } => {
                LectureMaterial::File(attachment::load_payload(&path).await?)
            }
        };

        let outbound = compose::lecture_notice(&packet, material)?;

        self.dispatcher.dispatch_one(&outbound).await
    }

    /// Resolves the class roster through one scoped store connection.
    ///
    /// The connection is released before any dispatch work starts, so it is
    /// never held across the pacing delays of a long batch.
    async fn resolve_recipients(&self, class_id: &str) -> Result<Vec<Recipient>> {
        let mut conn = match timeout(self.store_timeout, self.db.acquire()).await {
            Ok(conn) => conn.context(error::AcquireConnectionSnafu)?,
            Err(_) => {
                return Err(Error::StoreTimeout {
                    class_id: class_id.to_string(),
                    timeout_secs: self.store_timeout.as_secs(),
                })
            }
        };

        match timeout(self.store_timeout, conn.list_class_students(class_id)).await {
            Ok(recipients) => recipients,
            Err(_) => Err(Error::StoreTimeout {
                class_id: class_id.to_string(),
                timeout_secs: self.store_timeout.as_secs(),
            }),
        }
    }
}
