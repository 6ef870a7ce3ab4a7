use axum::{extract::State, Json};
use quill_axum::response::EncapsulatedJson;

use crate::{
    entity::{
        ClassBroadcastRequest, ClassInviteRequest, DispatchReport, LecturePacketRequest,
        QuizNoticeRequest, SendReceipt,
    },
    web::controller::Result,
    ServiceState,
};

/// Send a quiz notice to a single student contact
///
/// Composes the quiz notice from the request fields and submits exactly one
/// message to the mail transport.
#[utoipa::path(
    post,
    operation_id = "send_quiz_notice",
    path = "/api/v1/notices/quiz",
    request_body = QuizNoticeRequest,
    responses(
        (status = 200, description = "Notice delivered", body = SendReceipt),
        (status = 400, description = "Missing required field"),
        (status = 500, description = "Mail transport failure")
    ),
    tag = "Notices"
)]
pub async fn send_quiz_notice(
    State(state): State<ServiceState>,
    Json(request): Json<QuizNoticeRequest>,
) -> Result<EncapsulatedJson<SendReceipt>> {
    state.notification_service.send_quiz_notice(request).await?;

    Ok(EncapsulatedJson::ok(SendReceipt::delivered()))
}

/// Notify every student enrolled in a class about a new quiz
///
/// Resolves the class roster, then delivers one notice per student. A
/// recipient the transport rejects is reported in the result without
/// aborting the remainder of the batch.
#[utoipa::path(
    post,
    operation_id = "broadcast_quiz",
    path = "/api/v1/notices/broadcast",
    request_body = ClassBroadcastRequest,
    responses(
        (status = 200, description = "Batch dispatched", body = DispatchReport),
        (status = 400, description = "Missing required field"),
        (status = 404, description = "No students enrolled in the class"),
        (status = 503, description = "Recipient store unavailable")
    ),
    tag = "Notices"
)]
pub async fn broadcast_quiz(
    State(state): State<ServiceState>,
    Json(request): Json<ClassBroadcastRequest>,
) -> Result<EncapsulatedJson<DispatchReport>> {
    let report = state.notification_service.broadcast_quiz(request).await?;

    Ok(EncapsulatedJson::ok(report))
}

/// Invite a student into a class
#[utoipa::path(
    post,
    operation_id = "send_class_invite",
    path = "/api/v1/notices/invite",
    request_body = ClassInviteRequest,
    responses(
        (status = 200, description = "Invitation delivered", body = SendReceipt),
        (status = 400, description = "Missing required field"),
        (status = 500, description = "Mail transport failure")
    ),
    tag = "Notices"
)]
pub async fn send_class_invite(
    State(state): State<ServiceState>,
    Json(request): Json<ClassInviteRequest>,
) -> Result<EncapsulatedJson<SendReceipt>> {
    state.notification_service.send_class_invite(request).await?;

    Ok(EncapsulatedJson::ok(SendReceipt::delivered()))
}

/// Deliver lecture materials to a single student
///
/// The attachment reference may be a local file (attached inline, up to the
/// size ceiling) or an http(s) link (embedded into the body).
#[utoipa::path(
    post,
    operation_id = "send_lecture_packet",
    path = "/api/v1/notices/lecture",
    request_body = LecturePacketRequest,
    responses(
        (status = 200, description = "Lecture packet delivered", body = SendReceipt),
        (status = 400, description = "Missing field, attachment not found or too large"),
        (status = 500, description = "Mail transport failure")
    ),
    tag = "Notices"
)]
pub async fn send_lecture_packet(
    State(state): State<ServiceState>,
    Json(request): Json<LecturePacketRequest>,
) -> Result<EncapsulatedJson<SendReceipt>> {
    state.notification_service.send_lecture_packet(request).await?;

    Ok(EncapsulatedJson::ok(SendReceipt::delivered()))
}
