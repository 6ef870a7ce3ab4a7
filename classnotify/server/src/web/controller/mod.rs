mod error;
mod notice;

use axum::{routing, Extension, Router};
use classnotify_core::ServerInfo;
use quill_axum::response::EncapsulatedJson;
use utoipa::OpenApi;

pub use self::error::{Error, Result};
use crate::ServiceState;

pub fn api_v1_router(service_state: &ServiceState) -> Router {
    let routes = Router::new()
        .route("/v1/info", routing::get(server_info))
        .route("/v1/notices/quiz", routing::post(notice::send_quiz_notice))
        .route("/v1/notices/broadcast", routing::post(notice::broadcast_quiz))
        .route("/v1/notices/invite", routing::post(notice::send_class_invite))
        .route("/v1/notices/lecture", routing::post(notice::send_lecture_packet));

    Router::new().nest("/api", routes).with_state(service_state.clone())
}

/// Get server info
#[utoipa::path(
    get,
    operation_id = "get_server_info",
    path = "/api/v1/info",
    responses(
        (status = 200, body = ServerInfo)
    )
)]
pub async fn server_info(
    Extension(server_info): Extension<ServerInfo>,
) -> Result<EncapsulatedJson<ServerInfo>> {
    Ok(EncapsulatedJson::ok(server_info))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        server_info,
        notice::send_quiz_notice,
        notice::broadcast_quiz,
        notice::send_class_invite,
        notice::send_lecture_packet,
    ),
    components(schemas(
        ServerInfo,
        crate::entity::QuizNoticeRequest,
        crate::entity::ClassBroadcastRequest,
        crate::entity::ClassInviteRequest,
        crate::entity::LecturePacketRequest,
        crate::entity::SendReceipt,
        crate::entity::DispatchReport,
        crate::entity::DeliveryFailure,
    )),
    tags(
        (name = "Notices", description = "Notification dispatch endpoints")
    )
)]
pub struct ApiDoc;
