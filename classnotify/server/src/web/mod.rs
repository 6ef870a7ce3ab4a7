pub mod controller;
pub mod error;

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    extract::Request, http, response::IntoResponse, routing, Extension, Json, Router, ServiceExt,
};
use classnotify_core::{config::DispatchConfig, ServerInfo};
use notification::Mailer;
use quill_axum::{json_response, response::EncapsulatedJsonError};
use quill_metrics::DefaultMetrics;
use snafu::ResultExt;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, normalize_path::NormalizePathLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub use self::{controller::ApiDoc, error::Error};
use crate::service::NotificationService;

pub async fn new_api_server<ShutdownSignal>(
    socket_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    // The notice endpoints are called straight from the classroom web app,
    // so cross-origin requests are allowed wholesale.
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    let router = {
        let router = Router::new()
            // For load balancer default health check
            .route("/", routing::get(controller::server_info))
            .route("/openapi.json", routing::get(openapi_json))
            .merge(controller::api_v1_router(&service_state))
            .layer(Extension(server_info))
            .layer(middleware_stack)
            .fallback(fallback);
        let router = NormalizePathLayer::trim_trailing_slash().layer(router);
        ServiceExt::<Request>::into_make_service(router)
    };

    let listener = TcpListener::bind(&socket_address).await.context(error::BindTcpServerSnafu)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn fallback(uri: http::Uri) -> axum::response::Response {
    json_response! {
        status: http::StatusCode::NOT_FOUND,
        error: quill_axum::response::Error {
            type_: quill_axum::response::ErrorType::NotFound,
            message: format!("No route for {uri}"),
            additional_fields: indexmap::IndexMap::default(),
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> { Json(ApiDoc::openapi()) }

#[derive(Clone)]
pub struct ServiceState {
    pub notification_service: NotificationService,
}

impl ServiceState {
    /// Create a new service state
    #[must_use]
    pub fn new(
        database: PgPool,
        mailer: Arc<dyn Mailer>,
        metrics: DefaultMetrics,
        dispatch: &DispatchConfig,
    ) -> Self {
        let notification_service = NotificationService::new(database, mailer, metrics, dispatch);

        Self { notification_service }
    }
}
