use std::{future::Future, net::SocketAddr};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Router,
};
use snafu::ResultExt;
use tokio::net::TcpListener;

use crate::{error, traits::Metrics, Error};

/// Serve the Prometheus text exposition endpoint until the shutdown signal
/// resolves.
///
/// # Errors
///
/// Returns an error if the listen address can not be bound or the HTTP
/// server fails while serving.
pub async fn start_metrics_server<M, ShutdownSignal>(
    listen_address: SocketAddr,
    metrics: M,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    M: Metrics,
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router =
        Router::new().route("/metrics", routing::get(render_metrics::<M>)).with_state(metrics);

    let listener = TcpListener::bind(&listen_address).await.context(error::BindTcpServerSnafu)?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context(error::ServeHttpServerSnafu)
}

async fn render_metrics<M>(State(metrics): State<M>) -> Response
where
    M: Metrics,
{
    let metric_families = metrics.gather();

    let mut buffer = Vec::new();
    let encoder = prometheus::TextEncoder::new();

    if let Err(err) = prometheus::Encoder::encode(&encoder, &metric_families, &mut buffer) {
        tracing::error!("Fail to encode metrics: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], buffer).into_response()
}
