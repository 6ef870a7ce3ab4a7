pub mod entity;
mod error;
mod service;
mod web;

use std::{future::Future, net::SocketAddr, pin::Pin, sync::Arc};

use classnotify_core::{
    config::{Config, PostgresConfig, SmtpConfig},
    ServerInfo,
};
use futures::{future::BoxFuture, FutureExt};
use notification::Mailer;
use quill_metrics::DefaultMetrics;
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
    Executor, PgPool,
};
use tracing::Instrument;

pub use self::{
    error::{Error, Result},
    service::NotificationService,
    web::{controller, ApiDoc, ServiceState},
};

const MIGRATOR: Migrator = Migrator { ignore_missing: true, ..sqlx::migrate!() };

/// # Errors
/// Returns errors when server fails to start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { web, postgres, smtp, dispatch, metrics } = config;

    let database = initialize_postgres_pool(&postgres).await?;

    let mailer = initialize_mailer(smtp)?;

    let default_metrics = DefaultMetrics::new()?;

    let service_state =
        ServiceState::new(database, mailer, default_metrics.clone(), &dispatch);

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Http Server",
        create_web_http_server_future(web.listen_address, service_state, server_info),
    );

    if metrics.enable {
        let _handle = lifecycle_manager.spawn(
            "Metrics server",
            create_metrics_server_future(metrics.listen_address, default_metrics),
        );
    }

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

#[tracing::instrument(
    skip(password, database, ssl_mode, max_connections),
    fields(
        host = %host,
        port = port,
        username = %username
    )
)]
async fn initialize_postgres_pool(
    PostgresConfig {
        host,
        port,
        username,
        role,
        password,
        database,
        ssl_mode,
        max_connections,
        application_name,
    }: &PostgresConfig,
) -> Result<PgPool> {
    tracing::info!("Initializing database");

    let connect_opts = PgConnectOptions::new_without_pgpass()
        .host(host)
        .port(*port)
        .username(username)
        .password(password)
        .database(database)
        .ssl_mode(*ssl_mode);

    // append application name if provided
    let connect_opts = if let Some(app_name) = application_name {
        connect_opts.application_name(app_name)
    } else {
        connect_opts
    };

    let pool_opts = {
        let opts = PgPoolOptions::new().max_connections(*max_connections);

        if let Some(role) = role {
            let set_role = format!(r#"SET SESSION ROLE = "{role}";"#);
            opts.after_connect(move |conn, _meta| {
                let set_role = set_role.clone();
                async move {
                    let _ = conn.execute(set_role.as_str()).await?;
                    Ok(())
                }
                .boxed()
            })
        } else {
            opts
        }
    };
    let pool =
        pool_opts.connect_with(connect_opts).await.context(error::InitializePostgresPoolSnafu {
            host: host.to_string(),
            port: *port,
            username: username.to_string(),
            database: database.to_string(),
        })?;

    MIGRATOR
        .run(&pool)
        .instrument(tracing::info_span!("migrate"))
        .await
        .context(error::MigrateSchemaSnafu)?;

    Ok(pool)
}

#[tracing::instrument(
    skip(smtp),
    fields(
        host = %smtp.host,
        port = smtp.port
    )
)]
fn initialize_mailer(smtp: SmtpConfig) -> Result<Arc<dyn Mailer>> {
    tracing::info!("Initializing SMTP mail transport");

    let SmtpConfig { host, port, username, password, sender, starttls } = smtp;

    let client = notification::smtp::Client::new(notification::smtp::Config {
        host,
        port,
        username,
        password,
        sender,
        starttls,
    })
    .context(error::CreateMailTransportSnafu)?;

    Ok(Arc::new(client))
}

fn create_web_http_server_future(
    listen_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!("Listen Web HTTP server endpoint on {listen_address}");

            let result =
                web::new_api_server(listen_address, service_state, server_info, shutdown_signal)
                    .await;

            match result {
                Ok(()) => {
                    tracing::info!("HTTP server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}

fn create_metrics_server_future<Metrics>(
    listen_address: SocketAddr,
    metrics: Metrics,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>>
where
    Metrics: quill_metrics::Metrics + 'static,
{
    move |signal| {
        async move {
            tracing::info!("Listen metrics endpoint on {listen_address}");
            let result = quill_metrics::start_metrics_server(listen_address, metrics, signal).await;
            match result {
                Ok(()) => {
                    tracing::info!("Metrics server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
