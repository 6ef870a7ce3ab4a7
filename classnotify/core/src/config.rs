use std::{net::SocketAddr, time::Duration};

use sqlx::postgres::PgSslMode;

#[derive(Clone, Debug)]
pub struct Config {
    pub web: WebConfig,

    pub postgres: PostgresConfig,

    pub smtp: SmtpConfig,

    pub dispatch: DispatchConfig,

    pub metrics: MetricsConfig,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enable: bool,

    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub host: String,

    pub port: u16,

    pub database: String,

    pub username: String,

    pub password: String,

    pub role: Option<String>,

    pub ssl_mode: PgSslMode,

    pub max_connections: u32,

    pub application_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,

    pub port: u16,

    pub username: String,

    pub password: String,

    pub sender: Option<String>,

    pub starttls: bool,
}

#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Minimum delay between consecutive submissions within one batch.
    pub pacing_interval: Duration,

    /// Upper bound for a single transport submission.
    pub send_timeout: Duration,

    /// Upper bound for acquiring a store connection and running the
    /// recipient query.
    pub store_timeout: Duration,
}
