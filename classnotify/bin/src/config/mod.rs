mod dispatch;
mod error;
mod metrics;
mod postgres;
mod smtp;
mod web;

use std::path::{Path, PathBuf};

use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use quill_cli_common::config::LogConfig;

pub use self::{
    dispatch::DispatchConfig, error::Error, metrics::MetricsConfig, postgres::PostgresConfig,
    smtp::SmtpConfig, web::WebConfig,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub postgres: PostgresConfig,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            web: WebConfig::default(),
            postgres: PostgresConfig::default(),
            smtp: SmtpConfig::default(),
            dispatch: DispatchConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            classnotify_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(classnotify_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }
}

#[inline]
pub fn load_server_config(
    Config { web, postgres, smtp, dispatch, metrics, .. }: Config,
) -> Result<classnotify_core::config::Config, Error> {
    Ok(classnotify_core::config::Config {
        web: web.into(),
        postgres: postgres.into(),
        smtp: smtp.into(),
        dispatch: dispatch.into(),
        metrics: metrics.into(),
    })
}
