pub mod config;

use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    sync::LazyLock,
};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PROJECT_NAME: &str = "classnotify";

pub const PROGRAM_NAME: &str = "classnotify";
pub const CONFIG_NAME: &str = "classnotify.yaml";

pub const DEFAULT_WEB_PORT: u16 = 15080;
pub const DEFAULT_WEB_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

pub const DEFAULT_METRICS_PORT: u16 = 15082;
pub const DEFAULT_METRICS_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Largest local object admitted as an inline attachment.
pub const MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

pub static PROJECT_CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME)
        .expect("Creating `ProjectDirs` should always success")
        .config_dir()
        .to_path_buf()
});

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub version: String,
    pub branch: String,
    pub commit_hash: String,
    pub sender: String,
    pub smtp_host: String,
    pub start_time: DateTime<Utc>,
}
