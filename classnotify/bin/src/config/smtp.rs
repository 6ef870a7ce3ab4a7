use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay host
    #[serde(default = "SmtpConfig::default_host")]
    pub host: String,

    /// SMTP relay port
    #[serde(default = "SmtpConfig::default_port")]
    pub port: u16,

    /// Account used to authenticate against the relay
    #[serde(default = "SmtpConfig::default_username")]
    pub username: String,

    /// Password for the relay account
    #[serde(default = "SmtpConfig::default_password")]
    pub password: String,

    /// Sender address; the relay account is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Negotiate STARTTLS on a plain connection instead of implicit TLS
    #[serde(default = "SmtpConfig::default_starttls")]
    pub starttls: bool,
}

impl SmtpConfig {
    #[inline]
    pub fn default_host() -> String { "smtp.gmail.com".to_string() }

    #[inline]
    pub const fn default_port() -> u16 { 587 }

    #[inline]
    pub fn default_username() -> String { String::new() }

    #[inline]
    pub fn default_password() -> String { String::new() }

    #[inline]
    pub const fn default_starttls() -> bool { true }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            username: Self::default_username(),
            password: Self::default_password(),
            sender: None,
            starttls: Self::default_starttls(),
        }
    }
}

impl From<SmtpConfig> for classnotify_core::config::SmtpConfig {
    fn from(
        SmtpConfig { host, port, username, password, sender, starttls }: SmtpConfig,
    ) -> Self {
        Self { host, port, username, password, sender, starttls }
    }
}
