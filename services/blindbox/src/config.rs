use serde::Deserialize;

use blindbox_core::config::Config;

/// Service configuration loaded from environment variables (`DATABASE_URL`, ...).
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL, backing login codes and session bags.
    pub redis_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (e.g. "example.com").
    pub cookie_domain: String,
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Use TLS towards the SMTP relay. Port 465 means implicit TLS, anything else STARTTLS.
    #[serde(default = "default_smtp_tls")]
    pub smtp_tls: bool,
    /// `From:` address of outgoing mail.
    pub mail_from: String,
    /// TCP port to listen on (default 3110).
    #[serde(default = "default_app_port")]
    pub app_port: u16,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_tls() -> bool {
    true
}

fn default_app_port() -> u16 {
    3110
}

impl Config for AppConfig {}
