use crate::config::Config;
use crate::Result;
use std::time::Duration;
use url::Url;

pub const CLIENT_ID: &str = "207646673902501888";
pub const ORIGIN: &str = "https://streamkit.discord.com";
pub const TOKEN_EXCHANGE_URL: &str = "https://streamkit.discord.com/overlay/token";
pub const SCOPES: [&str; 3] = ["rpc", "messages.read", "rpc.notifications.read"];

pub const DEFAULT_PORT: u16 = 6463;
pub const API_VERSION: u32 = 1;

// Identity reported in READY by arRPC, which doesn't implement voice
pub const IMPOSTOR_USER_ID: &str = "1045800378228281345";
pub const IMPOSTOR_USERNAME: &str = "arRPC";

#[derive(Debug, Clone)]
pub struct Options {
    pub port: u16,
    pub idle_timeout: Option<Duration>,
    pub reconnect_max_interval: Duration,
    pub exchange_attempts: usize,
    pub exchange_retry_delay: Duration,
}

impl Options {
    pub fn endpoint(&self) -> Result<Url> {
        Url::parse(&format!(
            "ws://127.0.0.1:{}/?v={}&client_id={}",
            self.port, API_VERSION, CLIENT_ID
        ))
        .map_err(Into::into)
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            port: DEFAULT_PORT,
            idle_timeout: None,
            reconnect_max_interval: Duration::from_secs(30),
            exchange_attempts: 3,
            exchange_retry_delay: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        Options {
            port: config.port,
            idle_timeout: config.idle_timeout_secs.map(Duration::from_secs),
            reconnect_max_interval: Duration::from_secs(config.reconnect_max_interval_secs),
            ..Options::default()
        }
    }
}
