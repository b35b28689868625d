use crate::rpc::DEFAULT_PORT;
use crate::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Host configuration, read from `VOICE_RPC_*` environment variables.
#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_credential_path")]
    pub credential_path: PathBuf,

    #[serde(default)]
    pub json_log: bool,
    #[serde(default)]
    pub debug_mode: bool,
    pub sentry_dsn: Option<String>,

    #[serde(default = "default_roster_log_interval")]
    pub roster_log_interval_secs: u64,
    #[serde(default = "default_reconnect_max_interval")]
    pub reconnect_max_interval_secs: u64,
    pub idle_timeout_secs: Option<u64>,
}

const PREFIX: &str = "VOICE_RPC_";

impl Config {
    pub fn from_env() -> Result<Self> {
        envy::prefixed(PREFIX).from_env().map_err(Into::into)
    }

    pub fn from_iter<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Self> {
        envy::prefixed(PREFIX).from_iter(vars).map_err(Into::into)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_credential_path() -> PathBuf {
    PathBuf::from("voice-rpc.json")
}

fn default_roster_log_interval() -> u64 {
    5
}

fn default_reconnect_max_interval() -> u64 {
    30
}
