use serde::{Deserialize, Serialize};

use crate::Snowflake;

/// The user object embedded in RPC payloads. Only `id` is guaranteed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PartialUser {
    pub id: Snowflake,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}
