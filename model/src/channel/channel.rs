use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Snowflake;

/// The voice channel the local user is connected to. Channels outside of a
/// guild (group DMs) have no `guild_id`.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Channel {
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
}

impl Channel {
    pub fn new(guild_id: Option<Snowflake>, channel_id: Snowflake) -> Channel {
        Channel {
            guild_id,
            channel_id,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.guild_id {
            Some(guild_id) => write!(f, "{}/{}", guild_id, self.channel_id),
            None => write!(f, "@me/{}", self.channel_id),
        }
    }
}
