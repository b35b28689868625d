use serde::{Deserialize, Serialize};

use super::Channel;
use crate::{util, Snowflake};

/// Data of a `VOICE_CHANNEL_SELECT` event. A null `channel_id` means the local
/// user left voice.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChannelSelect {
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    #[serde(default, deserialize_with = "util::double_option")]
    pub guild_id: Option<Option<Snowflake>>,
}

impl ChannelSelect {
    /// Present only when both fields were sent. A null guild is a private
    /// channel, a missing one is no channel at all.
    pub fn channel(&self) -> Option<Channel> {
        match (&self.guild_id, &self.channel_id) {
            (Some(guild_id), Some(channel_id)) => {
                Some(Channel::new(guild_id.clone(), channel_id.clone()))
            }
            _ => None,
        }
    }
}
