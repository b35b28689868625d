use serde::{Deserialize, Serialize};

use super::Channel;
use crate::voice::VoiceStateRecord;
use crate::{util, Snowflake};

/// Response body of `GET_SELECTED_VOICE_CHANNEL` when the local user is in a
/// channel: the channel itself plus everybody in it.
#[derive(Serialize, Deserialize, Debug)]
pub struct SelectedChannel {
    #[serde(default)]
    pub id: Option<Snowflake>,
    #[serde(default, deserialize_with = "util::double_option")]
    pub guild_id: Option<Option<Snowflake>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "util::skip_invalid")]
    pub voice_states: Vec<VoiceStateRecord>,
}

impl SelectedChannel {
    /// The channel key, present only when both the id and the (possibly null)
    /// guild id were sent.
    pub fn channel(&self) -> Option<Channel> {
        match (&self.guild_id, &self.id) {
            (Some(guild_id), Some(id)) => Some(Channel::new(guild_id.clone(), id.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tristate;

    #[test]
    fn test_decode_snapshot() {
        let json = r#"{
            "id": "123",
            "guild_id": "9",
            "name": "General",
            "voice_states": [
                {
                    "user": {"id": "u1", "username": "A", "discriminator": "0001"},
                    "voice_state": {"self_mute": false, "self_deaf": false},
                    "nick": null
                },
                {"nick": "missing user"}
            ]
        }"#;

        let selected: SelectedChannel = serde_json::from_str(json).unwrap();
        assert_eq!(selected.channel(), Some(Channel::new(Some("9".into()), "123".into())));
        assert_eq!(selected.voice_states.len(), 1);

        let user = selected.voice_states.into_iter().next().unwrap().into_user();
        assert_eq!(user.id, Snowflake::from("u1"));
        assert_eq!(user.muted, Tristate::False);
        assert_eq!(user.deafened, Tristate::False);
    }

    #[test]
    fn test_null_guild_is_direct_channel() {
        let selected: SelectedChannel =
            serde_json::from_str(r#"{"id": "5", "guild_id": null, "voice_states": []}"#).unwrap();
        assert_eq!(selected.channel(), Some(Channel::new(None, "5".into())));
    }

    #[test]
    fn test_missing_guild_field_has_no_channel() {
        let selected: SelectedChannel = serde_json::from_str(r#"{"id": "5"}"#).unwrap();
        assert_eq!(selected.channel(), None);
    }
}
