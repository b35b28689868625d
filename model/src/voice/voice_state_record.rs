use serde::{Deserialize, Serialize};

use super::VoiceState;
use crate::user::{PartialUser, User};
use crate::Tristate;

/// One member of a voice channel as the RPC server reports it, both in
/// channel snapshots and in `VOICE_STATE_*` events.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VoiceStateRecord {
    pub user: PartialUser,
    #[serde(default)]
    pub voice_state: VoiceState,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl VoiceStateRecord {
    /// Speaking is never part of a voice state, so it's left unknown.
    pub fn into_user(self) -> User {
        let muted = self.voice_state.muted();
        let deafened = self.voice_state.deafened();

        User {
            id: self.user.id,
            username: self.user.username,
            discriminator: self.user.discriminator,
            display_name: self.nick.or(self.user.global_name),
            muted,
            deafened,
            speaking: Tristate::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_nick() {
        let record: VoiceStateRecord = serde_json::from_str(
            r#"{"user": {"id": "1", "global_name": "Global"}, "nick": "Nick"}"#,
        )
        .unwrap();
        assert_eq!(record.into_user().display_name.as_deref(), Some("Nick"));

        let record: VoiceStateRecord =
            serde_json::from_str(r#"{"user": {"id": "1", "global_name": "Global"}, "nick": null}"#)
                .unwrap();
        assert_eq!(record.into_user().display_name.as_deref(), Some("Global"));
    }

    #[test]
    fn test_missing_voice_state_is_unknown() {
        let record: VoiceStateRecord = serde_json::from_str(r#"{"user": {"id": "1"}}"#).unwrap();
        let user = record.into_user();
        assert_eq!(user.muted, Tristate::Unknown);
        assert_eq!(user.deafened, Tristate::Unknown);
    }
}
