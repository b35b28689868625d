use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::Tristate;

/// At-a-glance classification of a user's voice activity.
///
/// The numeric values are part of the interface exposed to other plugins and
/// must not be reordered. They do not reflect priority.
#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[repr(u8)]
pub enum PresenceState {
    #[default]
    None = 0,
    Speaking = 1,
    Muted = 2,
    Deafened = 3,
}

impl PresenceState {
    /// Deafened beats speaking beats muted. Only a known `true` promotes.
    pub fn classify(muted: Tristate, deafened: Tristate, speaking: Tristate) -> PresenceState {
        if deafened.is_true() {
            PresenceState::Deafened
        } else if speaking.is_true() {
            PresenceState::Speaking
        } else if muted.is_true() {
            PresenceState::Muted
        } else {
            PresenceState::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Tristate::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(PresenceState::classify(Unknown, True, True), PresenceState::Deafened);
        assert_eq!(PresenceState::classify(True, Unknown, True), PresenceState::Speaking);
        assert_eq!(PresenceState::classify(True, False, False), PresenceState::Muted);
        assert_eq!(PresenceState::classify(Unknown, Unknown, Unknown), PresenceState::None);
        assert_eq!(PresenceState::classify(False, False, False), PresenceState::None);
    }

    #[test]
    fn test_convert() {
        assert_eq!(serde_json::from_str::<PresenceState>("3").unwrap(), PresenceState::Deafened);
        assert!(serde_json::from_str::<PresenceState>("4").is_err());
        assert_eq!(serde_json::to_string(&PresenceState::Muted).unwrap(), "2");
    }
}
