use serde::{Deserialize, Serialize};

use crate::Tristate;

/// Mute and deafen flags of one participant.
///
/// Which of these the client fills in depends on the context it is reporting
/// from, so callers should read [`VoiceState::muted`] and
/// [`VoiceState::deafened`] rather than individual flags.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct VoiceState {
    #[serde(default)]
    pub self_mute: Tristate,
    #[serde(default)]
    pub mute: Tristate,
    #[serde(default)]
    pub suppress: Tristate,
    #[serde(default)]
    pub self_deaf: Tristate,
    #[serde(default)]
    pub deaf: Tristate,
}

impl VoiceState {
    /// First present of self-mute, server mute, suppression.
    pub fn muted(&self) -> Tristate {
        self.self_mute.or(self.mute).or(self.suppress)
    }

    /// First present of self-deafen, server deafen.
    pub fn deafened(&self) -> Tristate {
        self.self_deaf.or(self.deaf)
    }
}
