use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `evt` field of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Ready,
    Error,
    VoiceChannelSelect,
    VoiceStateCreate,
    VoiceStateUpdate,
    VoiceStateDelete,
    SpeakingStart,
    SpeakingStop,
    Unknown,
}

impl EventType {
    pub fn parse(value: &str) -> EventType {
        match value {
            "READY" => EventType::Ready,
            "ERROR" => EventType::Error,
            "VOICE_CHANNEL_SELECT" => EventType::VoiceChannelSelect,
            "VOICE_STATE_CREATE" => EventType::VoiceStateCreate,
            "VOICE_STATE_UPDATE" => EventType::VoiceStateUpdate,
            "VOICE_STATE_DELETE" => EventType::VoiceStateDelete,
            "SPEAKING_START" => EventType::SpeakingStart,
            "SPEAKING_STOP" => EventType::SpeakingStop,
            _ => EventType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Ready => "READY",
            EventType::Error => "ERROR",
            EventType::VoiceChannelSelect => "VOICE_CHANNEL_SELECT",
            EventType::VoiceStateCreate => "VOICE_STATE_CREATE",
            EventType::VoiceStateUpdate => "VOICE_STATE_UPDATE",
            EventType::VoiceStateDelete => "VOICE_STATE_DELETE",
            EventType::SpeakingStart => "SPEAKING_START",
            EventType::SpeakingStop => "SPEAKING_STOP",
            EventType::Unknown => "UNKNOWN",
        }
    }

    pub fn is_speaking(self) -> bool {
        matches!(self, EventType::SpeakingStart | EventType::SpeakingStop)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(EventType::parse(&value))
    }
}
