use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `cmd` field of a frame. Commands the client doesn't use are kept
/// verbatim in `Other` so they can still be logged and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch,
    Authorize,
    Authenticate,
    GetSelectedVoiceChannel,
    Subscribe,
    Unsubscribe,
    Other(String),
}

impl Command {
    pub fn parse(value: &str) -> Command {
        match value {
            "DISPATCH" => Command::Dispatch,
            "AUTHORIZE" => Command::Authorize,
            "AUTHENTICATE" => Command::Authenticate,
            "GET_SELECTED_VOICE_CHANNEL" => Command::GetSelectedVoiceChannel,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            other => Command::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Command::Dispatch => "DISPATCH",
            Command::Authorize => "AUTHORIZE",
            Command::Authenticate => "AUTHENTICATE",
            Command::GetSelectedVoiceChannel => "GET_SELECTED_VOICE_CHANNEL",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Other(other) => other,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Command::parse(&value))
    }
}
