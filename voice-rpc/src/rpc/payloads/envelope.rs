use serde::Deserialize;
use serde_json::Value;

use super::{Command, EventType};

/// The outer shape shared by every inbound frame. `data` is decoded later,
/// once `cmd` and `evt` say what it should be.
#[derive(Deserialize, Debug)]
pub struct Envelope {
    pub cmd: Command,
    #[serde(default)]
    pub evt: Option<EventType>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn is_speaking(&self) -> bool {
        self.evt.map_or(false, EventType::is_speaking)
    }
}
