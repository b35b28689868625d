use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A boolean that may not be known yet.
///
/// The voice client omits or nulls flags it has no information about. Folding
/// those into `false` would make a muted user look unmuted after a partial
/// update, so "unknown" is carried through merges as its own value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Tristate {
    #[default]
    Unknown,
    True,
    False,
}

impl Tristate {
    pub fn is_true(self) -> bool {
        self == Tristate::True
    }

    pub fn is_known(self) -> bool {
        self != Tristate::Unknown
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            Tristate::Unknown => None,
            Tristate::True => Some(true),
            Tristate::False => Some(false),
        }
    }

    /// Returns `self` when known, otherwise `fallback`.
    pub fn or(self, fallback: Tristate) -> Tristate {
        if self.is_known() {
            self
        } else {
            fallback
        }
    }

    /// Overwrites `self` with `update` unless the update is unknown.
    pub fn merge(&mut self, update: Tristate) {
        if update.is_known() {
            *self = update;
        }
    }
}

impl From<bool> for Tristate {
    fn from(b: bool) -> Self {
        if b {
            Tristate::True
        } else {
            Tristate::False
        }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(b: Option<bool>) -> Self {
        b.map(Tristate::from).unwrap_or_default()
    }
}

impl Serialize for Tristate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tristate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Tristate::from)
    }
}
