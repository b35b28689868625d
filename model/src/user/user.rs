use serde::{Deserialize, Serialize};

use super::PresenceState;
use crate::util::replace_option_if_some;
use crate::{Snowflake, Tristate};

/// A participant of the current voice channel, as tracked by the roster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub muted: Tristate,
    #[serde(default)]
    pub deafened: Tristate,
    #[serde(default)]
    pub speaking: Tristate,
}

impl User {
    pub fn new(id: Snowflake) -> User {
        User {
            id,
            username: None,
            discriminator: None,
            display_name: None,
            muted: Tristate::Unknown,
            deafened: Tristate::Unknown,
            speaking: Tristate::Unknown,
        }
    }

    pub fn state(&self) -> PresenceState {
        PresenceState::classify(self.muted, self.deafened, self.speaking)
    }

    /// Merges `other` into `self`. Fields that `other` doesn't know about keep
    /// their current value.
    pub fn update(&mut self, other: User) {
        replace_option_if_some(&mut self.username, other.username);
        replace_option_if_some(&mut self.discriminator, other.discriminator);
        replace_option_if_some(&mut self.display_name, other.display_name);
        self.muted.merge(other.muted);
        self.deafened.merge(other.deafened);
        self.speaking.merge(other.speaking);
    }

    /// `username#discriminator`, or just the username for accounts on the
    /// discriminator-less naming scheme.
    pub fn tag(&self) -> Option<String> {
        let username = self.username.as_deref()?;

        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => Some(format!("{}#{}", username, d)),
            _ => Some(username.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User::new(Snowflake::from(id))
    }

    #[test]
    fn test_update_keeps_known_fields() {
        let mut existing = User {
            username: Some("ash".to_owned()),
            muted: Tristate::True,
            ..user("1")
        };

        existing.update(User {
            display_name: Some("Ash".to_owned()),
            deafened: Tristate::False,
            ..user("1")
        });

        assert_eq!(existing.username.as_deref(), Some("ash"));
        assert_eq!(existing.display_name.as_deref(), Some("Ash"));
        assert_eq!(existing.muted, Tristate::True);
        assert_eq!(existing.deafened, Tristate::False);
        assert_eq!(existing.speaking, Tristate::Unknown);
    }

    #[test]
    fn test_update_is_left_fold() {
        let updates = vec![
            User { muted: Tristate::True, ..user("1") },
            User { username: Some("a".to_owned()), ..user("1") },
            User { muted: Tristate::False, speaking: Tristate::True, ..user("1") },
            user("1"),
            User { username: Some("b".to_owned()), ..user("1") },
        ];

        let mut folded = user("1");
        for u in updates {
            folded.update(u);
        }

        assert_eq!(folded.username.as_deref(), Some("b"));
        assert_eq!(folded.muted, Tristate::False);
        assert_eq!(folded.speaking, Tristate::True);
        assert_eq!(folded.deafened, Tristate::Unknown);
    }

    #[test]
    fn test_tag() {
        let mut u = User {
            username: Some("ash".to_owned()),
            discriminator: Some("6256".to_owned()),
            ..user("1")
        };
        assert_eq!(u.tag().as_deref(), Some("ash#6256"));

        u.discriminator = Some("0".to_owned());
        assert_eq!(u.tag().as_deref(), Some("ash"));

        assert_eq!(user("2").tag(), None);
    }
}
