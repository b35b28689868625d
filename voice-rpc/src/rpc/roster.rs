use std::collections::HashMap;

use crate::{Result, RpcError};
use model::channel::Channel;
use model::user::User;
use model::{Snowflake, Tristate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Create,
    Update,
}

/// The users in the local user's current voice channel.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    channel: Option<Channel>,
    users: HashMap<Snowflake, User>,
    self_id: Option<Snowflake>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn users(&self) -> &HashMap<Snowflake, User> {
        &self.users
    }

    pub fn get(&self, id: &Snowflake) -> Option<&User> {
        self.users.get(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn self_id(&self) -> Option<&Snowflake> {
        self.self_id.as_ref()
    }

    pub fn self_user(&self) -> Option<&User> {
        self.self_id.as_ref().and_then(|id| self.users.get(id))
    }

    pub fn set_self_id(&mut self, id: Option<Snowflake>) {
        self.self_id = id;
    }

    /// Users are dropped whenever the channel changes or goes away.
    pub fn set_channel(&mut self, channel: Option<Channel>) {
        if channel.is_none() || self.channel != channel {
            self.users.clear();
        }

        self.channel = channel;
    }

    /// Replaces the roster with a full snapshot of `channel`.
    pub fn apply_snapshot<I>(&mut self, channel: Option<Channel>, users: I)
    where
        I: IntoIterator<Item = User>,
    {
        self.users.clear();

        if channel.is_some() {
            self.users
                .extend(users.into_iter().map(|user| (user.id.clone(), user)));
        }

        self.channel = channel;
    }

    /// Returns true when this was the local user joining, which means the
    /// roster needs a fresh snapshot.
    pub fn upsert(&mut self, user: User, kind: UpsertKind) -> bool {
        let is_self = self.is_self(&user.id);

        match self.users.get_mut(&user.id) {
            Some(existing) => existing.update(user),
            None => {
                self.users.insert(user.id.clone(), user);
            }
        }

        is_self && kind == UpsertKind::Create
    }

    /// Returns true when the local user left, in which case every user is
    /// dropped.
    pub fn remove(&mut self, id: &Snowflake) -> bool {
        if self.is_self(id) {
            self.users.clear();
            return true;
        }

        self.users.remove(id);
        false
    }

    pub fn set_speaking(&mut self, id: &Snowflake, speaking: bool) -> Result<()> {
        match self.users.get_mut(id) {
            Some(user) => {
                user.speaking = Tristate::from(speaking);
                Ok(())
            }
            None => RpcError::UnknownUser(id.clone()).into(),
        }
    }

    pub fn clear(&mut self) {
        self.users.clear();
    }

    /// Drops everything tied to the connection.
    pub fn reset(&mut self) {
        self.users.clear();
        self.channel = None;
        self.self_id = None;
    }

    fn is_self(&self, id: &Snowflake) -> bool {
        self.self_id.as_ref() == Some(id)
    }
}
