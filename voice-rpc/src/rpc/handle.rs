use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::{codec, AuthState, Roster};
use crate::resolver::UserResolver;
use crate::{Result, RpcError};
use model::channel::Channel;
use model::user::{PresenceState, User};
use model::Snowflake;

/// State written by the dispatch loop and read by everybody else.
#[derive(Debug)]
pub(crate) struct Shared {
    pub connected: AtomicBool,
    pub auth_state: RwLock<AuthState>,
    pub roster: RwLock<Roster>,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            auth_state: RwLock::new(AuthState::Disconnected),
            roster: RwLock::new(Roster::new()),
        }
    }
}

/// Cheap, cloneable view of a running connection. Reads never wait on the
/// network; they see the state as of the last processed message.
#[derive(Clone)]
pub struct RpcHandle {
    shared: Arc<Shared>,
    raw_tx: mpsc::UnboundedSender<String>,
}

impl RpcHandle {
    pub(crate) fn new(shared: Arc<Shared>, raw_tx: mpsc::UnboundedSender<String>) -> Self {
        Self { shared, raw_tx }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_state() == AuthState::Authenticated
    }

    pub fn auth_state(&self) -> AuthState {
        *self.shared.auth_state.read()
    }

    pub fn self_user(&self) -> Option<User> {
        self.shared.roster.read().self_user().cloned()
    }

    pub fn self_id(&self) -> Option<Snowflake> {
        self.shared.roster.read().self_id().cloned()
    }

    pub fn channel(&self) -> Option<Channel> {
        self.shared.roster.read().channel().cloned()
    }

    pub fn user(&self, id: &Snowflake) -> Option<User> {
        self.shared.roster.read().get(id).cloned()
    }

    pub fn all_users(&self) -> HashMap<Snowflake, User> {
        self.shared.roster.read().users().clone()
    }

    /// A consistent copy of the whole roster.
    pub fn roster(&self) -> Roster {
        self.shared.roster.read().clone()
    }

    /// Presence of the first user `resolver` accepts for `name`, or
    /// `PresenceState::None` when nobody matches.
    pub fn state_for_name<R: UserResolver + ?Sized>(&self, name: &str, resolver: &R) -> PresenceState {
        let roster = self.shared.roster.read();

        roster
            .users()
            .values()
            .find(|user| resolver.matches(name, user))
            .map_or(PresenceState::None, User::state)
    }

    /// Sends an arbitrary command. `args` must be a JSON object, or empty for
    /// no arguments.
    pub fn send(&self, cmd: &str, args: &str) -> Result<()> {
        let frame = codec::encode_raw(cmd, args)?;
        self.raw_tx.send(frame).map_err(|_| RpcError::NotRunning)
    }
}
