use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Disconnected,
    AwaitingReady,
    Authenticating,
    AwaitingUserAuthorization,
    ExchangingCode,
    /// The code couldn't be traded for a token. Nothing happens until the
    /// next connection.
    ExchangeFailed,
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the connection has to send next.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthStep {
    Authenticate(String),
    Authorize,
    ExchangeCode(String),
    None,
}

/// Tracks how far the handshake has got on the current connection.
#[derive(Debug)]
pub struct AuthMachine {
    state: AuthState,
}

impl AuthMachine {
    pub fn new() -> Self {
        Self {
            state: AuthState::Disconnected,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn on_connected(&mut self) {
        self.transition(AuthState::AwaitingReady);
    }

    pub fn on_disconnected(&mut self) {
        self.transition(AuthState::Disconnected);
    }

    /// A stored token is tried first; without one the user has to approve
    /// the client.
    pub fn on_ready(&mut self, stored_token: Option<String>) -> AuthStep {
        match stored_token {
            Some(token) => {
                self.transition(AuthState::Authenticating);
                AuthStep::Authenticate(token)
            }
            None => {
                self.transition(AuthState::AwaitingUserAuthorization);
                AuthStep::Authorize
            }
        }
    }

    pub fn on_authenticated(&mut self) {
        self.transition(AuthState::Authenticated);
    }

    pub fn on_authenticate_failed(&mut self) -> AuthStep {
        self.transition(AuthState::AwaitingUserAuthorization);
        AuthStep::Authorize
    }

    pub fn on_authorized(&mut self, code: String) -> AuthStep {
        self.transition(AuthState::ExchangingCode);
        AuthStep::ExchangeCode(code)
    }

    /// An exchange that finishes after the connection moved on is not acted
    /// upon.
    pub fn on_token_exchanged(&mut self, token: String) -> AuthStep {
        if self.state != AuthState::ExchangingCode {
            debug!(state = %self.state, "Discarding token exchange result");
            return AuthStep::None;
        }

        self.transition(AuthState::Authenticating);
        AuthStep::Authenticate(token)
    }

    pub fn on_exchange_failed(&mut self) {
        if self.state == AuthState::ExchangingCode {
            self.transition(AuthState::ExchangeFailed);
        }
    }

    fn transition(&mut self, state: AuthState) {
        debug!(from = %self.state, to = %state, "Auth state changed");
        self.state = state;
    }
}

impl Default for AuthMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_token() {
        let mut auth = AuthMachine::new();
        auth.on_connected();
        assert_eq!(auth.state(), AuthState::AwaitingReady);

        assert_eq!(
            auth.on_ready(Some("t".to_owned())),
            AuthStep::Authenticate("t".to_owned())
        );
        assert_eq!(auth.state(), AuthState::Authenticating);

        auth.on_authenticated();
        assert_eq!(auth.state(), AuthState::Authenticated);
    }

    #[test]
    fn test_first_run() {
        let mut auth = AuthMachine::new();
        auth.on_connected();

        assert_eq!(auth.on_ready(None), AuthStep::Authorize);
        assert_eq!(
            auth.on_authorized("code".to_owned()),
            AuthStep::ExchangeCode("code".to_owned())
        );
        assert_eq!(auth.state(), AuthState::ExchangingCode);
        assert_eq!(
            auth.on_token_exchanged("t".to_owned()),
            AuthStep::Authenticate("t".to_owned())
        );
        assert_eq!(auth.state(), AuthState::Authenticating);
    }

    #[test]
    fn test_rejected_token() {
        let mut auth = AuthMachine::new();
        auth.on_connected();
        auth.on_ready(Some("stale".to_owned()));

        assert_eq!(auth.on_authenticate_failed(), AuthStep::Authorize);
        assert_eq!(auth.state(), AuthState::AwaitingUserAuthorization);
    }

    #[test]
    fn test_late_exchange_discarded() {
        let mut auth = AuthMachine::new();
        auth.on_connected();
        auth.on_ready(None);
        auth.on_authorized("code".to_owned());
        auth.on_disconnected();

        assert_eq!(auth.on_token_exchanged("t".to_owned()), AuthStep::None);
        assert_eq!(auth.state(), AuthState::Disconnected);
    }

    #[test]
    fn test_exchange_failed() {
        let mut auth = AuthMachine::new();
        auth.on_connected();
        auth.on_ready(None);
        auth.on_authorized("code".to_owned());
        auth.on_exchange_failed();

        assert_eq!(auth.state(), AuthState::ExchangeFailed);

        auth.on_disconnected();
        auth.on_exchange_failed();
        assert_eq!(auth.state(), AuthState::Disconnected);
    }
}
