use serde::Serialize;
use std::convert::TryFrom;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

use super::auth::{AuthMachine, AuthStep};
use super::codec;
use super::handle::Shared;
use super::options::{API_VERSION, CLIENT_ID, SCOPES};
use super::payloads::event::{Authenticated, ErrorData, Ready};
use super::payloads::{
    AuthenticateArgs, AuthorizeArgs, ChannelArgs, Command, EventType, Inbound, NoArgs,
};
use super::roster::UpsertKind;
use super::subscriptions::{Subscription, SubscriptionManager};
use super::DisconnectInfo;
use crate::notify::{Advisory, UNSUPPORTED_CLIENT};
use crate::store::CredentialStore;
use crate::{Result, RpcError};
use model::channel::{Channel, SelectedChannel};
use model::voice::VoiceStateRecord;
use model::Snowflake;

/// Side effects the connection loop carries out for the dispatcher.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    Send(String),
    ExchangeCode(String),
    Advise(Advisory),
}

/// Turns transport events into state changes and outbound commands. Runs on
/// the dispatch loop only, so it never sees two messages at once.
pub(crate) struct Dispatcher {
    auth: AuthMachine,
    subscriptions: SubscriptionManager,
    shared: Arc<Shared>,
    store: Arc<dyn CredentialStore>,
    // Set when the server turned out to be a client we can't talk to
    suppressed: bool,
    advised: bool,
    effects: Vec<Effect>,
}

impl Dispatcher {
    pub fn new(shared: Arc<Shared>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            auth: AuthMachine::new(),
            subscriptions: SubscriptionManager::new(),
            shared,
            store,
            suppressed: false,
            advised: false,
            effects: Vec::new(),
        }
    }

    pub fn on_connected(&mut self) -> Vec<Effect> {
        info!("Connected to RPC server");

        self.suppressed = false;
        self.shared.connected.store(true, Ordering::Release);
        self.auth.on_connected();

        self.finish()
    }

    pub fn on_disconnected(&mut self, info: &DisconnectInfo) -> Vec<Effect> {
        if info.is_expected() {
            debug!(%info, "Disconnected from RPC server");
        } else {
            warn!(
                kind = ?info.kind,
                close_code = ?info.close_code,
                description = ?info.description,
                error = ?info.error,
                "Disconnected from RPC server"
            );
        }

        self.reset();
        self.finish()
    }

    /// Called once the loop has stopped for good.
    pub fn on_shutdown(&mut self) {
        self.reset();
        self.finish();
    }

    pub fn on_frame(&mut self, raw: &str) -> Vec<Effect> {
        let envelope = match codec::decode(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Dropping message");
                return self.finish();
            }
        };

        if !envelope.is_speaking() {
            let token = self.store.access_token();
            debug!(message = %codec::redact(raw, token.as_deref()), "Received message");
        }

        if self.suppressed {
            return self.finish();
        }

        match Inbound::try_from(envelope) {
            Ok(inbound) => self.handle(inbound),
            Err(e) => warn!(error = %e, "Dropping message"),
        }

        self.finish()
    }

    pub fn on_token_exchanged(&mut self, result: Result<String>) -> Vec<Effect> {
        match result {
            Ok(token) => {
                // Persisted even when the connection has moved on
                self.persist_token(Some(token.clone()));
                let step = self.auth.on_token_exchanged(token);
                self.apply(step);
            }
            Err(e) => {
                error!(error = %e, "Could not obtain an access token");
                self.auth.on_exchange_failed();
            }
        }

        self.finish()
    }

    pub fn on_raw(&mut self, frame: String) -> Vec<Effect> {
        if self.suppressed {
            warn!("Not sending command to an unsupported client");
        } else {
            self.effects.push(Effect::Send(frame));
        }

        self.finish()
    }

    fn handle(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Ready(ready) => self.on_ready(ready),

            Inbound::Authenticated(data) => self.on_authenticated(data),
            Inbound::AuthenticateFailed(err) => self.on_authenticate_failed(err),
            Inbound::Authorized(data) => {
                let step = self.auth.on_authorized(data.code);
                self.apply(step);
            }
            Inbound::AuthorizeFailed(err) => {
                warn!(error = %err.describe(), "Authorization was not granted");
            }

            Inbound::VoiceChannelSelect(select) => self.on_channel_select(select.channel()),
            Inbound::SelectedVoiceChannel(selected) => self.on_selected_channel(selected),

            Inbound::VoiceStateCreate(record) => self.on_voice_state(record, UpsertKind::Create),
            Inbound::VoiceStateUpdate(record) => self.on_voice_state(record, UpsertKind::Update),
            Inbound::VoiceStateDelete(record) => self.on_voice_state_delete(&record.user.id),

            Inbound::SpeakingStart(speaking) => self.on_speaking(&speaking.user_id, true),
            Inbound::SpeakingStop(speaking) => self.on_speaking(&speaking.user_id, false),

            Inbound::CommandFailed { cmd, error } => {
                warn!(%cmd, error = %error.describe(), "Command failed");
            }
            Inbound::Ignored { cmd, evt } => {
                trace!(%cmd, evt = ?evt, "Ignoring message");
            }
        }
    }

    fn on_ready(&mut self, ready: Ready) {
        if ready.version != Some(API_VERSION) {
            warn!(version = ?ready.version, expected = API_VERSION, "Unexpected API version");
        }

        if ready.is_impostor() {
            warn!("Connected to an unsupported RPC server, ignoring it");
            self.suppressed = true;

            if !self.advised {
                self.advised = true;
                self.effects.push(Effect::Advise(UNSUPPORTED_CLIENT));
            }

            return;
        }

        let token = self.store.access_token().filter(|token| !token.is_empty());
        let step = self.auth.on_ready(token);
        self.apply(step);
    }

    fn on_authenticated(&mut self, data: Authenticated) {
        let user = data.user;
        info!(
            user_id = %user.id,
            username = ?user.username,
            "Authenticated"
        );

        self.shared.roster.write().set_self_id(Some(user.id));
        self.auth.on_authenticated();

        self.send(Command::Subscribe, Some(EventType::VoiceChannelSelect), NoArgs {});
        self.request_selected_channel();
    }

    fn on_authenticate_failed(&mut self, err: ErrorData) {
        let e = RpcError::AuthRejected(err.describe());
        warn!(error = %e, "Stored access token is no longer valid");

        self.persist_token(None);
        self.shared.roster.write().clear();

        let step = self.auth.on_authenticate_failed();
        self.apply(step);
    }

    fn on_channel_select(&mut self, channel: Option<Channel>) {
        match &channel {
            Some(channel) => info!(%channel, "Voice channel selected"),
            None => info!("Left voice"),
        }

        self.move_subscriptions(channel.clone());
        self.shared.roster.write().set_channel(channel);
    }

    fn on_selected_channel(&mut self, selected: Option<SelectedChannel>) {
        let (channel, records) = match selected {
            Some(selected) => {
                debug!(
                    name = ?selected.name,
                    members = selected.voice_states.len(),
                    "Fetched selected voice channel"
                );
                (selected.channel(), selected.voice_states)
            }
            None => (None, Vec::new()),
        };

        self.move_subscriptions(channel.clone());
        self.shared.roster.write().apply_snapshot(
            channel,
            records.into_iter().map(VoiceStateRecord::into_user),
        );
    }

    fn on_voice_state(&mut self, record: VoiceStateRecord, kind: UpsertKind) {
        let joined = self.shared.roster.write().upsert(record.into_user(), kind);

        if joined {
            debug!("Joined a voice channel, fetching roster");
            self.request_selected_channel();
        }
    }

    fn on_voice_state_delete(&mut self, id: &Snowflake) {
        let left = self.shared.roster.write().remove(id);

        if left {
            debug!("Left the voice channel, fetching roster");
            self.request_selected_channel();
        }
    }

    fn on_speaking(&mut self, id: &Snowflake, speaking: bool) {
        if let Err(e) = self.shared.roster.write().set_speaking(id, speaking) {
            warn!(error = %e, speaking, "Speaking update for unknown user");
        }
    }

    fn apply(&mut self, step: AuthStep) {
        match step {
            AuthStep::Authenticate(token) => self.send(
                Command::Authenticate,
                None,
                AuthenticateArgs {
                    access_token: &token,
                },
            ),
            AuthStep::Authorize => self.send(
                Command::Authorize,
                None,
                AuthorizeArgs {
                    client_id: CLIENT_ID,
                    scopes: &SCOPES,
                    prompt: "none",
                },
            ),
            AuthStep::ExchangeCode(code) => self.effects.push(Effect::ExchangeCode(code)),
            AuthStep::None => {}
        }
    }

    fn move_subscriptions(&mut self, channel: Option<Channel>) {
        for Subscription {
            cmd,
            evt,
            channel_id,
        } in self.subscriptions.set_channel(channel)
        {
            self.send(
                cmd,
                Some(evt),
                ChannelArgs {
                    channel_id: &channel_id,
                },
            );
        }
    }

    fn request_selected_channel(&mut self) {
        self.send(Command::GetSelectedVoiceChannel, None, NoArgs {});
    }

    fn send<A: Serialize>(&mut self, cmd: Command, evt: Option<EventType>, args: A) {
        match codec::encode(cmd, evt, args) {
            Ok(frame) => self.effects.push(Effect::Send(frame)),
            Err(e) => error!(error = %e, "Failed to encode command"),
        }
    }

    fn persist_token(&self, token: Option<String>) {
        if let Err(e) = self.store.set_access_token(token) {
            error!(error = %e, "Failed to save access token");
        }
    }

    fn reset(&mut self) {
        self.shared.connected.store(false, Ordering::Release);
        self.auth.on_disconnected();
        self.subscriptions.reset();
        self.shared.roster.write().reset();
        self.suppressed = false;
    }

    fn finish(&mut self) -> Vec<Effect> {
        *self.shared.auth_state.write() = self.auth.state();
        std::mem::take(&mut self.effects)
    }
}
