use serde::de::DeserializeOwned;
use serde_json::Value;
use std::convert::TryFrom;

use super::{Authenticated, Authorized, ErrorData, Ready, Speaking};
use crate::rpc::payloads::{Command, Envelope, EventType};
use crate::{Result, RpcError};
use model::channel::{ChannelSelect, SelectedChannel};
use model::voice::VoiceStateRecord;

/// Every inbound message the client acts on. Anything else decodes to
/// `Ignored`, so the handler's match stays exhaustive.
#[derive(Debug)]
pub enum Inbound {
    Ready(Ready),
    VoiceChannelSelect(ChannelSelect),
    VoiceStateCreate(VoiceStateRecord),
    VoiceStateUpdate(VoiceStateRecord),
    VoiceStateDelete(VoiceStateRecord),
    SpeakingStart(Speaking),
    SpeakingStop(Speaking),
    Authenticated(Authenticated),
    AuthenticateFailed(ErrorData),
    Authorized(Authorized),
    AuthorizeFailed(ErrorData),
    SelectedVoiceChannel(Option<SelectedChannel>),
    CommandFailed { cmd: Command, error: ErrorData },
    Ignored { cmd: Command, evt: Option<EventType> },
}

fn data<T: DeserializeOwned>(data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(RpcError::InvalidPayload)
}

fn error_data(data: Value) -> ErrorData {
    serde_json::from_value(data).unwrap_or_default()
}

impl TryFrom<Envelope> for Inbound {
    type Error = RpcError;

    fn try_from(envelope: Envelope) -> Result<Self> {
        let Envelope { cmd, evt, data: body, .. } = envelope;

        let inbound = match (cmd, evt) {
            (Command::Dispatch, Some(EventType::Ready)) => Inbound::Ready(data(body)?),
            (Command::Dispatch, Some(EventType::VoiceChannelSelect)) => {
                Inbound::VoiceChannelSelect(data(body)?)
            }
            (Command::Dispatch, Some(EventType::VoiceStateCreate)) => {
                Inbound::VoiceStateCreate(data(body)?)
            }
            (Command::Dispatch, Some(EventType::VoiceStateUpdate)) => {
                Inbound::VoiceStateUpdate(data(body)?)
            }
            (Command::Dispatch, Some(EventType::VoiceStateDelete)) => {
                Inbound::VoiceStateDelete(data(body)?)
            }
            (Command::Dispatch, Some(EventType::SpeakingStart)) => {
                Inbound::SpeakingStart(data(body)?)
            }
            (Command::Dispatch, Some(EventType::SpeakingStop)) => {
                Inbound::SpeakingStop(data(body)?)
            }

            (Command::Authenticate, Some(EventType::Error)) => {
                Inbound::AuthenticateFailed(error_data(body))
            }
            (Command::Authenticate, _) => Inbound::Authenticated(data(body)?),

            (Command::Authorize, Some(EventType::Error)) => {
                Inbound::AuthorizeFailed(error_data(body))
            }
            (Command::Authorize, _) => Inbound::Authorized(data(body)?),

            (cmd, Some(EventType::Error)) => Inbound::CommandFailed {
                cmd,
                error: error_data(body),
            },
            (Command::GetSelectedVoiceChannel, _) => Inbound::SelectedVoiceChannel(data(body)?),

            (cmd, evt) => Inbound::Ignored { cmd, evt },
        };

        Ok(inbound)
    }
}
