use serde::Serialize;
use uuid::Uuid;

use super::EventType;
use model::Snowflake;

/// An outbound frame. Every frame carries a fresh nonce; responses are not
/// correlated by it.
#[derive(Serialize, Debug)]
pub struct Frame<C, A> {
    pub cmd: C,
    pub args: A,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evt: Option<EventType>,
    pub nonce: String,
}

impl<C: Serialize, A: Serialize> Frame<C, A> {
    pub fn new(cmd: C, evt: Option<EventType>, args: A) -> Self {
        Self {
            cmd,
            args,
            evt,
            nonce: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct NoArgs {}

#[derive(Serialize, Debug)]
pub struct AuthenticateArgs<'a> {
    pub access_token: &'a str,
}

#[derive(Serialize, Debug)]
pub struct AuthorizeArgs<'a> {
    pub client_id: &'a str,
    pub scopes: &'a [&'a str],
    pub prompt: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ChannelArgs<'a> {
    pub channel_id: &'a Snowflake,
}
