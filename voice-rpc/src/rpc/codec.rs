use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

use super::payloads::{Command, Envelope, EventType, Frame};
use crate::{Result, RpcError};

const REDACTED: &str = "[token]";

pub fn encode<A: Serialize>(cmd: Command, evt: Option<EventType>, args: A) -> Result<String> {
    serde_json::to_string(&Frame::new(cmd, evt, args)).map_err(RpcError::JsonError)
}

/// Wraps caller-supplied `args` in a frame for an arbitrary command. Empty
/// input means no arguments.
pub fn encode_raw(cmd: &str, args: &str) -> Result<String> {
    let args = if args.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        match serde_json::from_str(args).map_err(RpcError::InvalidArgs)? {
            value @ Value::Object(_) => value,
            _ => return RpcError::custom("command arguments must be a JSON object").into(),
        }
    };

    serde_json::to_string(&Frame::new(cmd, None, args)).map_err(RpcError::JsonError)
}

pub fn decode(frame: &str) -> Result<Envelope> {
    serde_json::from_str(frame).map_err(RpcError::MalformedMessage)
}

pub fn redact<'a>(frame: &'a str, token: Option<&str>) -> Cow<'a, str> {
    match token {
        Some(token) if !token.is_empty() && frame.contains(token) => {
            Cow::Owned(frame.replace(token, REDACTED))
        }
        _ => Cow::Borrowed(frame),
    }
}
