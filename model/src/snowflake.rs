use super::util;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque identifier assigned by the voice client.
///
/// The RPC server sends ids as strings, but older builds have been seen
/// sending bare integers, so both are accepted. The value is never parsed.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Snowflake(pub String);

impl Snowflake {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Value = Deserialize::deserialize(deserializer)?;

        if let Some(i) = value.as_u64() {
            return Ok(Snowflake(i.to_string()));
        }

        if let Value::String(s) = value {
            return Ok(Snowflake(s));
        }

        Err(Error::invalid_type(
            util::to_unexpected(&value),
            &"a string or u64",
        ))
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Snowflake(s.to_owned()))
    }
}

impl From<&str> for Snowflake {
    fn from(s: &str) -> Self {
        Snowflake(s.to_owned())
    }
}

impl From<String> for Snowflake {
    fn from(s: String) -> Self {
        Snowflake(s)
    }
}

impl From<u64> for Snowflake {
    fn from(x: u64) -> Self {
        Snowflake(x.to_string())
    }
}
