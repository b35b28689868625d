use serde::{Deserialize, Serialize};

use crate::rpc::options::{IMPOSTOR_USERNAME, IMPOSTOR_USER_ID};
use model::user::PartialUser;
use model::Snowflake;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Ready {
    #[serde(default, rename = "v")]
    pub version: Option<u32>,
    #[serde(default)]
    pub user: Option<PartialUser>,
}

impl Ready {
    /// arRPC answers the handshake as a fixed placeholder user and doesn't
    /// implement any of the voice commands.
    pub fn is_impostor(&self) -> bool {
        self.user.as_ref().map_or(false, |user| {
            user.id.as_str() == IMPOSTOR_USER_ID
                && user.username.as_deref() == Some(IMPOSTOR_USERNAME)
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Authenticated {
    pub user: PartialUser,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Authorized {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorData {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorData {
    pub fn describe(&self) -> String {
        match (self.code, self.message.as_deref()) {
            (Some(code), Some(message)) => format!("{} ({})", message, code),
            (None, Some(message)) => message.to_owned(),
            (Some(code), None) => format!("error code {}", code),
            (None, None) => "no error details".to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Speaking {
    pub user_id: Snowflake,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}
