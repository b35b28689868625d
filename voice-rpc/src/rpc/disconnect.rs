use std::fmt;
use std::io::ErrorKind;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Error as WsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectKind {
    /// Nothing arrived within the idle timeout.
    NoMessageReceived,
    /// Nothing is listening on the RPC port, i.e. the client isn't running.
    ConnectionRefused,
    /// The server sent a close frame.
    Closed,
    /// The stream ended without a close frame.
    Lost,
    Error,
    /// We closed the connection ourselves.
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectInfo {
    pub kind: DisconnectKind,
    pub close_code: Option<u16>,
    pub description: Option<String>,
    pub error: Option<String>,
}

impl DisconnectInfo {
    pub fn new(kind: DisconnectKind) -> Self {
        Self {
            kind,
            close_code: None,
            description: None,
            error: None,
        }
    }

    pub fn closed(frame: Option<CloseFrame<'_>>) -> Self {
        let mut info = Self::new(DisconnectKind::Closed);

        if let Some(frame) = frame {
            info.close_code = Some(u16::from(frame.code));
            if !frame.reason.is_empty() {
                info.description = Some(frame.reason.to_string());
            }
        }

        info
    }

    pub fn from_error(e: &WsError) -> Self {
        let kind = match e {
            WsError::Io(io) if io.kind() == ErrorKind::ConnectionRefused => {
                DisconnectKind::ConnectionRefused
            }
            WsError::ConnectionClosed | WsError::AlreadyClosed => DisconnectKind::Lost,
            _ => DisconnectKind::Error,
        };

        Self {
            error: Some(e.to_string()),
            ..Self::new(kind)
        }
    }

    /// Whether this is routine enough to not warrant a warning.
    pub fn is_expected(&self) -> bool {
        matches!(
            self.kind,
            DisconnectKind::NoMessageReceived
                | DisconnectKind::ConnectionRefused
                | DisconnectKind::Shutdown
        )
    }
}

impl fmt::Display for DisconnectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;

        if let Some(code) = self.close_code {
            write!(f, " (code {})", code)?;
        }

        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }

        if let Some(error) = &self.error {
            write!(f, ": {}", error)?;
        }

        Ok(())
    }
}
