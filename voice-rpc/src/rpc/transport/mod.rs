use async_trait::async_trait;

use super::DisconnectInfo;
use crate::Result;

#[derive(Debug)]
pub enum TransportEvent {
    Connected,
    Frame(String),
    Disconnected(DisconnectInfo),
}

/// A reconnecting message pipe to the RPC server.
///
/// Implementations report each connection with `Connected`, every text frame
/// with `Frame`, and every loss of connection with `Disconnected`. `recv`
/// returns `None` once the transport has stopped for good.
#[async_trait]
pub trait Transport: Send + 'static {
    async fn recv(&mut self) -> Option<TransportEvent>;

    /// Queues a frame for the current connection. Frames queued while
    /// disconnected are dropped on reconnect.
    fn send(&self, frame: String) -> Result<()>;

    async fn shutdown(&mut self);
}

mod websocket;
pub use websocket::WebSocketTransport;
