use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};
use url::Url;

use super::{Transport, TransportEvent};
use crate::rpc::options::{Options, ORIGIN as ORIGIN_VALUE};
use crate::rpc::{DisconnectInfo, DisconnectKind};
use crate::{Result, RpcError};

type WebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_BUFFER: usize = 64;
const INITIAL_RECONNECT_INTERVAL: Duration = Duration::from_secs(1);
// Stands in for "no idle timeout"
const IDLE_FOREVER: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Connects to the local RPC server over WebSocket and keeps reconnecting
/// with exponential backoff until shut down.
pub struct WebSocketTransport {
    events_rx: mpsc::Receiver<TransportEvent>,
    writer_tx: mpsc::UnboundedSender<String>,
    kill_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

struct Session<'a> {
    events_tx: &'a mpsc::Sender<TransportEvent>,
    writer_rx: &'a mut mpsc::UnboundedReceiver<String>,
    kill_rx: &'a mut oneshot::Receiver<()>,
    idle_timeout: Option<Duration>,
}

impl WebSocketTransport {
    pub fn connect(options: &Options) -> Result<Self> {
        let url = options.endpoint()?;

        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (writer_tx, writer_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = oneshot::channel();

        let backoff = ExponentialBackoff {
            initial_interval: INITIAL_RECONNECT_INTERVAL,
            current_interval: INITIAL_RECONNECT_INTERVAL,
            max_interval: options.reconnect_max_interval.max(INITIAL_RECONNECT_INTERVAL),
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        };

        let task = tokio::spawn(run(
            url,
            options.idle_timeout,
            backoff,
            events_tx,
            writer_rx,
            kill_rx,
        ));

        Ok(Self {
            events_rx,
            writer_tx,
            kill_tx: Some(kill_tx),
            task: Some(task),
        })
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn recv(&mut self) -> Option<TransportEvent> {
        self.events_rx.recv().await
    }

    fn send(&self, frame: String) -> Result<()> {
        self.writer_tx.send(frame).map_err(|_| RpcError::NotRunning)
    }

    async fn shutdown(&mut self) {
        if let Some(kill_tx) = self.kill_tx.take() {
            let _ = kill_tx.send(());
        }

        // Unblocks the task if it is waiting on a full event buffer
        self.events_rx.close();

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!(error = %e, "WebSocket task ended abnormally");
            }
        }
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    url: Url,
    idle_timeout: Option<Duration>,
    mut backoff: ExponentialBackoff,
    events_tx: mpsc::Sender<TransportEvent>,
    mut writer_rx: mpsc::UnboundedReceiver<String>,
    mut kill_rx: oneshot::Receiver<()>,
) {
    loop {
        let info = tokio::select! {
            _ = &mut kill_rx => break,
            res = open(&url) => match res {
                Ok(ws) => {
                    backoff.reset();

                    // Anything queued belongs to a previous connection
                    while writer_rx.try_recv().is_ok() {}

                    if events_tx.send(TransportEvent::Connected).await.is_err() {
                        break;
                    }

                    let session = Session {
                        events_tx: &events_tx,
                        writer_rx: &mut writer_rx,
                        kill_rx: &mut kill_rx,
                        idle_timeout,
                    };
                    session.run(ws).await
                }
                Err(e) => DisconnectInfo::from_error(&e),
            }
        };

        let shutdown = info.kind == DisconnectKind::Shutdown;
        if events_tx.send(TransportEvent::Disconnected(info)).await.is_err() || shutdown {
            break;
        }

        let delay = backoff
            .next_backoff()
            .unwrap_or(backoff.max_interval);
        trace!(?delay, "Waiting before reconnecting");

        tokio::select! {
            _ = &mut kill_rx => break,
            _ = sleep(delay) => {}
        }
    }
}

async fn open(url: &Url) -> std::result::Result<WebSocket, tokio_tungstenite::tungstenite::Error> {
    let mut request = url.as_str().into_client_request()?;
    request
        .headers_mut()
        .insert(ORIGIN, HeaderValue::from_static(ORIGIN_VALUE));

    let (ws, _) = connect_async(request).await?;
    Ok(ws)
}

impl Session<'_> {
    async fn run(mut self, ws: WebSocket) -> DisconnectInfo {
        let (mut ws_tx, mut ws_rx) = ws.split();

        let idle_after = self.idle_timeout.unwrap_or(IDLE_FOREVER);
        let idle = sleep(idle_after);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                _ = &mut *self.kill_rx => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return DisconnectInfo::new(DisconnectKind::Shutdown);
                }

                frame = self.writer_rx.recv() => match frame {
                    Some(frame) => {
                        if let Err(e) = ws_tx.send(Message::text(frame)).await {
                            return DisconnectInfo::from_error(&e);
                        }
                    }
                    None => return DisconnectInfo::new(DisconnectKind::Shutdown),
                },

                msg = ws_rx.next() => {
                    idle.as_mut().reset(Instant::now() + idle_after);

                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let event = TransportEvent::Frame(text.to_string());
                            if self.events_tx.send(event).await.is_err() {
                                return DisconnectInfo::new(DisconnectKind::Shutdown);
                            }
                        }
                        Some(Ok(Message::Close(frame))) => return DisconnectInfo::closed(frame),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return DisconnectInfo::from_error(&e),
                        None => return DisconnectInfo::new(DisconnectKind::Lost),
                    }
                }

                _ = &mut idle, if self.idle_timeout.is_some() => {
                    return DisconnectInfo::new(DisconnectKind::NoMessageReceived);
                }
            }
        }
    }
}
