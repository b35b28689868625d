use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::dispatcher::{Dispatcher, Effect};
use super::handle::Shared;
use super::token_exchange::{attempt_exchange, HttpTokenExchanger, TokenExchanger};
use super::transport::{Transport, TransportEvent, WebSocketTransport};
use super::{Options, RpcHandle};
use crate::notify::Notifier;
use crate::store::CredentialStore;
use crate::Result;

/// Owns the dispatch loop of one RPC connection. Every inbound message,
/// exchange result and raw command is processed on that loop, one at a time.
pub struct RpcConnection {
    handle: RpcHandle,
    kill_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct DispatchLoop<T: Transport> {
    transport: T,
    dispatcher: Dispatcher,
    exchanger: Arc<dyn TokenExchanger>,
    notifier: Arc<dyn Notifier>,
    exchange_attempts: usize,
    exchange_retry_delay: Duration,
    exchange_tx: mpsc::Sender<Result<String>>,
    exchange_rx: mpsc::Receiver<Result<String>>,
    exchange_task: Option<JoinHandle<()>>,
    raw_rx: mpsc::UnboundedReceiver<String>,
    kill_rx: oneshot::Receiver<()>,
}

impl RpcConnection {
    /// Connects to the local client on `options.port` and exchanges codes
    /// with the Streamkit endpoint.
    pub fn connect(
        options: &Options,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let transport = WebSocketTransport::connect(options)?;
        let exchanger = Arc::new(HttpTokenExchanger::streamkit()?);

        Ok(Self::start(transport, options, store, exchanger, notifier))
    }

    pub fn start<T: Transport>(
        transport: T,
        options: &Options,
        store: Arc<dyn CredentialStore>,
        exchanger: Arc<dyn TokenExchanger>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let shared = Arc::new(Shared::new());
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (exchange_tx, exchange_rx) = mpsc::channel(1);
        let (kill_tx, kill_rx) = oneshot::channel();

        let dispatch_loop = DispatchLoop {
            transport,
            dispatcher: Dispatcher::new(Arc::clone(&shared), store),
            exchanger,
            notifier,
            exchange_attempts: options.exchange_attempts,
            exchange_retry_delay: options.exchange_retry_delay,
            exchange_tx,
            exchange_rx,
            exchange_task: None,
            raw_rx,
            kill_rx,
        };

        let task = tokio::spawn(dispatch_loop.run());

        Self {
            handle: RpcHandle::new(shared, raw_tx),
            kill_tx: Mutex::new(Some(kill_tx)),
            task: Mutex::new(Some(task)),
        }
    }

    pub fn handle(&self) -> RpcHandle {
        self.handle.clone()
    }

    /// Stops the loop and closes the transport. Safe to call more than once.
    pub async fn shutdown(&self) {
        let kill_tx = self.kill_tx.lock().take();
        if let Some(kill_tx) = kill_tx {
            let _ = kill_tx.send(());
        }

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Dispatch loop ended abnormally");
            }
        }
    }
}

impl std::ops::Deref for RpcConnection {
    type Target = RpcHandle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl Drop for RpcConnection {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

impl<T: Transport> DispatchLoop<T> {
    async fn run(mut self) {
        loop {
            let effects = tokio::select! {
                _ = &mut self.kill_rx => {
                    debug!("Received kill message");
                    break;
                }

                event = self.transport.recv() => match event {
                    Some(TransportEvent::Connected) => self.dispatcher.on_connected(),
                    Some(TransportEvent::Frame(frame)) => self.dispatcher.on_frame(&frame),
                    Some(TransportEvent::Disconnected(info)) => self.dispatcher.on_disconnected(&info),
                    None => {
                        debug!("Transport stopped");
                        break;
                    }
                },

                Some(result) = self.exchange_rx.recv() => self.dispatcher.on_token_exchanged(result),

                Some(frame) = self.raw_rx.recv() => self.dispatcher.on_raw(frame),
            };

            self.apply(effects);
        }

        if let Some(task) = self.exchange_task.take() {
            task.abort();
        }

        self.dispatcher.on_shutdown();
        self.transport.shutdown().await;
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send(frame) => {
                    if let Err(e) = self.transport.send(frame) {
                        warn!(error = %e, "Failed to queue message");
                    }
                }
                Effect::ExchangeCode(code) => self.spawn_exchange(code),
                Effect::Advise(advisory) => self.notifier.advise(&advisory),
            }
        }
    }

    fn spawn_exchange(&mut self, code: String) {
        let exchanger = Arc::clone(&self.exchanger);
        let tx = self.exchange_tx.clone();
        let attempts = self.exchange_attempts;
        let delay = self.exchange_retry_delay;

        let task = tokio::spawn(async move {
            let result = attempt_exchange(exchanger.as_ref(), &code, attempts, delay).await;
            let _ = tx.send(result).await;
        });

        // Only the newest code is worth exchanging
        if let Some(previous) = self.exchange_task.replace(task) {
            previous.abort();
        }
    }
}
