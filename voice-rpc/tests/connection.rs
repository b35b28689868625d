use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use model::user::{PresenceState, User};
use voice_rpc::rpc::{
    DisconnectInfo, DisconnectKind, Options, TokenExchanger, Transport, TransportEvent,
};
use voice_rpc::{
    Advisory, AuthState, CredentialStore, MemoryStore, Notifier, RpcConnection, RpcError,
    UNSUPPORTED_CLIENT,
};

struct ScriptedTransport {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    sent: mpsc::UnboundedSender<String>,
    shutdowns: Arc<AtomicUsize>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    fn send(&self, frame: String) -> voice_rpc::Result<()> {
        self.sent.send(frame).map_err(|_| RpcError::NotRunning)
    }

    async fn shutdown(&mut self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

struct StaticExchanger(Option<&'static str>);

#[async_trait]
impl TokenExchanger for StaticExchanger {
    async fn exchange(&self, _code: &str) -> voice_rpc::Result<String> {
        match self.0 {
            Some(token) => Ok(token.to_owned()),
            None => Err(RpcError::MissingAccessToken),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<Advisory>>);

impl Notifier for RecordingNotifier {
    fn advise(&self, advisory: &Advisory) {
        self.0.lock().unwrap().push(advisory.clone());
    }
}

struct Harness {
    connection: RpcConnection,
    events: mpsc::UnboundedSender<TransportEvent>,
    sent: mpsc::UnboundedReceiver<String>,
    shutdowns: Arc<AtomicUsize>,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn start(token: Option<&str>, exchanged: Option<&'static str>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let shutdowns = Arc::new(AtomicUsize::new(0));

        let transport = ScriptedTransport {
            events: events_rx,
            sent: sent_tx,
            shutdowns: Arc::clone(&shutdowns),
        };

        let options = Options {
            exchange_attempts: 1,
            exchange_retry_delay: Duration::from_millis(1),
            ..Options::default()
        };

        let store = Arc::new(MemoryStore::new(token.map(str::to_owned)));
        let notifier = Arc::new(RecordingNotifier::default());

        let connection = RpcConnection::start(
            transport,
            &options,
            store.clone(),
            Arc::new(StaticExchanger(exchanged)),
            notifier.clone(),
        );

        Self {
            connection,
            events: events_tx,
            sent: sent_rx,
            shutdowns,
            store,
            notifier,
        }
    }

    fn push(&self, event: TransportEvent) {
        self.events.send(event).unwrap();
    }

    fn frame(&self, value: Value) {
        self.push(TransportEvent::Frame(value.to_string()));
    }

    fn ready(&self, user_id: &str, username: &str) {
        self.push(TransportEvent::Connected);
        self.frame(json!({
            "cmd": "DISPATCH",
            "evt": "READY",
            "data": {"v": 1, "user": {"id": user_id, "username": username}},
            "nonce": null
        }));
    }

    fn authenticated(&self) {
        self.frame(json!({
            "cmd": "AUTHENTICATE",
            "data": {"user": {"id": "me", "username": "me"}},
            "nonce": "n"
        }));
    }

    async fn next_sent(&mut self) -> Value {
        let frame = timeout(Duration::from_secs(5), self.sent.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("transport closed");
        serde_json::from_str(&frame).unwrap()
    }

    async fn expect(&mut self, cmd: &str, evt: Option<&str>) -> Value {
        let frame = self.next_sent().await;
        assert_eq!(frame["cmd"], cmd, "unexpected frame {}", frame);
        assert_eq!(frame["evt"].as_str(), evt, "unexpected frame {}", frame);
        frame
    }

    async fn expect_nothing(&mut self) {
        sleep(Duration::from_millis(50)).await;
        assert!(self.sent.try_recv().is_err());
    }
}

async fn eventually<F: Fn() -> bool>(check: F) {
    timeout(Duration::from_secs(5), async {
        while !check() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition was never met");
}

fn voice_state(id: &str, name: &str, self_deaf: bool) -> Value {
    json!({
        "nick": name,
        "user": {"id": id, "username": name.to_lowercase(), "discriminator": "0"},
        "voice_state": {"mute": false, "deaf": false, "self_mute": false, "self_deaf": self_deaf, "suppress": false}
    })
}

const CHANNEL_EVENTS: [&str; 5] = [
    "VOICE_STATE_CREATE",
    "VOICE_STATE_UPDATE",
    "VOICE_STATE_DELETE",
    "SPEAKING_START",
    "SPEAKING_STOP",
];

#[tokio::test]
async fn test_full_session() {
    let mut h = Harness::start(Some("secret"), None);

    h.ready("100", "someone");
    let auth = h.expect("AUTHENTICATE", None).await;
    assert_eq!(auth["args"]["access_token"], "secret");

    h.authenticated();
    let sub = h.expect("SUBSCRIBE", Some("VOICE_CHANNEL_SELECT")).await;
    assert_eq!(sub["args"], json!({}));
    h.expect("GET_SELECTED_VOICE_CHANNEL", None).await;

    h.frame(json!({
        "cmd": "GET_SELECTED_VOICE_CHANNEL",
        "data": {
            "id": "c1",
            "guild_id": "g1",
            "name": "General",
            "voice_states": [voice_state("me", "Me", false), voice_state("a", "Alice", true)]
        },
        "nonce": "n"
    }));

    for evt in CHANNEL_EVENTS {
        let frame = h.expect("SUBSCRIBE", Some(evt)).await;
        assert_eq!(frame["args"]["channel_id"], "c1");
    }

    let handle = h.connection.handle();
    eventually(|| handle.all_users().len() == 2).await;

    assert!(handle.is_connected());
    assert!(handle.is_authenticated());
    assert_eq!(handle.self_user().unwrap().display_name.as_deref(), Some("Me"));
    assert_eq!(handle.channel().unwrap().to_string(), "g1/c1");

    let by_nick = |name: &str, user: &User| user.display_name.as_deref() == Some(name);
    assert_eq!(handle.state_for_name("Alice", &by_nick), PresenceState::Deafened);
    assert_eq!(handle.state_for_name("Me", &by_nick), PresenceState::None);
    assert_eq!(handle.state_for_name("Nobody", &by_nick), PresenceState::None);

    h.frame(json!({"cmd": "DISPATCH", "evt": "SPEAKING_START", "data": {"user_id": "me"}}));
    eventually(|| handle.state_for_name("Me", &by_nick) == PresenceState::Speaking).await;

    h.connection.shutdown().await;
    h.connection.shutdown().await;

    assert_eq!(h.shutdowns.load(Ordering::SeqCst), 1);
    assert!(!handle.is_connected());
    assert_eq!(handle.auth_state(), AuthState::Disconnected);
    assert!(handle.all_users().is_empty());
}

#[tokio::test]
async fn test_first_run_authorizes() {
    let mut h = Harness::start(None, Some("fresh"));

    h.ready("100", "someone");
    let authorize = h.expect("AUTHORIZE", None).await;
    assert_eq!(authorize["args"]["client_id"], "207646673902501888");

    h.frame(json!({"cmd": "AUTHORIZE", "data": {"code": "abc"}, "nonce": "n"}));
    let auth = h.expect("AUTHENTICATE", None).await;
    assert_eq!(auth["args"]["access_token"], "fresh");
    assert_eq!(h.store.access_token().as_deref(), Some("fresh"));

    h.connection.shutdown().await;
}

#[tokio::test]
async fn test_failed_exchange_stays_dormant() {
    let mut h = Harness::start(None, None);

    h.ready("100", "someone");
    h.expect("AUTHORIZE", None).await;
    h.frame(json!({"cmd": "AUTHORIZE", "data": {"code": "abc"}, "nonce": "n"}));

    let handle = h.connection.handle();
    eventually(|| handle.auth_state() == AuthState::ExchangeFailed).await;
    h.expect_nothing().await;

    h.connection.shutdown().await;
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let mut h = Harness::start(Some("stale"), None);

    h.ready("100", "someone");
    h.expect("AUTHENTICATE", None).await;

    h.frame(json!({
        "cmd": "AUTHENTICATE",
        "evt": "ERROR",
        "data": {"code": 4009, "message": "Invalid token"},
        "nonce": "n"
    }));

    h.expect("AUTHORIZE", None).await;
    assert_eq!(h.store.access_token(), None);

    h.connection.shutdown().await;
}

#[tokio::test]
async fn test_impostor_advisory_once() {
    let mut h = Harness::start(Some("secret"), None);

    h.ready("1045800378228281345", "arRPC");
    h.authenticated();
    h.expect_nothing().await;

    let handle = h.connection.handle();
    assert!(handle.send("GET_GUILDS", "").is_ok());
    h.expect_nothing().await;

    h.push(TransportEvent::Disconnected(DisconnectInfo::new(
        DisconnectKind::ConnectionRefused,
    )));
    h.ready("1045800378228281345", "arRPC");
    h.expect_nothing().await;

    assert_eq!(*h.notifier.0.lock().unwrap(), vec![UNSUPPORTED_CLIENT]);

    h.connection.shutdown().await;
}

#[tokio::test]
async fn test_reconnect_resubscribes() {
    let mut h = Harness::start(Some("secret"), None);
    let snapshot = json!({
        "cmd": "GET_SELECTED_VOICE_CHANNEL",
        "data": {"id": "c1", "guild_id": null, "voice_states": [voice_state("me", "Me", false)]}
    });

    h.ready("100", "someone");
    h.expect("AUTHENTICATE", None).await;
    h.authenticated();
    h.expect("SUBSCRIBE", Some("VOICE_CHANNEL_SELECT")).await;
    h.expect("GET_SELECTED_VOICE_CHANNEL", None).await;
    h.frame(snapshot.clone());
    for evt in CHANNEL_EVENTS {
        h.expect("SUBSCRIBE", Some(evt)).await;
    }

    h.push(TransportEvent::Disconnected(DisconnectInfo::new(DisconnectKind::Lost)));
    let handle = h.connection.handle();
    eventually(|| !handle.is_connected()).await;
    assert!(handle.channel().is_none());
    assert!(handle.all_users().is_empty());

    h.ready("100", "someone");
    h.expect("AUTHENTICATE", None).await;
    h.authenticated();
    h.expect("SUBSCRIBE", Some("VOICE_CHANNEL_SELECT")).await;
    h.expect("GET_SELECTED_VOICE_CHANNEL", None).await;
    h.frame(snapshot);
    for evt in CHANNEL_EVENTS {
        let frame = h.expect("SUBSCRIBE", Some(evt)).await;
        assert_eq!(frame["args"]["channel_id"], "c1");
    }
    assert_eq!(handle.channel().unwrap().to_string(), "@me/c1");

    h.connection.shutdown().await;
}

#[tokio::test]
async fn test_raw_command() {
    let mut h = Harness::start(Some("secret"), None);

    h.ready("100", "someone");
    h.expect("AUTHENTICATE", None).await;

    h.connection
        .send("SET_VOICE_SETTINGS", r#"{"mute": true}"#)
        .unwrap();
    let frame = h.expect("SET_VOICE_SETTINGS", None).await;
    assert_eq!(frame["args"]["mute"], true);

    h.connection.shutdown().await;
    assert!(matches!(
        h.connection.send("GET_GUILDS", ""),
        Err(RpcError::NotRunning)
    ));
}

#[tokio::test]
async fn test_transport_end_stops_loop() {
    let h = Harness::start(None, None);
    let handle = h.connection.handle();

    drop(h.events);
    eventually(|| h.shutdowns.load(Ordering::SeqCst) == 1).await;
    assert!(!handle.is_connected());
}
