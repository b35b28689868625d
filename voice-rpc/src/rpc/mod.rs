mod auth;
pub use auth::{AuthMachine, AuthState, AuthStep};

pub mod codec;

mod connection;
pub use connection::RpcConnection;

mod disconnect;
pub use disconnect::{DisconnectInfo, DisconnectKind};

mod dispatcher;

mod handle;
pub use handle::RpcHandle;

mod options;
pub use options::*;

pub mod payloads;

mod roster;
pub use roster::{Roster, UpsertKind};

mod subscriptions;
pub use subscriptions::{Subscription, SubscriptionManager, CHANNEL_EVENTS};

mod token_exchange;
pub use token_exchange::{attempt_exchange, HttpTokenExchanger, TokenExchanger};

pub mod transport;
pub use transport::{Transport, TransportEvent, WebSocketTransport};
