mod error;
pub use error::{Result, RpcError};

pub mod rpc;
pub use rpc::{AuthState, RpcConnection, RpcHandle};

pub mod store;
pub use store::{CredentialStore, JsonFileStore, MemoryStore};

mod notify;
pub use notify::{Advisory, LogNotifier, Notifier, UNSUPPORTED_CLIENT};

mod resolver;
pub use resolver::UserResolver;

mod config;
pub use config::Config;

mod builders;
pub use builders::*;

mod util;
pub use util::await_shutdown;
