use tracing::warn;

/// A user-facing notice raised by the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub title: &'static str,
    pub content: &'static str,
}

pub const UNSUPPORTED_CLIENT: Advisory = Advisory {
    title: "Unsupported Discord client",
    content: "The client listening for RPC connections is arRPC, which doesn't support voice. \
              Close it and start the official Discord desktop client to see your voice channel.",
};

pub trait Notifier: Send + Sync + 'static {
    fn advise(&self, advisory: &Advisory);
}

/// Writes advisories to the log. Used when the host has no UI of its own.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn advise(&self, advisory: &Advisory) {
        warn!(title = advisory.title, "{}", advisory.content);
    }
}
