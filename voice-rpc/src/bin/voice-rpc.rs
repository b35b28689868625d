use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use voice_rpc::rpc::Options;
use voice_rpc::{await_shutdown, build_store, setup_observability};
use voice_rpc::{Config, LogNotifier, RpcConnection, RpcHandle};

#[cfg(feature = "use-mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let _guard = setup_observability(&config)?;

    info!(port = config.port, "Starting voice RPC client");

    let store = Arc::new(build_store(&config)?);
    let options = Options::from(&config);
    let connection = RpcConnection::connect(&options, store, Arc::new(LogNotifier))?;

    let roster_log_interval = Duration::from_secs(config.roster_log_interval_secs.max(1));
    let logger = tokio::spawn(log_roster(connection.handle(), roster_log_interval));

    if let Err(e) = await_shutdown().await {
        error!(error = %e, "Failed to wait for shutdown signal");
    }

    info!("Shutting down");
    logger.abort();
    connection.shutdown().await;

    Ok(())
}

async fn log_roster(handle: RpcHandle, period: Duration) {
    let mut ticker = interval(period);

    loop {
        ticker.tick().await;

        if !handle.is_authenticated() {
            info!(
                connected = handle.is_connected(),
                state = %handle.auth_state(),
                "Not authenticated"
            );
            continue;
        }

        let channel = match handle.channel() {
            Some(channel) => channel,
            None => {
                info!("Not in a voice channel");
                continue;
            }
        };

        let mut users: Vec<_> = handle.all_users().into_values().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));

        let summary = users
            .iter()
            .map(|user| {
                let name = user
                    .display_name
                    .clone()
                    .or_else(|| user.tag())
                    .unwrap_or_else(|| user.id.to_string());
                format!("{} ({:?})", name, user.state())
            })
            .collect::<Vec<_>>()
            .join(", ");

        info!(%channel, users = users.len(), "{}", summary);
    }
}
