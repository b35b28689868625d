use crate::Result;
use tracing::debug;

#[cfg(unix)]
pub async fn await_shutdown() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sig_term = signal(SignalKind::terminate())?;
    let mut sig_int = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sig_term.recv() => debug!("Received SIGTERM"),
        _ = sig_int.recv() => debug!("Received SIGINT"),
    }

    Ok(())
}

#[cfg(not(unix))]
pub async fn await_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    debug!("Received Ctrl-C");
    Ok(())
}
