use crate::{Config, JsonFileStore, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "voice_rpc=info";

#[cfg(feature = "use-sentry")]
pub type ObservabilityGuard = Option<sentry::ClientInitGuard>;

#[cfg(not(feature = "use-sentry"))]
pub type ObservabilityGuard = ();

/// Installs the global tracing subscriber. Keep the returned guard alive for
/// as long as events should be reported.
pub fn setup_observability(config: &Config) -> Result<ObservabilityGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    #[cfg(feature = "use-sentry")]
    let (registry, guard) = {
        let guard = setup_sentry(config)?;
        let layer = guard.as_ref().map(|_| {
            sentry_tracing::layer().event_filter(|meta| match *meta.level() {
                tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Exception,
                _ => sentry_tracing::EventFilter::Ignore,
            })
        });

        (registry.with(layer), guard)
    };

    #[cfg(not(feature = "use-sentry"))]
    let guard = ();

    if config.json_log {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(crate::RpcError::custom)?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(crate::RpcError::custom)?;
    }

    Ok(guard)
}

#[cfg(feature = "use-sentry")]
pub fn setup_sentry(config: &Config) -> Result<Option<sentry::ClientInitGuard>> {
    use std::str::FromStr;

    let dsn = match &config.sentry_dsn {
        Some(dsn) => sentry::types::Dsn::from_str(dsn).map_err(crate::RpcError::custom)?,
        None => return Ok(None),
    };

    Ok(Some(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        debug: config.debug_mode,
        release: sentry::release_name!(),
        ..Default::default()
    })))
}

pub fn build_store(config: &Config) -> Result<JsonFileStore> {
    let store = JsonFileStore::open(&config.credential_path)?;
    info!(path = %store.path().display(), "Loaded credential store");
    Ok(store)
}
