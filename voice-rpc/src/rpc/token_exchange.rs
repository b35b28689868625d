use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use url::Url;

use super::options::TOKEN_EXCHANGE_URL;
use crate::{Result, RpcError};

/// Trades an authorization code for an access token.
#[async_trait]
pub trait TokenExchanger: Send + Sync + 'static {
    async fn exchange(&self, code: &str) -> Result<String>;
}

#[derive(Serialize, Debug)]
struct TokenRequest<'a> {
    code: &'a str,
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

pub struct HttpTokenExchanger {
    client: Client,
    url: Url,
}

impl HttpTokenExchanger {
    pub fn new(url: Url) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .use_rustls_tls()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self { client, url })
    }

    pub fn streamkit() -> Result<Self> {
        Self::new(Url::parse(TOKEN_EXCHANGE_URL)?)
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange(&self, code: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url.clone())
            .json(&TokenRequest { code })
            .send()
            .await?;

        if !res.status().is_success() {
            return RpcError::TokenExchange(res.status()).into();
        }

        let body: TokenResponse = res.json().await?;
        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or(RpcError::MissingAccessToken)
    }
}

/// Runs the exchange up to `attempts` times, sleeping `delay` between tries.
pub async fn attempt_exchange(
    exchanger: &dyn TokenExchanger,
    code: &str,
    attempts: usize,
    delay: Duration,
) -> Result<String> {
    let attempts = attempts.max(1);
    let mut tries = 0usize;

    loop {
        info!("Exchanging authorization code");

        let err = match exchanger.exchange(code).await {
            Ok(token) => return Ok(token),
            Err(e) => e,
        };

        tries += 1;
        if tries >= attempts {
            error!(error = %err, "Failed to exchange authorization code after {} attempts", tries);
            return Err(err);
        }

        warn!(error = %err, "Failed to exchange authorization code, retrying in {:?}", delay);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenExchanger for Flaky {
        async fn exchange(&self, code: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                RpcError::MissingAccessToken.into()
            } else {
                Ok(format!("token-for-{}", code))
            }
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let exchanger = Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
        };

        let token = attempt_exchange(&exchanger, "abc", 3, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(token, "token-for-abc");
        assert_eq!(exchanger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up() {
        let exchanger = Flaky {
            failures: 10,
            calls: AtomicUsize::new(0),
        };

        let res = attempt_exchange(&exchanger, "abc", 2, Duration::from_millis(1)).await;

        assert!(matches!(res, Err(RpcError::MissingAccessToken)));
        assert_eq!(exchanger.calls.load(Ordering::SeqCst), 2);
    }
}
