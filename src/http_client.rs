use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();
static TIMEOUT: OnceCell<Duration> = OnceCell::new();

/// Fixes the request timeout. Only effective before the first `http_client()` call.
pub fn configure_timeout(timeout: Duration) {
    let _ = TIMEOUT.set(timeout);
}

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let timeout = TIMEOUT.get().copied().unwrap_or_else(env_timeout);
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spotstats_terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")
    })
}

fn env_timeout() -> Duration {
    Duration::from_secs(
        std::env::var("SPOTSTATS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 60),
    )
}
