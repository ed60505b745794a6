//! # api-adapters
//!
//! `ServerApi` implementations for the server families Rediscover speaks.
//! Each adapter owns its wire format and hands canonical `Account`/`Post`
//! values to the engine.

mod http;

#[cfg(feature = "mastodon")]
pub mod mastodon;
#[cfg(feature = "misskey")]
pub mod misskey;

pub use http::ClientOptions;

#[cfg(test)]
mod test_server;

use domains::{ApiError, Result, ServerApi, ServerKind};
use secrecy::SecretString;
use std::sync::Arc;

/// Signs in to `origin` with the adapter for `kind`.
#[cfg_attr(not(all(feature = "mastodon", feature = "misskey")), allow(unused_variables))]
pub async fn connect(
    kind: ServerKind,
    origin: &str,
    access_token: SecretString,
    options: &ClientOptions,
) -> Result<Arc<dyn ServerApi>> {
    match kind {
        #[cfg(feature = "mastodon")]
        ServerKind::Mastodon => Ok(Arc::new(
            mastodon::MastodonApi::login(origin, access_token, options).await?,
        )),
        #[cfg(feature = "misskey")]
        ServerKind::Misskey => Ok(Arc::new(
            misskey::MisskeyApi::login(origin, access_token, options).await?,
        )),
        #[allow(unreachable_patterns)]
        other => Err(ApiError::Unsupported(other.to_string())),
    }
}
