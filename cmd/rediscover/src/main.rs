//! # Rediscover Binary
//!
//! Signs in, samples active followings, and prints one forgotten post per
//! account. Each `--rounds` pass reuses the same session, so nothing already
//! shown comes back.

mod batch;
mod render;

use anyhow::Context;
use api_adapters::ClientOptions;
use clap::Parser;
use configs::{LogSettings, Settings};
use services::{Rediscover, RediscoverOptions, Since};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rediscover", version, about = "Resurface unread posts from the accounts you follow")]
struct Cli {
    /// Settings file (defaults to $REDISCOVER_CONFIG, then ./rediscover.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many batches to show in this session
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Followings sampled per batch; overrides `rediscover.batch_size`
    #[arg(short, long)]
    batch_size: Option<usize>,
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    init_tracing(&settings.log);
    settings.describe();

    let mut client_options = ClientOptions {
        timeout: settings.http.timeout(),
        ..ClientOptions::default()
    };
    if let Some(user_agent) = &settings.http.user_agent {
        client_options.user_agent = user_agent.clone();
    }

    let api = api_adapters::connect(
        settings.server.kind,
        &settings.server.origin,
        settings.server.access_token,
        &client_options,
    )
    .await
    .with_context(|| format!("signing in to {}", settings.server.origin))?;

    let options = RediscoverOptions {
        since: Since::DaysAgo(settings.rediscover.since_days),
        batch_size: cli.batch_size.unwrap_or(settings.rediscover.batch_size),
    };
    let engine = Arc::new(Rediscover::new(api, options));
    info!(since = %engine.since(), batch_size = engine.batch_size(), "session started");

    for round in 1..=cli.rounds {
        info!(round, "rediscovering");
        match batch::show_batch(&engine).await? {
            Some(shown) => info!(round, shown, "batch done"),
            None => {
                info!("nothing left to rediscover");
                break;
            }
        }
    }
    Ok(())
}
