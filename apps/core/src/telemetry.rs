//! Tracing subscriber setup.

use crate::config::LogFormat;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const APP_NAME: &str = "storefront";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber and reports whether this call installed it.
/// Calling it again once a subscriber is set is a no-op.
pub fn init(format: LogFormat) -> bool {
    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter())
            .try_init()
            .is_ok(),
        LogFormat::Bunyan => {
            let subscriber = Registry::default()
                .with(env_filter())
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(APP_NAME.into(), std::io::stdout));
            tracing::subscriber::set_global_default(subscriber).is_ok()
        }
    };

    if installed {
        tracing::debug!(?format, "tracing subscriber installed");
    }
    installed
}
