//! Process-wide log subscriber, owned by the entry point.

use std::io::Write;

use clap::ValueEnum;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "ferrocast=info,ferrocast_web=info,ferrocast_core=info,ferrocast_model=info,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Handle to the installed subscriber. Call [`LogHandle::flush`] before exit.
#[derive(Debug)]
pub struct LogHandle(());

impl LogHandle {
    /// Install the global subscriber. Fails if one is already installed.
    pub fn install(format: LogFormat) -> Result<Self, TryInitError> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let registry = tracing_subscriber::registry().with(filter);

        match format {
            LogFormat::Text => registry.with(fmt::layer()).try_init()?,
            LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
        }

        Ok(Self(()))
    }

    /// Flush buffered log output.
    pub fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}
