use std::future::IntoFuture;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ferrocast_core::{PriceFetcher, YahooAdapter};
use ferrocast_web::shutdown::{self, ShutdownSignal};
use ferrocast_web::{app, AppState, Cli, ForecastPipeline, LogHandle};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logs = match LogHandle::install(cli.log_format) {
        Ok(handle) => handle,
        Err(error) => {
            eprintln!("error: failed to install log subscriber: {error}");
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli).await {
        Ok(Some(signal)) => {
            tracing::info!(signal = signal.name(), "shutting down");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "server failed");
            ExitCode::FAILURE
        }
    };

    logs.flush();
    code
}

/// Serve until the listener fails or a termination signal arrives.
/// In-flight requests are not drained.
async fn run(cli: Cli) -> std::io::Result<Option<ShutdownSignal>> {
    let source = YahooAdapter::default().with_timeout_ms(cli.upstream_timeout_ms);
    let pipeline = ForecastPipeline::new(
        PriceFetcher::new(Arc::new(source)),
        cli.forecast_settings(),
    );

    let listener = TcpListener::bind(cli.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        version = env!("CARGO_PKG_VERSION"),
        lookback = %cli.lookback,
        upstream_timeout_ms = cli.upstream_timeout_ms,
        "ferrocast listening"
    );

    let server = axum::serve(listener, app(AppState::new(pipeline))).into_future();
    tokio::select! {
        result = server => result.map(|()| None),
        signal = shutdown::wait_for_signal() => Ok(Some(signal)),
    }
}
