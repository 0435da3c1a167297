//! Termination signal handling.

use std::fmt::{Display, Formatter};

/// Signal that ended the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl ShutdownSignal {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

impl Display for ShutdownSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve on SIGINT or SIGTERM (ctrl-c only off unix).
///
/// A handler that cannot be registered never resolves.
pub async fn wait_for_signal() -> ShutdownSignal {
    let signal = tokio::select! {
        signal = interrupt() => signal,
        signal = terminate() => signal,
    };
    tracing::info!(signal = signal.name(), "Caught signal {}", signal);
    signal
}

async fn interrupt() -> ShutdownSignal {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for SIGINT");
        std::future::pending::<()>().await;
    }
    ShutdownSignal::Interrupt
}

#[cfg(unix)]
async fn terminate() -> ShutdownSignal {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
    ShutdownSignal::Terminate
}

#[cfg(not(unix))]
async fn terminate() -> ShutdownSignal {
    std::future::pending::<()>().await;
    ShutdownSignal::Terminate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names() {
        assert_eq!(ShutdownSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.name(), "SIGTERM");
    }
}
