//! Process signal handling.

use mongo_statsd_core::error::{ExporterError, Result};

/// Wait for SIGINT, SIGTERM or SIGQUIT (ctrl-c elsewhere) and return its name.
#[cfg(unix)]
pub async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let install = |kind: SignalKind| {
        signal(kind)
            .map_err(|e| ExporterError::Internal(format!("install signal handler failed: {e}")))
    };
    let mut int = install(SignalKind::interrupt())?;
    let mut term = install(SignalKind::terminate())?;
    let mut quit = install(SignalKind::quit())?;

    let name = tokio::select! {
        _ = int.recv() => "SIGINT",
        _ = term.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
pub async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| ExporterError::Internal(format!("install ctrl-c handler failed: {e}")))?;
    Ok("ctrl-c")
}
