// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling for interruptible commands.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs handlers for SIGINT (Ctrl+C) and, on Unix, SIGTERM.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received. The handler task ends once the token is cancelled by any party.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => token_clone.cancel(),
            _ = token_clone.cancelled() => {}
        }
        debug!("signal handler completed");
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
            info!("received SIGINT (Ctrl+C), cancelling");
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received SIGINT (Ctrl+C), cancelling"),
        _ = sigterm.recv() => info!("received SIGTERM, cancelling"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received Ctrl+C, cancelling");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_starts_uncancelled_and_can_be_cancelled_manually() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
