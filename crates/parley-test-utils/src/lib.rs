// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! # Components
//!
//! - [`MockHistoryServer`] - wiremock-backed stand-in for the history service
//! - [`fixtures`] - JSON payloads shaped like the service's responses
//! - [`closed_port_url`] - a base URL nothing listens on

pub mod fixtures;
pub mod mock_server;

pub use mock_server::MockHistoryServer;

/// Returns `http://127.0.0.1:<port>` for a port that was just released.
///
/// Requests to it fail at connect time, which exercises the network-failure
/// path without waiting for timeouts.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_port_refuses_connections() {
        let url = closed_port_url();
        let err = reqwest::get(&url).await.unwrap_err();
        assert!(err.is_connect(), "unexpected error: {err}");
    }
}
