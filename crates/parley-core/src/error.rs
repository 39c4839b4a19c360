// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Parley.
//!
//! [`ParleyError`] only covers failures that happen before a request is
//! issued (bad configuration, HTTP client construction). Request-time failures
//! never surface as errors; they are carried as data in
//! [`TransportResult`](crate::TransportResult).

use thiserror::Error;

/// Construction-time error type shared across Parley crates.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid base URL, bad header values, bad TOML).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors.
    #[error("client error: {message}")]
    Client {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
