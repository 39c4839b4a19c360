// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Parley.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Parley configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// History service connection settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// History service connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Origin of the conversation service, e.g. `https://chat.example.edu`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout for non-streaming calls, in seconds.
    /// Generation requests are bounded only by their cancellation token.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Overrides the `User-Agent` header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
