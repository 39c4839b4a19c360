// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./parley.toml` > `~/.config/parley/parley.toml` > `/etc/parley/parley.toml`
//! with environment variable overrides via `PARLEY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ParleyConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/parley/parley.toml";
pub(crate) const LOCAL_CONFIG: &str = "parley.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("parley/parley.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/parley/parley.toml` (system-wide)
/// 3. `~/.config/parley/parley.toml` (user XDG config)
/// 4. `./parley.toml` (local directory)
/// 5. `PARLEY_*` environment variables
pub fn load_config() -> Result<ParleyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `PARLEY_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PARLEY_CLIENT_BASE_URL` must become `client.base_url`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PARLEY_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("client_", "client.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
