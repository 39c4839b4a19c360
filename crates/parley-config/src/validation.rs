// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, non-zero timeouts, and known log levels.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.client.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "client.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("client.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.client.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "client.connect_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.client.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "client.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if let Some(agent) = &config.client.user_agent
        && agent.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "client.user_agent must not be blank when set".to_string(),
        });
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ParleyConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = ParleyConfig::default();
        config.client.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("http://"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ParleyConfig::default();
        config.client.base_url = "   ".into();
        config.client.connect_timeout_secs = 0;
        config.client.request_timeout_secs = 0;
        config.log.level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn zero_timeout_from_toml_is_rejected() {
        let toml_str = r#"
[client]
connect_timeout_secs = 0
"#;
        let config: ParleyConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn blank_user_agent_from_toml_is_rejected() {
        let toml_str = r#"
[client]
user_agent = "   "
"#;
        let config: ParleyConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("user_agent"));
    }

    #[test]
    fn unknown_section_fails_to_deserialize() {
        let toml_str = r#"
[server]
port = 8080
"#;
        assert!(toml::from_str::<ParleyConfig>(toml_str).is_err());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = ParleyConfig::default();
        config.log.level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
