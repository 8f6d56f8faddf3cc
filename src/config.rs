//! Client configuration.
//!
//! Values come from the builder, from the environment, or from a YAML file:
//!
//! ```yaml
//! app_id: "10000"
//! app_key: "a95eceb1ac8c24ee28b70f7dbba912bf"
//! debug: true
//! timeout_secs: 15
//! ```
//!
//! Environment variables: `TENCENT_AI_APP_ID`, `TENCENT_AI_APP_KEY`,
//! `TENCENT_AI_DEBUG`, `TENCENT_AI_BASE_URL`, `TENCENT_AI_TIMEOUT_SECS`.

use crate::credential::Credentials;
use crate::endpoint::DEFAULT_BASE_URL;
use crate::sign::MAX_NONCE_LEN;
use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub app_id: String,
    pub app_key: String,
    /// Report requests and responses to the log sink.
    pub debug: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    pub nonce_len: usize,
    /// Skip TLS certificate and hostname verification. Only for testing
    /// against local endpoints with self-signed certificates.
    pub danger_accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_key: String::new(),
            debug: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            nonce_len: MAX_NONCE_LEN,
            danger_accept_invalid_certs: false,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("app_key", &"***")
            .field("debug", &self.debug)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("nonce_len", &self.nonce_len)
            .field(
                "danger_accept_invalid_certs",
                &self.danger_accept_invalid_certs,
            )
            .finish()
    }
}

impl ClientConfig {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with whatever `TENCENT_AI_*` variables are set.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Overwrite fields from the environment. Unset or unparseable variables
    /// leave the current value alone.
    pub fn apply_env(&mut self) {
        if let Ok(v) = env::var("TENCENT_AI_APP_ID") {
            self.app_id = v;
        }
        if let Ok(v) = env::var("TENCENT_AI_APP_KEY") {
            self.app_key = v;
        }
        if let Some(v) = env::var("TENCENT_AI_DEBUG").ok().and_then(|s| parse_bool(&s)) {
            self.debug = v;
        }
        if let Ok(v) = env::var("TENCENT_AI_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = env::var("TENCENT_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout_secs = v;
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.app_id.clone(), self.app_key.clone())
    }

    /// Presence and range checks; nothing here talks to the service.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(missing("app_id"));
        }
        if self.app_key.trim().is_empty() {
            return Err(missing("app_key"));
        }
        if self.base_url.trim().is_empty() {
            return Err(missing("base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::for_field("timeout_secs"),
            ));
        }
        if !(1..=MAX_NONCE_LEN).contains(&self.nonce_len) {
            return Err(Error::configuration_with_context(
                "nonce length out of range",
                ErrorContext::for_field("nonce_len")
                    .and_details(format!("expected 1..={}, got {}", MAX_NONCE_LEN, self.nonce_len)),
            ));
        }
        Ok(())
    }
}

fn missing(field: &str) -> Error {
    Error::configuration_with_context(
        format!("{} is required", field),
        ErrorContext::for_field(field),
    )
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_point_at_production() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.nonce_len, 32);
        assert!(!cfg.debug);
        assert!(!cfg.danger_accept_invalid_certs);
    }

    #[test]
    fn yaml_overrides_defaults() {
        let cfg = ClientConfig::from_yaml_str(
            "app_id: \"10000\"\napp_key: secret\ndebug: true\ntimeout_secs: 5\n",
        )
        .unwrap();
        assert_eq!(cfg.app_id, "10000");
        assert_eq!(cfg.app_key, "secret");
        assert!(cfg.debug);
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_yaml_is_reported() {
        let err = ClientConfig::from_yaml_str("timeout_secs: [").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn missing_credentials_fail_validation() {
        let err = ClientConfig::new("", "key").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.field(), Some("app_id"));
        let err = ClientConfig::new("10000", " ").validate().unwrap_err();
        assert_eq!(err.field(), Some("app_key"));
    }

    #[test]
    fn nonce_length_is_bounded() {
        let mut cfg = ClientConfig::new("1", "k");
        cfg.nonce_len = 0;
        assert!(cfg.validate().is_err());
        cfg.nonce_len = 33;
        assert!(cfg.validate().is_err());
        cfg.nonce_len = 16;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn debug_output_hides_key() {
        let out = format!("{:?}", ClientConfig::new("10000", "super-secret"));
        assert!(!out.contains("super-secret"));
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
