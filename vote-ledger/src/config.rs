//! Configuration for the vote ledger

use serde::{Deserialize, Serialize};

/// Session and service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Candidates registered at startup
    pub candidates: Vec<String>,

    /// Also re-derive the genesis record and check sequence numbers
    pub strict_validation: bool,

    /// Session actor mailbox capacity
    pub mailbox_capacity: usize,

    /// Emit logs as JSON
    pub log_json: bool,

    /// Collect Prometheus metrics
    pub metrics_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "vote-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            candidates: Vec::new(),
            strict_validation: false,
            mailbox_capacity: 1000,
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(candidates) = std::env::var("VOTE_LEDGER_CANDIDATES") {
            config.candidates = parse_candidates(&candidates);
        }

        if let Ok(strict) = std::env::var("VOTE_LEDGER_STRICT") {
            config.strict_validation = parse_bool("VOTE_LEDGER_STRICT", &strict)?;
        }

        if let Ok(capacity) = std::env::var("VOTE_LEDGER_MAILBOX_CAPACITY") {
            config.mailbox_capacity = capacity.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid VOTE_LEDGER_MAILBOX_CAPACITY: {}", e))
            })?;
        }

        if let Ok(json) = std::env::var("VOTE_LEDGER_LOG_JSON") {
            config.log_json = parse_bool("VOTE_LEDGER_LOG_JSON", &json)?;
        }

        if let Ok(metrics) = std::env::var("VOTE_LEDGER_METRICS") {
            config.metrics_enabled = parse_bool("VOTE_LEDGER_METRICS", &metrics)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the session cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.mailbox_capacity == 0 {
            return Err(crate::Error::Config(
                "mailbox_capacity must be greater than zero".to_string(),
            ));
        }
        if self.candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(crate::Error::Config(
                "candidate names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated candidate list, dropping blanks
fn parse_candidates(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(var: &str, raw: &str) -> crate::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(crate::Error::Config(format!(
            "Invalid {}: expected a boolean, got {:?}",
            var, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "vote-ledger");
        assert_eq!(config.mailbox_capacity, 1000);
        assert!(!config.strict_validation);
        assert!(config.candidates.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
candidates = ["Alice", "Bob"]
strict_validation = true
mailbox_capacity = 16
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.candidates, vec!["Alice", "Bob"]);
        assert!(config.strict_validation);
        assert_eq!(config.mailbox_capacity, 16);
        // Unset fields keep their defaults
        assert_eq!(config.service_name, "vote-ledger");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "candidates = not-a-list").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_validate() {
        let config = Config {
            mailbox_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            candidates: vec!["A".to_string(), " ".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_candidates() {
        assert_eq!(parse_candidates(" A, B ,,C "), vec!["A", "B", "C"]);
        assert!(parse_candidates("").is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
