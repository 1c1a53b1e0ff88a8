//! Optional JSON settings file.
//!
//! Looked up at `$MORTGAGE_CALC_CONFIG`, falling back to
//! `mortgage_calc.json` in the working directory. A missing file is not an
//! error; every key has a default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::calculator::MortgageType;
use crate::form::FormVariant;

pub const CONFIG_ENV: &str = "MORTGAGE_CALC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "mortgage_calc.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variant: FormVariant,
    pub defaults: FormDefaults,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: FormVariant::default(),
            defaults: FormDefaults::default(),
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

/// Values the form starts with, and returns to on reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormDefaults {
    pub home_price: String,
    pub down_payment: String,
    pub loan_term: String,
    pub interest_rate: String,
    pub mortgage_type: Option<MortgageType>,
}

impl Config {
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config {}", path.display()))
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.variant, FormVariant::Typed);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let file = write_config(
            r#"{
                "variant": "simple",
                "defaults": { "loan_term": "30", "mortgage_type": "interestOnly" }
            }"#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.variant, FormVariant::Simple);
        assert_eq!(config.defaults.loan_term, "30");
        assert_eq!(config.defaults.home_price, "");
        assert_eq!(config.defaults.mortgage_type, Some(MortgageType::InterestOnly));
        assert_eq!(config.log_file, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config(r#"{ "varient": "simple" }"#);
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let file = write_config("{ not json");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
