//! Engine configuration.
//!
//! Numeric scaling, date shifting and the substitute styles for addresses
//! and names. Loadable from JSON or TOML; missing fields take defaults.

use crate::error::{ObfuscateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default multiplier for integers, floats and ports.
pub const DEFAULT_COEFFICIENT: f64 = 0.917;

/// Default date shift in days.
pub const DEFAULT_DATE_OFFSET_DAYS: i64 = -42;

/// Largest accepted date shift, in either direction (about 100 years).
pub const MAX_DATE_OFFSET_DAYS: i64 = 36_500;

/// How IPv4 addresses are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IpStyle {
    /// Keep first and last octets: 192.168.1.100 -> 192.X.X.100
    #[default]
    KeepEnds,
    /// Map into 10.0.0.0/8: 192.168.1.100 -> 10.X.X.X
    PrivateRange,
}

impl IpStyle {
    /// Parse from string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "keep_ends" => Some(IpStyle::KeepEnds),
            "private_range" | "private" => Some(IpStyle::PrivateRange),
            _ => None,
        }
    }
}

impl std::fmt::Display for IpStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IpStyle::KeepEnds => "keep_ends",
            IpStyle::PrivateRange => "private_range",
        };
        write!(f, "{}", s)
    }
}

/// How hostnames, replica sets and generic names are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    /// City/flower pairs: daisy.paris.local
    #[default]
    Readable,
    /// Hash prefixes: host-1a2b3c4d.local
    HashPrefixed,
}

impl NameStyle {
    /// Parse from string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "readable" => Some(NameStyle::Readable),
            "hash_prefixed" | "hash" => Some(NameStyle::HashPrefixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for NameStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NameStyle::Readable => "readable",
            NameStyle::HashPrefixed => "hash_prefixed",
        };
        write!(f, "{}", s)
    }
}

/// Obfuscator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObfuscatorConfig {
    /// Multiplier for numeric obfuscation.
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,

    /// Days added to every `YYYY-MM-DD` date.
    #[serde(default = "default_date_offset_days")]
    pub date_offset_days: i64,

    /// IPv4 substitute style.
    #[serde(default)]
    pub ip_style: IpStyle,

    /// Name substitute style.
    #[serde(default)]
    pub name_style: NameStyle,
}

fn default_coefficient() -> f64 {
    DEFAULT_COEFFICIENT
}

fn default_date_offset_days() -> i64 {
    DEFAULT_DATE_OFFSET_DAYS
}

impl Default for ObfuscatorConfig {
    fn default() -> Self {
        Self {
            coefficient: DEFAULT_COEFFICIENT,
            date_offset_days: DEFAULT_DATE_OFFSET_DAYS,
            ip_style: IpStyle::default(),
            name_style: NameStyle::default(),
        }
    }
}

impl ObfuscatorConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the numeric coefficient.
    pub fn with_coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = coefficient;
        self
    }

    /// Set the date offset.
    pub fn with_date_offset_days(mut self, days: i64) -> Self {
        self.date_offset_days = days;
        self
    }

    /// Set the IP style.
    pub fn with_ip_style(mut self, style: IpStyle) -> Self {
        self.ip_style = style;
        self
    }

    /// Set the name style.
    pub fn with_name_style(mut self, style: NameStyle) -> Self {
        self.name_style = style;
        self
    }

    /// Check the config for values the engine cannot use.
    pub fn validate(&self) -> Result<()> {
        if !self.coefficient.is_finite() || self.coefficient <= 0.0 {
            return Err(ObfuscateError::config(format!(
                "coefficient must be a positive finite number, got {}",
                self.coefficient
            )));
        }
        if self.date_offset_days.abs() > MAX_DATE_OFFSET_DAYS {
            return Err(ObfuscateError::config(format!(
                "date_offset_days must be within +/-{}, got {}",
                MAX_DATE_OFFSET_DAYS, self.date_offset_days
            )));
        }
        Ok(())
    }

    /// Parse a config from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: ObfuscatorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ObfuscatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. `.toml` files are read as TOML, anything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Save the config as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObfuscatorConfig::default();
        assert_eq!(config.coefficient, 0.917);
        assert_eq!(config.date_offset_days, -42);
        assert_eq!(config.ip_style, IpStyle::KeepEnds);
        assert_eq!(config.name_style, NameStyle::Readable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ObfuscatorConfig::from_json(r#"{"ip_style": "private_range"}"#).unwrap();
        assert_eq!(config.ip_style, IpStyle::PrivateRange);
        assert_eq!(config.coefficient, DEFAULT_COEFFICIENT);
        assert_eq!(config.date_offset_days, DEFAULT_DATE_OFFSET_DAYS);
    }

    #[test]
    fn test_toml_config() {
        let config = ObfuscatorConfig::from_toml(
            "coefficient = 0.5\ndate_offset_days = 10\nname_style = \"hash_prefixed\"\n",
        )
        .unwrap();
        assert_eq!(config.coefficient, 0.5);
        assert_eq!(config.date_offset_days, 10);
        assert_eq!(config.name_style, NameStyle::HashPrefixed);
        assert_eq!(config.ip_style, IpStyle::KeepEnds);
    }

    #[test]
    fn test_validate_rejects_bad_coefficient() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = ObfuscatorConfig::default().with_coefficient(bad);
            assert!(config.validate().is_err(), "coefficient {} accepted", bad);
        }
        assert!(ObfuscatorConfig::from_json(r#"{"coefficient": -2.0}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_huge_date_offset() {
        let config = ObfuscatorConfig::default().with_date_offset_days(MAX_DATE_OFFSET_DAYS);
        assert!(config.validate().is_ok());
        let config = ObfuscatorConfig::default().with_date_offset_days(-MAX_DATE_OFFSET_DAYS - 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(ObfuscatorConfig::from_json(r#"{"ip_style": "scramble"}"#).is_err());
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(IpStyle::parse_str("keep-ends"), Some(IpStyle::KeepEnds));
        assert_eq!(IpStyle::parse_str("PRIVATE_RANGE"), Some(IpStyle::PrivateRange));
        assert_eq!(IpStyle::parse_str("bogus"), None);
        assert_eq!(NameStyle::parse_str("hash-prefixed"), Some(NameStyle::HashPrefixed));
        assert_eq!(NameStyle::parse_str("Readable"), Some(NameStyle::Readable));
        assert_eq!(NameStyle::parse_str(""), None);
    }

    #[test]
    fn test_style_display_roundtrips() {
        for style in [IpStyle::KeepEnds, IpStyle::PrivateRange] {
            assert_eq!(IpStyle::parse_str(&style.to_string()), Some(style));
        }
        for style in [NameStyle::Readable, NameStyle::HashPrefixed] {
            assert_eq!(NameStyle::parse_str(&style.to_string()), Some(style));
        }
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("engine.json");
        ObfuscatorConfig::default()
            .with_coefficient(0.25)
            .save(&json_path)
            .unwrap();
        assert_eq!(ObfuscatorConfig::load(&json_path).unwrap().coefficient, 0.25);

        let toml_path = dir.path().join("engine.toml");
        std::fs::write(&toml_path, "date_offset_days = 7\n").unwrap();
        assert_eq!(ObfuscatorConfig::load(&toml_path).unwrap().date_offset_days, 7);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ObfuscatorConfig::load("/nonexistent/logveil.json").unwrap_err();
        assert!(matches!(err, ObfuscateError::Io(_)));
    }
}
