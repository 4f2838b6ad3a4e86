use crate::conversion::CoinInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default native decimals of the integer denomination.
pub const DEFAULT_DECIMALS: u8 = 6;

/// Errors raised while loading the precise bank configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The chainspec extras carry no `evolve.preciseBank` section.
    #[error("missing preciseBank config in chainspec extras")]
    Missing,
    /// The section is present but malformed or out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Denominations of the bridged native coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreciseBankConfig {
    /// Denomination held by the integer ledger, e.g. `uatom`.
    pub integer_denom: String,
    /// 18 decimal denomination seen by EVM callers, e.g. `aatom`.
    pub extended_denom: String,
    /// Native decimals of `integer_denom`.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

const fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

impl PreciseBankConfig {
    /// Creates a new config.
    pub fn new(
        integer_denom: impl Into<String>,
        extended_denom: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            integer_denom: integer_denom.into(),
            extended_denom: extended_denom.into(),
            decimals,
        }
    }

    /// Reads the config from `EV_PRECISEBANK_INTEGER_DENOM`,
    /// `EV_PRECISEBANK_EXTENDED_DENOM` and `EV_PRECISEBANK_DECIMALS`.
    ///
    /// Decimals default to [`DEFAULT_DECIMALS`] when unset.
    pub fn from_env() -> eyre::Result<Self> {
        let integer_denom = std::env::var("EV_PRECISEBANK_INTEGER_DENOM")?;
        let extended_denom = std::env::var("EV_PRECISEBANK_EXTENDED_DENOM")?;
        let decimals = std::env::var("EV_PRECISEBANK_DECIMALS")
            .ok()
            .map(|s| s.trim().parse::<u8>())
            .transpose()?
            .unwrap_or(DEFAULT_DECIMALS);

        let config = Self {
            integer_denom,
            extended_denom,
            decimals,
        };
        config.coin_info()?;
        Ok(config)
    }

    /// Validates the config and derives the runtime constants.
    pub fn coin_info(&self) -> Result<CoinInfo, ConfigError> {
        CoinInfo::new(
            self.integer_denom.clone(),
            self.extended_denom.clone(),
            self.decimals,
        )
    }
}

impl TryFrom<&PreciseBankConfig> for CoinInfo {
    type Error = ConfigError;

    fn try_from(config: &PreciseBankConfig) -> Result<Self, Self::Error> {
        config.coin_info()
    }
}

/// Reads `evolve.preciseBank` from a chainspec/extras JSON blob.
///
/// Expected shape (example):
/// {
///   "evolve": {
///     "preciseBank": {
///       "integerDenom": "uatom",
///       "extendedDenom": "aatom",
///       "decimals": 6
///     }
///   }
/// }
pub fn parse_precisebank_config(extras: &Value) -> Result<PreciseBankConfig, ConfigError> {
    let evolve = extras.get("evolve").ok_or(ConfigError::Missing)?;
    let pb = evolve.get("preciseBank").ok_or(ConfigError::Missing)?;
    let config = serde_json::from_value::<PreciseBankConfig>(pb.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    config.coin_info()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use serde_json::json;

    #[test]
    fn parses_from_extras() {
        let extras = json!({
            "evolve": {
                "preciseBank": {
                    "integerDenom": "uatom",
                    "extendedDenom": "aatom",
                    "decimals": 6
                }
            }
        });
        let config = parse_precisebank_config(&extras).unwrap();
        assert_eq!(config, PreciseBankConfig::new("uatom", "aatom", 6));

        let info = CoinInfo::try_from(&config).unwrap();
        assert_eq!(info.conversion_factor(), U256::from(1_000_000_000_000u64));
    }

    #[test]
    fn decimals_default_when_absent() {
        let extras = json!({
            "evolve": { "preciseBank": { "integerDenom": "ukava", "extendedDenom": "akava" } }
        });
        let config = parse_precisebank_config(&extras).unwrap();
        assert_eq!(config.decimals, DEFAULT_DECIMALS);
    }

    #[test]
    fn missing_section() {
        let err = parse_precisebank_config(&json!({ "evolve": {} })).unwrap_err();
        assert!(matches!(err, ConfigError::Missing));
        let err = parse_precisebank_config(&json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::Missing));
    }

    #[test]
    fn invalid_values() {
        let extras = json!({
            "evolve": {
                "preciseBank": { "integerDenom": "uatom", "extendedDenom": "aatom", "decimals": 18 }
            }
        });
        let err = parse_precisebank_config(&extras).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid(_)),
            "unexpected error: {err}"
        );

        let extras = json!({ "evolve": { "preciseBank": { "integerDenom": 5 } } });
        let result = parse_precisebank_config(&extras);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    /// Every case runs in one test since they share process environment.
    #[test]
    fn reads_from_env() {
        const INTEGER: &str = "EV_PRECISEBANK_INTEGER_DENOM";
        const EXTENDED: &str = "EV_PRECISEBANK_EXTENDED_DENOM";
        const DECIMALS: &str = "EV_PRECISEBANK_DECIMALS";

        std::env::remove_var(INTEGER);
        std::env::remove_var(EXTENDED);
        std::env::remove_var(DECIMALS);
        assert!(PreciseBankConfig::from_env().is_err());

        std::env::set_var(INTEGER, "uatom");
        std::env::set_var(EXTENDED, "aatom");
        let config = PreciseBankConfig::from_env().unwrap();
        assert_eq!(
            config,
            PreciseBankConfig::new("uatom", "aatom", DEFAULT_DECIMALS)
        );

        std::env::set_var(DECIMALS, " 8 ");
        assert_eq!(PreciseBankConfig::from_env().unwrap().decimals, 8);

        std::env::set_var(DECIMALS, "18");
        let err = PreciseBankConfig::from_env().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: decimals 18 must be at most 17"
        );

        std::env::set_var(DECIMALS, "six");
        assert!(PreciseBankConfig::from_env().is_err());

        std::env::set_var(DECIMALS, "6");
        std::env::set_var(EXTENDED, "uatom");
        assert!(PreciseBankConfig::from_env().is_err());

        std::env::remove_var(INTEGER);
        std::env::remove_var(EXTENDED);
        std::env::remove_var(DECIMALS);
    }
}
