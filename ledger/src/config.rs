//! Ledger configuration loaded from TOML.

use lsd_types::{Address, ProtocolParams};
use lsd_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Accounts granted each operational role at start-up.
///
/// The platform admin is configured separately on [`LedgerConfig::admin`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAssignments {
    pub bots: Vec<Address>,
    pub repricers: Vec<Address>,
    pub deposit_managers: Vec<Address>,
    pub pausers: Vec<Address>,
    pub unpausers: Vec<Address>,
}

/// Configuration for a [`crate::StakingLedger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Initial platform admin.
    #[serde(default)]
    pub admin: Address,

    /// Log output format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter (e.g. "info", "debug,lsd_oracle=trace").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub roles: RoleAssignments,

    /// Treasury address plus repricing and oracle bounds.
    #[serde(default)]
    pub params: ProtocolParams,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate its parameters.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.params.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            admin: Address::ZERO,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            roles: RoleAssignments::default(),
            params: ProtocolParams::default(),
        }
    }
}
