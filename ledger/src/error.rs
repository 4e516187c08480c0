use lsd_access::AccessError;
use lsd_oracle::OracleError;
use lsd_registry::RegistryError;
use lsd_repricing::RepricingError;
use lsd_types::ParamsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Repricing(#[from] RepricingError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger lock poisoned")]
    Poisoned,
}
