//! Repricing errors.

use lsd_access::AccessError;
use lsd_types::{MathError, ParamsError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepricingError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("arithmetic error in reprice: {0}")]
    Math(#[from] MathError),

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("reported total supply is zero")]
    ZeroReportedSupply,

    #[error("on-chain total supply is zero")]
    ZeroActualSupply,

    #[error("pre-reward reserves are zero")]
    ZeroPreRewardReserves,

    #[error("rate moved from {old_rate} to {new_rate}, more than {max_pct} of the old rate")]
    RepriceDifferenceTooLarge {
        old_rate: u128,
        new_rate: u128,
        max_pct: u128,
    },

    #[error("reported supply {reported} differs from on-chain supply {actual} by more than {max_pct}")]
    RepriceSupplyDifferenceTooLarge {
        actual: u128,
        reported: u128,
        max_pct: u128,
    },

    #[error("operator rewards are due but no operator has an active validator")]
    NoActiveValidators,
}
