//! Registry errors. Every failure leaves the registry unchanged.

use lsd_access::AccessError;
use lsd_types::{Address, KeyError, PubKey};
use thiserror::Error;

use crate::operator::OperatorId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("invalid validator key material: {0}")]
    InvalidKey(#[from] KeyError),

    #[error("array argument must not be empty")]
    InvalidArrayLengthOfZero,

    #[error("pubkey {0} is already registered")]
    PubKeyAlreadyExists(PubKey),

    #[error("pubkey {0} appears more than once in the batch")]
    DuplicatePubKeyInBatch(PubKey),

    #[error("no operator owns pubkey {0}")]
    NoPubKeyFound(PubKey),

    #[error("operator {0} is disabled")]
    CannotUseDisabledOperator(OperatorId),

    #[error("pubkey {got} is not the next pending key of operator {operator_id}")]
    NextOperatorPubKeyMismatch { operator_id: OperatorId, got: PubKey },

    #[error("pubkey {0} is not an active validator")]
    MissingActiveValidatorDetails(PubKey),

    #[error("active set entry {index} of operator {operator_id} is outside its active region")]
    ActiveKeyOutOfRange { operator_id: OperatorId, index: u64 },

    #[error("pubkey {0} is not a pending validator")]
    MissingPendingValidatorDetails(PubKey),

    #[error("an operator is already controlled by {0}")]
    OperatorAlreadyExists(Address),

    #[error("no operator is controlled by {0}")]
    NoOperatorFound(Address),

    #[error("operator id {0} does not exist")]
    OperatorIdNotFound(OperatorId),

    #[error("operator {0} is already enabled")]
    OperatorAlreadyEnabled(OperatorId),

    #[error("operator {0} is already disabled")]
    OperatorAlreadyDisabled(OperatorId),

    #[error("operator {0}: new value is identical to the current one")]
    UnchangedValue(OperatorId),

    #[error("invalid proof-of-reserve range: start {start} > end {end}")]
    InvalidPoRAddressListRange { start: usize, end: usize },

    #[error("operator limit reached")]
    TooManyOperators,
}
