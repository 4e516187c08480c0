use lsd_types::Address;
use thiserror::Error;

use crate::pause::PauseFlag;
use crate::roles::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("account {account} is missing role {role:?}")]
    AccessDenied { role: Role, account: Address },

    #[error("capability for {held:?} cannot be used where {required:?} is required")]
    WrongCapability { required: Role, held: Role },

    #[error("core methods are paused")]
    CoreMethodsPaused,

    #[error("bot methods are paused")]
    BotMethodsPaused,

    #[error("operator methods are paused")]
    OperatorMethodsPaused,

    #[error("withdrawal processing is paused")]
    WithdrawalMethodsPaused,

    #[error("cannot revoke the last platform admin")]
    LastAdmin,
}

impl AccessError {
    /// The error raised when an entry point gated by `flag` is called while paused.
    pub fn paused(flag: PauseFlag) -> Self {
        match flag {
            PauseFlag::Core => AccessError::CoreMethodsPaused,
            PauseFlag::Bot => AccessError::BotMethodsPaused,
            PauseFlag::Operator => AccessError::OperatorMethodsPaused,
            PauseFlag::Withdrawals => AccessError::WithdrawalMethodsPaused,
        }
    }

    /// The pause flag behind this error, if it is a pause error.
    pub fn paused_flag(&self) -> Option<PauseFlag> {
        match self {
            AccessError::CoreMethodsPaused => Some(PauseFlag::Core),
            AccessError::BotMethodsPaused => Some(PauseFlag::Bot),
            AccessError::OperatorMethodsPaused => Some(PauseFlag::Operator),
            AccessError::WithdrawalMethodsPaused => Some(PauseFlag::Withdrawals),
            _ => None,
        }
    }
}
