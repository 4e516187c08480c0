//! Pause flags and the fail-safe halt.

use crate::error::AccessError;
use crate::roles::{Capability, Role};
use serde::{Deserialize, Serialize};

/// Groups of entry points that can be paused independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseFlag {
    /// Repricing and validator-key consumption.
    Core,
    /// Snapshot submission.
    Bot,
    /// Operator key submission.
    Operator,
    /// Exit-queue processing.
    Withdrawals,
}

impl PauseFlag {
    pub const ALL: [PauseFlag; 4] = [
        PauseFlag::Core,
        PauseFlag::Bot,
        PauseFlag::Operator,
        PauseFlag::Withdrawals,
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    pub core: bool,
    pub bot: bool,
    pub operator: bool,
    pub withdrawals: bool,
}

impl PauseState {
    pub fn is_paused(&self, flag: PauseFlag) -> bool {
        match flag {
            PauseFlag::Core => self.core,
            PauseFlag::Bot => self.bot,
            PauseFlag::Operator => self.operator,
            PauseFlag::Withdrawals => self.withdrawals,
        }
    }

    /// Whether every flag is set.
    pub fn is_halted(&self) -> bool {
        PauseFlag::ALL.iter().all(|flag| self.is_paused(*flag))
    }

    pub fn require_not_paused(&self, flag: PauseFlag) -> Result<(), AccessError> {
        if self.is_paused(flag) {
            return Err(AccessError::paused(flag));
        }
        Ok(())
    }

    pub fn pause(&mut self, cap: &Capability, flag: PauseFlag) -> Result<(), AccessError> {
        cap.ensure(Role::Pauser)?;
        self.set(flag, true);
        tracing::info!(?flag, by = %cap.holder(), "paused");
        Ok(())
    }

    pub fn unpause(&mut self, cap: &Capability, flag: PauseFlag) -> Result<(), AccessError> {
        cap.ensure(Role::Unpauser)?;
        self.set(flag, false);
        tracing::info!(?flag, by = %cap.holder(), "unpaused");
        Ok(())
    }

    pub fn pause_all(&mut self, cap: &Capability) -> Result<(), AccessError> {
        cap.ensure(Role::Pauser)?;
        self.set_all(true);
        tracing::info!(by = %cap.holder(), "all methods paused");
        Ok(())
    }

    /// Resume every flag. The only way out of a fail-safe halt.
    pub fn unpause_all(&mut self, cap: &Capability) -> Result<(), AccessError> {
        cap.ensure(Role::Unpauser)?;
        self.set_all(false);
        tracing::info!(by = %cap.holder(), "all methods unpaused");
        Ok(())
    }

    /// Fail-safe: pause everything without a capability.
    ///
    /// Reserved for the oracle path, which calls it when a reprice lowered
    /// the rate.
    pub fn halt(&mut self, reason: &str) {
        self.set_all(true);
        tracing::warn!(reason, "protocol halted");
    }

    fn set(&mut self, flag: PauseFlag, value: bool) {
        match flag {
            PauseFlag::Core => self.core = value,
            PauseFlag::Bot => self.bot = value,
            PauseFlag::Operator => self.operator = value,
            PauseFlag::Withdrawals => self.withdrawals = value,
        }
    }

    fn set_all(&mut self, value: bool) {
        for flag in PauseFlag::ALL {
            self.set(flag, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{AccessControl, RoleRegistry};
    use lsd_types::address_from_byte;

    fn caps() -> (Capability, Capability, Capability) {
        let admin = address_from_byte(1);
        let mut registry = RoleRegistry::with_admin(admin);
        let admin_cap = registry.authorize(Role::PlatformAdmin, &admin).unwrap();
        registry.grant(&admin_cap, Role::Pauser, address_from_byte(2)).unwrap();
        registry.grant(&admin_cap, Role::Unpauser, address_from_byte(3)).unwrap();
        (
            admin_cap,
            registry.authorize(Role::Pauser, &address_from_byte(2)).unwrap(),
            registry.authorize(Role::Unpauser, &address_from_byte(3)).unwrap(),
        )
    }

    #[test]
    fn halt_sets_every_flag() {
        let mut state = PauseState::default();
        assert!(!state.is_halted());
        state.halt("rate decreased");
        assert!(state.is_halted());
        for flag in PauseFlag::ALL {
            assert_eq!(state.require_not_paused(flag), Err(AccessError::paused(flag)));
        }
    }

    #[test]
    fn only_unpauser_resumes() {
        let (admin_cap, pauser_cap, unpauser_cap) = caps();
        let mut state = PauseState::default();
        state.halt("test");

        assert!(state.unpause_all(&admin_cap).is_err());
        assert!(state.unpause_all(&pauser_cap).is_err());
        state.unpause_all(&unpauser_cap).unwrap();
        assert_eq!(state, PauseState::default());
    }

    #[test]
    fn single_flag_pause_is_independent() {
        let (_, pauser_cap, unpauser_cap) = caps();
        let mut state = PauseState::default();
        state.pause(&pauser_cap, PauseFlag::Withdrawals).unwrap();
        assert!(state.is_paused(PauseFlag::Withdrawals));
        assert!(state.require_not_paused(PauseFlag::Core).is_ok());
        assert!(!state.is_halted());

        state.unpause(&unpauser_cap, PauseFlag::Withdrawals).unwrap();
        assert!(!state.withdrawals);
    }
}
