//! Nullable token: an in-memory balance sheet.

use lsd_types::{Address, TokenLedger};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct NullToken {
    supply: u128,
    balances: HashMap<Address, u128>,
    mints: Vec<(Address, u128)>,
}

impl NullToken {
    /// A token whose existing supply is held by nobody in particular.
    pub fn with_supply(supply: u128) -> Self {
        Self {
            supply,
            ..Self::default()
        }
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Simulate holders depositing or redeeming outside the core.
    pub fn set_supply(&mut self, supply: u128) {
        self.supply = supply;
    }

    /// Every mint in call order.
    pub fn mints(&self) -> &[(Address, u128)] {
        &self.mints
    }
}

impl TokenLedger for NullToken {
    fn total_supply(&self) -> u128 {
        self.supply
    }

    fn mint(&mut self, to: &Address, amount: u128) {
        self.supply = self.supply.saturating_add(amount);
        let balance = self.balances.entry(*to).or_default();
        *balance = balance.saturating_add(amount);
        self.mints.push((*to, amount));
    }
}
