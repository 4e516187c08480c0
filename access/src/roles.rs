//! Roles, capabilities and the in-memory role registry.

use crate::error::AccessError;
use lsd_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Permission roles recognised by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Operator registry CRUD, parameter setters and role management.
    PlatformAdmin,
    /// Off-chain reporter allowed to submit snapshots.
    Bot,
    /// Allowed to call the repricing engine directly.
    Repricer,
    /// The deposit collaborator that consumes pending validator keys.
    DepositManager,
    Pauser,
    Unpauser,
}

/// Proof that `holder` held `role` when the capability was issued.
///
/// Only [`AccessControl::authorize`] can construct one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capability {
    role: Role,
    holder: Address,
}

impl Capability {
    pub(crate) fn new(role: Role, holder: Address) -> Self {
        Self { role, holder }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn holder(&self) -> Address {
        self.holder
    }

    /// Fail unless this capability was issued for `required`.
    pub fn ensure(&self, required: Role) -> Result<(), AccessError> {
        if self.role != required {
            return Err(AccessError::WrongCapability {
                required,
                held: self.role,
            });
        }
        Ok(())
    }
}

/// The role/permission collaborator.
pub trait AccessControl {
    fn has_role(&self, role: Role, account: &Address) -> bool;

    /// Check `caller` holds `role` and hand out the matching capability.
    fn authorize(&self, role: Role, caller: &Address) -> Result<Capability, AccessError> {
        if !self.has_role(role, caller) {
            return Err(AccessError::AccessDenied {
                role,
                account: *caller,
            });
        }
        Ok(Capability::new(role, *caller))
    }
}

/// Role assignments held in memory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleRegistry {
    members: HashMap<Role, HashSet<Address>>,
}

impl RoleRegistry {
    /// A registry whose only member is `admin` as platform admin.
    pub fn with_admin(admin: Address) -> Self {
        let mut members = HashMap::new();
        members.insert(Role::PlatformAdmin, HashSet::from([admin]));
        Self { members }
    }

    pub fn grant(&mut self, cap: &Capability, role: Role, account: Address) -> Result<(), AccessError> {
        cap.ensure(Role::PlatformAdmin)?;
        if self.members.entry(role).or_default().insert(account) {
            tracing::info!(?role, %account, granted_by = %cap.holder(), "role granted");
        }
        Ok(())
    }

    pub fn revoke(&mut self, cap: &Capability, role: Role, account: &Address) -> Result<(), AccessError> {
        cap.ensure(Role::PlatformAdmin)?;
        let Some(holders) = self.members.get_mut(&role) else {
            return Ok(());
        };
        if role == Role::PlatformAdmin && holders.len() == 1 && holders.contains(account) {
            return Err(AccessError::LastAdmin);
        }
        if holders.remove(account) {
            tracing::info!(?role, %account, revoked_by = %cap.holder(), "role revoked");
        }
        Ok(())
    }

    pub fn members(&self, role: Role) -> Vec<Address> {
        let mut out: Vec<Address> = self
            .members
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        out.sort();
        out
    }
}

impl AccessControl for RoleRegistry {
    fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members
            .get(&role)
            .is_some_and(|holders| holders.contains(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsd_types::address_from_byte;

    #[test]
    fn authorize_requires_membership() {
        let admin = address_from_byte(1);
        let registry = RoleRegistry::with_admin(admin);
        let cap = registry.authorize(Role::PlatformAdmin, &admin).unwrap();
        assert_eq!(cap.role(), Role::PlatformAdmin);
        assert_eq!(cap.holder(), admin);

        let err = registry.authorize(Role::Bot, &admin).unwrap_err();
        assert_eq!(
            err,
            AccessError::AccessDenied {
                role: Role::Bot,
                account: admin
            }
        );
    }

    #[test]
    fn grant_and_revoke_need_admin_capability() {
        let admin = address_from_byte(1);
        let bot = address_from_byte(2);
        let mut registry = RoleRegistry::with_admin(admin);
        let admin_cap = registry.authorize(Role::PlatformAdmin, &admin).unwrap();

        registry.grant(&admin_cap, Role::Bot, bot).unwrap();
        let bot_cap = registry.authorize(Role::Bot, &bot).unwrap();

        // A bot cannot hand out roles.
        assert!(matches!(
            registry.grant(&bot_cap, Role::Pauser, bot),
            Err(AccessError::WrongCapability { .. })
        ));

        registry.revoke(&admin_cap, Role::Bot, &bot).unwrap();
        assert!(!registry.has_role(Role::Bot, &bot));
    }

    #[test]
    fn last_admin_cannot_be_revoked() {
        let admin = address_from_byte(1);
        let mut registry = RoleRegistry::with_admin(admin);
        let cap = registry.authorize(Role::PlatformAdmin, &admin).unwrap();
        assert_eq!(
            registry.revoke(&cap, Role::PlatformAdmin, &admin),
            Err(AccessError::LastAdmin)
        );
    }

    #[test]
    fn capability_ensure_matches_role_exactly() {
        let admin = address_from_byte(1);
        let registry = RoleRegistry::with_admin(admin);
        let cap = registry.authorize(Role::PlatformAdmin, &admin).unwrap();
        assert!(cap.ensure(Role::PlatformAdmin).is_ok());
        assert!(cap.ensure(Role::Repricer).is_err());
    }
}
