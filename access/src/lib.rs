//! Access control for the LSD core.
//!
//! Every mutating entry point first obtains a [`Capability`] for the role it
//! requires from an [`AccessControl`] implementation, before any other
//! validation. Components then check the capability they are handed instead
//! of trusting an implicit caller identity.
//!
//! [`PauseState`] holds the protocol pause flags, including the fail-safe
//! halt that the oracle trips when a reprice would lower the token value.

pub mod error;
pub mod pause;
pub mod roles;

pub use error::AccessError;
pub use pause::{PauseFlag, PauseState};
pub use roles::{AccessControl, Capability, Role, RoleRegistry};
