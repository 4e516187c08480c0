//! Node operator and validator key registry.
//!
//! Each operator owns an ordered, partitioned array of validator keys:
//! indices `[0, active_count)` have been submitted to the deposit contract,
//! `[active_count, len)` are pending. Every insert and removal preserves
//! that partition and keeps two global indexes in step:
//!
//! - `pubkey → (operator id, position)` for O(1) ownership lookup and removal
//! - the set of `(operator id, position)` pairs of all *active* keys, used for
//!   proof-of-reserve listings
//!
//! Key selection for new deposits always picks the enabled operator with the
//! fewest active-plus-already-selected keys.

pub mod error;
pub mod operator;
pub mod registry;
pub mod selection;
pub mod validators;

pub use error::RegistryError;
pub use operator::{Operator, OperatorId, NO_OPERATOR};
pub use registry::{ActiveKeyRef, NodeOperatorRegistry};
