//! Repricing engine for the liquid staking token.
//!
//! A reprice turns newly earned consensus rewards into a new token/ETH rate.
//! The protocol's fee slice of those rewards is minted as new tokens, split
//! between node operators (pro rata to active validators) and the treasury,
//! so existing holders are diluted by exactly the fee and nothing else.
//!
//! The engine is two-phase: [`RepricingEngine::plan`] performs every check
//! and computes the full outcome without side effects, and
//! [`RepricingEngine::commit`] applies a plan. Callers that need to validate
//! the outcome before mutating anything (the snapshot oracle) use the two
//! halves directly; everyone else calls [`RepricingEngine::reprice`].

pub mod distribution;
pub mod engine;
pub mod error;
pub mod event;
pub mod formula;

pub use distribution::{distribute, Distribution, Payout};
pub use engine::{RepricePlan, RepricingEngine};
pub use error::RepricingError;
pub use event::RepriceEvent;
pub use formula::{quote, RepriceQuote};
pub use lsd_types::TokenLedger;
