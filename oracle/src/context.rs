use lsd_access::PauseState;
use lsd_registry::NodeOperatorRegistry;
use lsd_repricing::RepricingEngine;
use lsd_types::{DepositPool, ExitQueue, ReserveAttestation, TokenLedger};

/// Everything a snapshot submission reads or writes besides the validator itself.
pub struct OracleContext<'a> {
    pub engine: &'a mut RepricingEngine,
    pub registry: &'a mut NodeOperatorRegistry,
    pub pause: &'a mut PauseState,
    pub token: &'a mut dyn TokenLedger,
    pub deposits: &'a dyn DepositPool,
    pub exits: &'a mut dyn ExitQueue,
    /// Proof-of-reserve feed, if one is connected.
    pub attestation: Option<&'a dyn ReserveAttestation>,
}
