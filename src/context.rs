use crate::capability::Capabilities;
use crate::config::ValuationConfig;
use crate::model::WorldSnapshot;
use crate::valuation::mercenary::{MercenaryLeaveValuator, StructuralMercenaryLeave};

static STRUCTURAL_MERCENARY_LEAVE: StructuralMercenaryLeave = StructuralMercenaryLeave;

/// Everything one valuation call reads.
///
/// Bundled so valuators take a single argument; cheap to copy and safe to share
/// across worker threads as long as the snapshot is not mutated underneath it.
#[derive(Clone, Copy)]
pub struct ValuationContext<'a> {
    pub world: &'a WorldSnapshot,
    pub capabilities: Capabilities<'a>,
    pub config: &'a ValuationConfig,
    /// Scores a mercenary clan's departure from its employer.
    pub mercenary: &'a dyn MercenaryLeaveValuator,
}

impl<'a> ValuationContext<'a> {
    /// Context backed entirely by the snapshot, with the structural mercenary valuator.
    pub fn new(world: &'a WorldSnapshot, config: &'a ValuationConfig) -> Self {
        Self {
            world,
            capabilities: Capabilities::from_snapshot(world),
            config,
            mercenary: &STRUCTURAL_MERCENARY_LEAVE,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities<'a>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_mercenary_valuator(mut self, valuator: &'a dyn MercenaryLeaveValuator) -> Self {
        self.mercenary = valuator;
        self
    }
}
