use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::model::{Clan, Kingdom};

/// Valuation of a mercenary clan ending its service with a kingdom.
///
/// Hosts may replace the default through [`ValuationContext::with_mercenary_valuator`].
pub trait MercenaryLeaveValuator: Send + Sync {
    fn score(&self, ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> Result<f64, ValuationError>;
}

/// Departure without honor, strength or cooldown terms.
///
/// Mercenaries hold no land share in the kingdom, so the score reduces to the
/// settlement delta of standing alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralMercenaryLeave;

impl MercenaryLeaveValuator for StructuralMercenaryLeave {
    fn score(&self, ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> Result<f64, ValuationError> {
        let terms = super::vassal::departure_terms(ctx, clan, kingdom)?;
        tracing::trace!(clan = %clan.id, kingdom = %kingdom.id, ?terms, "mercenary leave terms");
        Ok(terms.total())
    }
}
