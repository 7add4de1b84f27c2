use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{ClanId, FactionId};
use crate::model::{Clan, Kingdom};
use crate::valuation::{clan_strength, leave_terms};

use super::{Barterable, Perspective};

/// A clan leaving its current kingdom. `target` of `None` means independence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveKingdomAsClan {
    pub owner: ClanId,
    pub target: Option<FactionId>,
}

impl LeaveKingdomAsClan {
    fn parties<'w>(&self, ctx: &ValuationContext<'w>) -> Result<(&'w Clan, &'w Kingdom), ValuationError> {
        let clan = ctx.world.clan(self.owner)?;
        let kingdom = clan.kingdom.ok_or(ValuationError::NotInKingdom(clan.id))?;
        Ok((clan, ctx.world.kingdom(kingdom)?))
    }
}

/// The clan's own view of leaving, through the mercenary or vassal valuator.
pub(crate) fn departure_value(ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> Result<f64, ValuationError> {
    if clan.is_under_mercenary_service() {
        ctx.mercenary.score(ctx, clan, kingdom)
    } else {
        Ok(leave_terms(ctx, clan, kingdom)?.total())
    }
}

impl Barterable for LeaveKingdomAsClan {
    fn classify(&self, ctx: &ValuationContext, requester: FactionId) -> Result<Perspective, ValuationError> {
        let (clan, kingdom) = self.parties(ctx)?;
        let losing = FactionId::Kingdom(kingdom.id);
        let perspective = if requester == FactionId::Clan(clan.id) {
            Perspective::Owner
        } else if requester == losing {
            Perspective::OwnFactionLosing
        } else if !requester.is_clan() && ctx.capabilities.diplomacy.is_at_war(requester, losing) {
            Perspective::RivalFaction
        } else {
            Perspective::UnrelatedThirdParty
        };
        Ok(perspective)
    }

    fn value_for(&self, ctx: &ValuationContext, requester: FactionId) -> Result<f64, ValuationError> {
        let (clan, kingdom) = self.parties(ctx)?;
        let perspective = self.classify(ctx, requester)?;
        let value = match perspective {
            Perspective::Owner => departure_value(ctx, clan, kingdom)?,
            Perspective::OwnFactionLosing => -departure_value(ctx, clan, kingdom)?,
            Perspective::RivalFaction => departure_value(ctx, clan, kingdom)?,
            Perspective::DirectTarget | Perspective::UnrelatedThirdParty => {
                let barter = &ctx.config.barter;
                let losing = FactionId::Kingdom(kingdom.id);
                let diplomacy = ctx.capabilities.diplomacy;
                let factor = if diplomacy.is_at_war(requester, losing) {
                    barter.enemy_reward
                } else if diplomacy.is_allied(requester, losing) {
                    barter.ally_penalty
                } else {
                    barter.bystander_reward
                };
                factor * clan_strength(&ctx.config.strength, clan)
            }
        };
        tracing::debug!(
            clan = %clan.id,
            kingdom = %kingdom.id,
            %requester,
            ?perspective,
            value,
            "leave valued"
        );
        Ok(value)
    }
}
