use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{ClanId, FactionId, KingdomId};
use crate::valuation::{IMPOSSIBLE, acquire_score, clan_settlement_value, join_score};

use super::leave::LeaveKingdomAsClan;
use super::{Barterable, Perspective};

/// A clan joining a kingdom as a vassal. Only a kingdom `target` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinKingdomAsClan {
    pub owner: ClanId,
    pub target: Option<FactionId>,
}

impl JoinKingdomAsClan {
    fn target_kingdom(&self) -> Option<KingdomId> {
        self.target.and_then(FactionId::as_kingdom)
    }

    /// The clan's own view: joining, plus what leaving its current kingdom costs.
    fn owner_value(&self, ctx: &ValuationContext, target: KingdomId) -> Result<f64, ValuationError> {
        let join = join_score(ctx, self.owner, target)?;
        if join == IMPOSSIBLE {
            return Ok(join);
        }
        let clan = ctx.world.clan(self.owner)?;
        let Some(current) = clan.kingdom else {
            return Ok(join);
        };

        let mut leave = LeaveKingdomAsClan {
            owner: self.owner,
            target: None,
        }
        .value_for(ctx, FactionId::Clan(self.owner))?;
        // Holdings go with the clan only when it defects to a kingdom at war with its old one.
        if !ctx
            .capabilities
            .diplomacy
            .is_at_war(FactionId::Kingdom(target), FactionId::Kingdom(current))
        {
            leave -= clan_settlement_value(ctx, clan, Some(current))?;
        }
        Ok(join + leave)
    }
}

impl Barterable for JoinKingdomAsClan {
    fn classify(&self, _ctx: &ValuationContext, requester: FactionId) -> Result<Perspective, ValuationError> {
        let perspective = if requester == FactionId::Clan(self.owner) {
            Perspective::Owner
        } else if self.target_kingdom().is_some() && Some(requester) == self.target {
            Perspective::DirectTarget
        } else {
            Perspective::UnrelatedThirdParty
        };
        Ok(perspective)
    }

    fn value_for(&self, ctx: &ValuationContext, requester: FactionId) -> Result<f64, ValuationError> {
        let unavailable = ctx.config.barter.unavailable_value;
        let Some(target) = self.target_kingdom() else {
            tracing::debug!(clan = %self.owner, target = ?self.target, "join target is not a kingdom");
            return Ok(unavailable);
        };

        let perspective = self.classify(ctx, requester)?;
        let value = match perspective {
            Perspective::Owner => self.owner_value(ctx, target)?,
            Perspective::DirectTarget => acquire_score(ctx, target, self.owner)?,
            _ => unavailable,
        };
        tracing::debug!(
            clan = %self.owner,
            kingdom = %target,
            %requester,
            ?perspective,
            value,
            "join valued"
        );
        Ok(value)
    }
}
