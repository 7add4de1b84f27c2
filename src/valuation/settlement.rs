//! Geographic value of settlements to a candidate faction.
//!
//! A settlement is worth its culture-adjusted prosperity scaled by a proximity
//! factor `sqrt(map mean distance / mean distance to nearest peers)`, clamped
//! to the configured range. Peers are the other settlements of the same owning
//! clan plus, when a candidate kingdom is given, every settlement on the map
//! already under that kingdom. Tighter clustering among peers raises the value;
//! a settlement with no peer at all gets the floor.

use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{FactionId, KingdomId};
use crate::model::{Clan, Kingdom, Settlement};

/// Peer set for `settlement` when scored for `candidate` (`None` = independent).
fn peers<'w>(
    ctx: &ValuationContext<'w>,
    settlement: &Settlement,
    candidate: Option<KingdomId>,
) -> Vec<&'w Settlement> {
    let world = ctx.world;
    world
        .settlements()
        .filter(|other| other.id != settlement.id)
        .filter(|other| {
            let same_owner = settlement.owner.is_some() && other.owner == settlement.owner;
            let under_candidate = candidate.is_some_and(|k| {
                world.settlement_map_faction(other) == Some(FactionId::Kingdom(k))
            });
            same_owner || under_candidate
        })
        .collect()
}

/// Proximity factor of `settlement` to its peers under `candidate`.
pub fn proximity_factor(
    ctx: &ValuationContext,
    settlement: &Settlement,
    candidate: Option<KingdomId>,
) -> f64 {
    let cfg = &ctx.config.settlement;
    let geometry = ctx.capabilities.geometry;
    let map_mean = geometry.average_settlement_distance();
    let peers = peers(ctx, settlement, candidate);

    match geometry.k_nearest_mean_distance(settlement, &peers, cfg.neighbor_count) {
        Some(neighbor_mean) if map_mean > 0.0 => (map_mean / neighbor_mean.max(f64::MIN_POSITIVE))
            .sqrt()
            .max(cfg.min_proximity)
            .min(cfg.max_proximity),
        _ => cfg.min_proximity,
    }
}

/// Value of one settlement to `candidate`, or to its owner standing alone when `None`.
pub fn settlement_value(
    ctx: &ValuationContext,
    settlement: &Settlement,
    candidate: Option<KingdomId>,
) -> Result<f64, ValuationError> {
    let culture = match candidate {
        Some(k) => ctx.world.kingdom(k)?.culture,
        None => match settlement.owner {
            Some(owner) => ctx.world.clan(owner)?.culture,
            None => settlement.culture,
        },
    };
    let prosperity = ctx
        .capabilities
        .prosperity
        .culture_adjusted_prosperity(settlement, culture);
    Ok(proximity_factor(ctx, settlement, candidate) * prosperity)
}

/// Sum of [`settlement_value`] over every settlement the clan holds.
pub fn clan_settlement_value(
    ctx: &ValuationContext,
    clan: &Clan,
    candidate: Option<KingdomId>,
) -> Result<f64, ValuationError> {
    clan.settlements.iter().try_fold(0.0, |acc, &id| {
        let settlement = ctx.world.settlement(id)?;
        Ok(acc + settlement_value(ctx, settlement, candidate)?)
    })
}

/// Value of every fortification held by the kingdom's members, scored for the kingdom.
pub fn kingdom_fortification_value(
    ctx: &ValuationContext,
    kingdom: &Kingdom,
) -> Result<f64, ValuationError> {
    kingdom.fortifications.iter().try_fold(0.0, |acc, &id| {
        let settlement = ctx.world.settlement(id)?;
        Ok(acc + settlement_value(ctx, settlement, Some(kingdom.id))?)
    })
}
