//! How a clan values joining or leaving a kingdom as a vassal.
//!
//! Each valuation first gathers its named terms, then combines them in one
//! expression (`total`). Multipliers apply to the accumulated pie/penalty terms
//! only; the settlement delta and the crowding penalty are added afterwards.

use crate::config::{LeaveConfig, StrengthConfig};
use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{ClanId, KingdomId};
use crate::model::{Clan, Kingdom};

use super::IMPOSSIBLE;
use super::multipliers::{MultiplierFamily, culture_multiplier, relation_multiplier};
use super::settlement::{clan_settlement_value, kingdom_fortification_value};
use super::war::war_multiplier;

/// Commander heroes of every member clan that counts toward sharing the kingdom's land:
/// non-mercenary clans, plus the player clan even when it is a mercenary.
pub fn kingdom_commander_heroes(ctx: &ValuationContext, kingdom: &Kingdom) -> Result<u32, ValuationError> {
    let player = ctx.world.player_clan();
    kingdom.clans.iter().try_fold(0u32, |acc, &id| {
        let member = ctx.world.clan(id)?;
        let counts = !member.is_minor_faction || player == Some(member.id);
        Ok(if counts { acc + member.commander_heroes } else { acc })
    })
}

/// `(total strength + per_hero * heroes) * scale`
pub fn clan_strength(config: &StrengthConfig, clan: &Clan) -> f64 {
    (clan.total_strength + config.per_hero * clan.commander_heroes as f64) * config.scale
}

/// Penalty for changing faction again `days` after the last change.
///
/// Largest at 0 days, shrinking to exactly 0 once `cooldown_days` have passed.
pub fn cooldown_penalty(config: &LeaveConfig, days: f64) -> f64 {
    let elapsed = days.max(0.0).min(config.cooldown_days);
    config.cooldown_scale * (config.cooldown_days.sqrt() - elapsed.sqrt())
}

/// Relation and culture multipliers between a kingdom's ruler and a clan.
pub(crate) fn ruler_multipliers(
    ctx: &ValuationContext,
    family: MultiplierFamily,
    kingdom: &Kingdom,
    clan: &Clan,
) -> (f64, f64) {
    let relation = ctx
        .capabilities
        .relations
        .relation_between(kingdom.ruling_clan, clan.id);
    (
        relation_multiplier(relation, family.relation(ctx.config)),
        culture_multiplier(kingdom.culture, clan.culture, family.culture(ctx.config)),
    )
}

/// Land value per hero if `incoming` more heroes shared the kingdom's fortifications.
fn fortification_per_hero(
    ctx: &ValuationContext,
    kingdom: &Kingdom,
    incoming: u32,
) -> Result<(f64, u32), ValuationError> {
    let total = kingdom_fortification_value(ctx, kingdom)?;
    let existing = kingdom_commander_heroes(ctx, kingdom)?;
    let denominator = (existing + incoming).max(1);
    Ok((total / denominator as f64, existing))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinTerms {
    pub relation_multiplier: f64,
    pub culture_multiplier: f64,
    pub incoming_heroes: u32,
    pub existing_heroes: u32,
    /// 0 for mercenary clans.
    pub fortification_per_hero: f64,
    pub fortification_share: f64,
    pub war_multiplier: f64,
    pub settlement_value_before: f64,
    pub settlement_value_after: f64,
    /// 0 for mercenary clans.
    pub crowding_penalty: f64,
}

impl JoinTerms {
    /// Expected slice of the kingdom's land.
    pub fn land_share(&self) -> f64 {
        self.fortification_per_hero
            * (self.incoming_heroes as f64).sqrt()
            * self.fortification_share
            * self.war_multiplier
    }

    pub fn settlement_delta(&self) -> f64 {
        self.settlement_value_after - self.settlement_value_before
    }

    pub fn total(&self) -> f64 {
        self.land_share() * self.relation_multiplier * self.culture_multiplier
            + self.settlement_delta()
            - self.crowding_penalty
    }
}

/// Named terms of a clan's join valuation. Does not apply the ruler guard.
pub fn join_terms(ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> Result<JoinTerms, ValuationError> {
    let (relation_multiplier, culture_multiplier) =
        ruler_multipliers(ctx, MultiplierFamily::Vassal, kingdom, clan);
    let settlement_value_before = clan_settlement_value(ctx, clan, None)?;
    let settlement_value_after = clan_settlement_value(ctx, clan, Some(kingdom.id))?;

    let mut terms = JoinTerms {
        relation_multiplier,
        culture_multiplier,
        incoming_heroes: clan.commander_heroes,
        existing_heroes: 0,
        fortification_per_hero: 0.0,
        fortification_share: ctx.config.join.fortification_share,
        war_multiplier: 1.0,
        settlement_value_before,
        settlement_value_after,
        crowding_penalty: 0.0,
    };

    if !clan.is_minor_faction {
        let (per_hero, existing) = fortification_per_hero(ctx, kingdom, clan.commander_heroes)?;
        terms.existing_heroes = existing;
        terms.fortification_per_hero = per_hero;
        terms.crowding_penalty = ctx.config.join.crowding_penalty_per_hero_squared
            * (existing as f64) * (existing as f64);
        terms.war_multiplier = war_multiplier(ctx, clan, kingdom);
    }

    tracing::trace!(clan = %clan.id, kingdom = %kingdom.id, ?terms, "join terms");
    Ok(terms)
}

/// How much `clan` wants to join `kingdom` as a vassal.
///
/// [`IMPOSSIBLE`] when the clan rules its own kingdom: a ruler joins nobody.
pub fn join_score(ctx: &ValuationContext, clan: ClanId, kingdom: KingdomId) -> Result<f64, ValuationError> {
    let clan = ctx.world.clan(clan)?;
    let kingdom = ctx.world.kingdom(kingdom)?;
    if let Some(own) = clan.kingdom
        && ctx.world.kingdom(own)?.is_ruled_by(clan.id)
    {
        return Ok(IMPOSSIBLE);
    }
    Ok(join_terms(ctx, clan, kingdom)?.total())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaveTerms {
    pub relation_multiplier: f64,
    pub culture_multiplier: f64,
    pub departing_heroes: u32,
    /// 0 for mercenary clans.
    pub fortification_per_hero: f64,
    pub fortification_share: f64,
    pub war_multiplier: f64,
    pub reliability: f64,
    /// `base + per_town * towns`, before reliability.
    pub town_multiplier: f64,
    pub clan_strength: f64,
    pub cooldown_penalty: f64,
    /// Value of the clan's holdings inside the kingdom.
    pub settlement_value_before: f64,
    /// Value of the same holdings standing alone.
    pub settlement_value_after: f64,
}

impl LeaveTerms {
    /// Land share the clan gives up by leaving.
    pub fn forfeited_land_share(&self) -> f64 {
        self.fortification_per_hero
            * (self.departing_heroes as f64).sqrt()
            * self.fortification_share
            * self.war_multiplier
    }

    pub fn town_penalty(&self) -> f64 {
        self.town_multiplier * self.reliability
    }

    pub fn strength_penalty(&self) -> f64 {
        self.clan_strength * self.reliability
    }

    pub fn settlement_delta(&self) -> f64 {
        self.settlement_value_after - self.settlement_value_before
    }

    pub fn total(&self) -> f64 {
        let penalties = self.forfeited_land_share()
            + self.town_penalty()
            + self.strength_penalty()
            + self.cooldown_penalty;
        -penalties * self.relation_multiplier * self.culture_multiplier + self.settlement_delta()
    }
}

/// Terms shared by the vassal and mercenary departures: multipliers, land share
/// and settlement delta. Honor, strength and cooldown terms are left at zero.
pub fn departure_terms(ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> Result<LeaveTerms, ValuationError> {
    let (relation_multiplier, culture_multiplier) =
        ruler_multipliers(ctx, MultiplierFamily::Vassal, kingdom, clan);
    let settlement_value_before = clan_settlement_value(ctx, clan, Some(kingdom.id))?;
    let settlement_value_after = clan_settlement_value(ctx, clan, None)?;

    let mut terms = LeaveTerms {
        relation_multiplier,
        culture_multiplier,
        departing_heroes: clan.commander_heroes,
        fortification_per_hero: 0.0,
        fortification_share: ctx.config.join.fortification_share,
        war_multiplier: 1.0,
        reliability: 0.0,
        town_multiplier: 0.0,
        clan_strength: 0.0,
        cooldown_penalty: 0.0,
        settlement_value_before,
        settlement_value_after,
    };

    if !clan.is_minor_faction {
        let (per_hero, _) = fortification_per_hero(ctx, kingdom, clan.commander_heroes)?;
        terms.fortification_per_hero = per_hero;
        terms.war_multiplier = war_multiplier(ctx, clan, kingdom);
    }
    Ok(terms)
}

/// Named terms of a vassal clan's leave valuation.
pub fn leave_terms(ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> Result<LeaveTerms, ValuationError> {
    let leader = clan.leader.ok_or(ValuationError::MissingLeader(clan.id))?;
    let days = ctx.world.now().days_since(clan.last_faction_change);
    if days < 0.0 {
        return Err(ValuationError::FactionChangeInFuture {
            clan: clan.id,
            days_ahead: -days,
        });
    }

    let leave = &ctx.config.leave;
    let mut terms = departure_terms(ctx, clan, kingdom)?;
    terms.reliability = ctx.capabilities.reliability.reliability_constant(leader);
    terms.town_multiplier = leave.town_penalty_base + leave.town_penalty_per_town * clan.towns_count as f64;
    terms.clan_strength = clan_strength(&ctx.config.strength, clan);
    terms.cooldown_penalty = cooldown_penalty(leave, days);

    tracing::trace!(clan = %clan.id, kingdom = %kingdom.id, ?terms, "leave terms");
    Ok(terms)
}

/// How much a vassal `clan` wants to leave `kingdom` and stand alone.
pub fn leave_score(ctx: &ValuationContext, clan: ClanId, kingdom: KingdomId) -> Result<f64, ValuationError> {
    let clan = ctx.world.clan(clan)?;
    let kingdom = ctx.world.kingdom(kingdom)?;
    Ok(leave_terms(ctx, clan, kingdom)?.total())
}
