//! How much a kingdom wants a clan to join it.
//!
//! Weaker kingdoms (low power ratio to their enemies) value fresh strength more.
//! The clan leader's reliability amplifies the whole offer.

use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{ClanId, KingdomId};
use crate::model::{Clan, Kingdom};

use super::multipliers::MultiplierFamily;
use super::settlement::clan_settlement_value;
use super::vassal::{clan_strength, ruler_multipliers};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquireTerms {
    pub relation_multiplier: f64,
    pub culture_multiplier: f64,
    pub reliability: f64,
    pub power_ratio: f64,
    /// `1 / clamp(sqrt(power_ratio))`
    pub need_factor: f64,
    pub clan_strength: f64,
    /// Clan holdings scored for the acquiring kingdom.
    pub settlement_value: f64,
    pub settlement_share: f64,
}

impl AcquireTerms {
    pub fn adjusted_strength(&self) -> f64 {
        self.clan_strength * self.need_factor
    }

    pub fn total(&self) -> f64 {
        (self.settlement_value * self.settlement_share + self.adjusted_strength())
            * self.relation_multiplier
            * self.culture_multiplier
            * self.reliability
    }
}

pub fn acquire_terms(ctx: &ValuationContext, kingdom: &Kingdom, clan: &Clan) -> Result<AcquireTerms, ValuationError> {
    let leader = clan.leader.ok_or(ValuationError::MissingLeader(clan.id))?;
    let power_ratio = ctx.capabilities.power.power_ratio_to_enemies(kingdom.id);
    if !power_ratio.is_finite() || power_ratio < 0.0 {
        return Err(ValuationError::InvalidPowerRatio {
            kingdom: kingdom.id,
            value: power_ratio,
        });
    }

    let acquire = &ctx.config.acquire;
    let (relation_multiplier, culture_multiplier) =
        ruler_multipliers(ctx, MultiplierFamily::Kingdom, kingdom, clan);
    let factor = power_ratio
        .sqrt()
        .max(acquire.min_power_factor)
        .min(acquire.max_power_factor);

    let terms = AcquireTerms {
        relation_multiplier,
        culture_multiplier,
        reliability: ctx.capabilities.reliability.reliability_constant(leader),
        power_ratio,
        need_factor: 1.0 / factor,
        clan_strength: clan_strength(&ctx.config.strength, clan),
        settlement_value: clan_settlement_value(ctx, clan, Some(kingdom.id))?,
        settlement_share: acquire.settlement_share,
    };
    tracing::trace!(clan = %clan.id, kingdom = %kingdom.id, ?terms, "acquire terms");
    Ok(terms)
}

/// Value to `kingdom` of `clan` joining it.
pub fn acquire_score(ctx: &ValuationContext, kingdom: KingdomId, clan: ClanId) -> Result<f64, ValuationError> {
    let kingdom = ctx.world.kingdom(kingdom)?;
    let clan = ctx.world.clan(clan)?;
    Ok(acquire_terms(ctx, kingdom, clan)?.total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Capabilities, PowerBalance};
    use crate::config::ValuationConfig;
    use crate::scenario::Scenario;

    struct FixedPower(f64);

    impl PowerBalance for FixedPower {
        fn power_ratio_to_enemies(&self, _: KingdomId) -> f64 {
            self.0
        }
    }

    fn score_with_ratio(ratio: f64) -> Result<AcquireTerms, ValuationError> {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Vlandia");
        let clan = s.clan("Recruit").heroes(2).strength(100.0).id();
        let world = s.build();
        let config = ValuationConfig::default();
        let power = FixedPower(ratio);
        let caps = Capabilities {
            power: &power,
            ..Capabilities::from_snapshot(&world)
        };
        let ctx = ValuationContext::new(&world, &config).with_capabilities(caps);
        acquire_terms(&ctx, world.kingdom(realm.kingdom).unwrap(), world.clan(clan).unwrap())
    }

    #[test]
    fn need_factor_clamps() {
        assert!((score_with_ratio(0.0).unwrap().need_factor - 2.5).abs() < 1e-9);
        assert!((score_with_ratio(0.04).unwrap().need_factor - 2.5).abs() < 1e-9);
        assert!((score_with_ratio(1.0).unwrap().need_factor - 1.0).abs() < 1e-9);
        assert!((score_with_ratio(4.0).unwrap().need_factor - 0.5).abs() < 1e-9);
        assert!((score_with_ratio(100.0).unwrap().need_factor - 0.4).abs() < 1e-9);
    }

    #[test]
    fn weaker_kingdom_values_strength_more() {
        let weak = score_with_ratio(0.5).unwrap().total();
        let strong = score_with_ratio(3.0).unwrap().total();
        assert!(weak > strong);
    }

    #[test]
    fn invalid_power_ratio_is_rejected() {
        assert!(matches!(
            score_with_ratio(f64::NAN),
            Err(ValuationError::InvalidPowerRatio { .. })
        ));
        assert!(matches!(
            score_with_ratio(-1.0),
            Err(ValuationError::InvalidPowerRatio { .. })
        ));
        assert!(matches!(
            score_with_ratio(f64::INFINITY),
            Err(ValuationError::InvalidPowerRatio { .. })
        ));
    }

    #[test]
    fn total_follows_formula() {
        let terms = score_with_ratio(1.0).unwrap();
        assert!((terms.clan_strength - (100.0 + 300.0) * 10.0).abs() < 1e-9);
        let expected = (terms.settlement_value * 0.1 + terms.clan_strength)
            * terms.relation_multiplier
            * terms.culture_multiplier
            * terms.reliability;
        assert!((terms.total() - expected).abs() < 1e-9);
    }

    #[test]
    fn kingdom_family_culture_pair_applies() {
        let mut s = Scenario::new();
        let home = s.add_culture();
        let abroad = s.add_culture();
        let realm = s.add_kingdom_with_culture("Battania", home);
        let kin = s.clan("Kin").culture(home).id();
        let stranger = s.clan("Stranger").culture(abroad).id();
        let world = s.build();
        let config = ValuationConfig::default();
        let ctx = ValuationContext::new(&world, &config);

        let kin_score = acquire_score(&ctx, realm.kingdom, kin).unwrap();
        let stranger_score = acquire_score(&ctx, realm.kingdom, stranger).unwrap();
        assert!((kin_score - 2.0 * stranger_score).abs() < 1e-6);
    }

    #[test]
    fn relation_uses_linear_kingdom_curve() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Aserai");
        let clan = s.clan("Clan").id();
        s.relation(realm.ruling_clan, clan, 20.0);
        let world = s.build();
        let config = ValuationConfig::default();
        let ctx = ValuationContext::new(&world, &config);

        let terms = acquire_terms(&ctx, world.kingdom(realm.kingdom).unwrap(), world.clan(clan).unwrap()).unwrap();
        assert!((terms.relation_multiplier - 1.4).abs() < 1e-9);
    }

    #[test]
    fn acquiring_needs_a_leader() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Sturgia");
        let clan = s.clan("Headless").without_leader().id();
        let world = s.build();
        let config = ValuationConfig::default();
        let ctx = ValuationContext::new(&world, &config);

        assert_eq!(
            acquire_score(&ctx, realm.kingdom, clan).unwrap_err(),
            ValuationError::MissingLeader(clan)
        );
    }
}
