//! War outlook: how likely a kingdom is to keep the land it currently holds.
//!
//! Disabled by default. When enabled it scales the fortification share a clan
//! expects from a kingdom, so clans drift away from kingdoms that are losing.

use crate::config::WarOutlookConfig;
use crate::context::ValuationContext;
use crate::id::FactionId;
use crate::model::{Clan, Kingdom, WarSide};

/// Score earned by `side` in one war against `enemy`.
///
/// Weighted renown, raids, sieges and enemy casualties, scaled by the share of
/// all casualties that fell on the enemy.
pub fn side_war_score(config: &WarOutlookConfig, side: &WarSide, enemy: &WarSide) -> f64 {
    let score = side.renown * config.renown_weight
        + side.raids as f64 * config.raid_weight
        + side.sieges as f64 * config.siege_weight
        + enemy.casualties as f64 * config.casualty_weight;
    let total_casualties = side.casualties + enemy.casualties;
    let casualty_share = if total_casualties > 0 {
        enemy.casualties as f64 / total_casualties as f64
    } else {
        1.0
    };
    score * casualty_share
}

/// Multiplier on the fortification share `clan` expects from `kingdom`.
pub fn war_multiplier(ctx: &ValuationContext, clan: &Clan, kingdom: &Kingdom) -> f64 {
    let config = &ctx.config.war_outlook;
    if !config.enabled {
        return 1.0;
    }

    let own = FactionId::Kingdom(kingdom.id);
    let mut kingdom_score = ctx.world.kingdom_strength(kingdom);
    let mut opposition_score = 0.0;
    let mut at_war = false;

    for war in ctx.world.wars() {
        let Some((own_side, enemy_side)) = war.sides_for(own) else {
            continue;
        };
        at_war = true;
        opposition_score += ctx.world.faction_strength(enemy_side.faction);
        kingdom_score += side_war_score(config, own_side, enemy_side);
        opposition_score += side_war_score(config, enemy_side, own_side);
    }

    if !at_war {
        return 1.0;
    }
    if opposition_score <= 0.0 {
        return config.max_multiplier;
    }

    let ratio = kingdom_score / opposition_score;
    // Clans do not abandon a kingdom of their own culture for losing a war.
    if ratio < 1.0 && clan.culture == kingdom.culture {
        return 1.0;
    }
    ratio.max(0.0).min(config.max_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValuationConfig;
    use crate::id::KingdomId;
    use crate::scenario::Scenario;

    fn enabled() -> ValuationConfig {
        let mut config = ValuationConfig::default();
        config.war_outlook.enabled = true;
        config
    }

    fn side(faction: FactionId, renown: f64, raids: u32, sieges: u32, casualties: u32) -> WarSide {
        WarSide {
            faction,
            renown,
            raids,
            sieges,
            casualties,
        }
    }

    #[test]
    fn side_score_weights_and_casualty_share() {
        let config = WarOutlookConfig::default();
        let a = side(FactionId::Kingdom(KingdomId(1)), 10.0, 2, 1, 30);
        let b = side(FactionId::Kingdom(KingdomId(2)), 0.0, 0, 0, 90);
        // (10 + 100 + 300 + 90) * 90 / 120
        assert!((side_war_score(&config, &a, &b) - 375.0).abs() < 1e-9);
        // (0 + 30) * 30 / 120
        assert!((side_war_score(&config, &b, &a) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn no_casualties_keeps_full_score() {
        let config = WarOutlookConfig::default();
        let a = side(FactionId::Kingdom(KingdomId(1)), 5.0, 1, 0, 0);
        let b = side(FactionId::Kingdom(KingdomId(2)), 0.0, 0, 0, 0);
        assert!((side_war_score(&config, &a, &b) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_or_peaceful_is_neutral() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Calm");
        let clan = s.clan("Clan").id();
        let world = s.build();

        let disabled = ValuationConfig::default();
        let ctx = ValuationContext::new(&world, &disabled);
        let c = world.clan(clan).unwrap();
        let k = world.kingdom(realm.kingdom).unwrap();
        assert!((war_multiplier(&ctx, c, k) - 1.0).abs() < f64::EPSILON);

        let config = enabled();
        let ctx = ValuationContext::new(&world, &config);
        assert!((war_multiplier(&ctx, c, k) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn losing_kingdom_discounts_foreign_clans_only() {
        let mut s = Scenario::new();
        let home = s.add_culture();
        let abroad = s.add_culture();
        let loser = s.add_kingdom_with_culture("Loser", home);
        let winner = s.add_kingdom_with_culture("Winner", abroad);
        s.clan_mut(loser.ruling_clan).strength(100.0);
        s.clan_mut(winner.ruling_clan).strength(400.0);
        s.war(winner.kingdom.into(), loser.kingdom.into());
        let native = s.clan("Native").culture(home).id();
        let foreign = s.clan("Foreign").culture(abroad).id();
        let world = s.build();
        let config = enabled();
        let ctx = ValuationContext::new(&world, &config);

        let k = world.kingdom(loser.kingdom).unwrap();
        let native_mult = war_multiplier(&ctx, world.clan(native).unwrap(), k);
        let foreign_mult = war_multiplier(&ctx, world.clan(foreign).unwrap(), k);
        assert!((native_mult - 1.0).abs() < f64::EPSILON);
        assert!((foreign_mult - 0.25).abs() < 1e-9);
    }

    #[test]
    fn winning_kingdom_capped() {
        let mut s = Scenario::new();
        let strong = s.add_kingdom("Strong");
        let weak = s.add_kingdom("Weak");
        s.clan_mut(strong.ruling_clan).strength(1000.0);
        s.clan_mut(weak.ruling_clan).strength(100.0);
        s.war(strong.kingdom.into(), weak.kingdom.into());
        let clan = s.clan("Clan").id();
        let world = s.build();
        let config = enabled();
        let ctx = ValuationContext::new(&world, &config);

        let k = world.kingdom(strong.kingdom).unwrap();
        let mult = war_multiplier(&ctx, world.clan(clan).unwrap(), k);
        assert!((mult - config.war_outlook.max_multiplier).abs() < f64::EPSILON);
    }
}
