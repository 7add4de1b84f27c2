mod common;

use fealty::barter::{Barterable, JoinKingdomAsClan, LeaveKingdomAsClan, Perspective};
use fealty::config::ValuationConfig;
use fealty::context::ValuationContext;
use fealty::valuation::{IMPOSSIBLE, clan_strength, join_score};
use fealty::{FactionId, evaluate_join, evaluate_leave};

#[test]
fn join_offer_without_kingdom_is_worthless_to_all() {
    let f = common::build_frontier();
    let config = ValuationConfig::default();
    let ctx = ValuationContext::new(&f.world, &config);

    let requesters: Vec<FactionId> = vec![
        f.free.into(),
        f.vassal.into(),
        f.north.kingdom.into(),
        f.south.kingdom.into(),
        f.north.ruling_clan.into(),
    ];
    for target in [None, Some(FactionId::Clan(f.vassal))] {
        for &requester in &requesters {
            let value = evaluate_join(&ctx, f.free, target, requester).unwrap();
            assert_eq!(value, config.barter.unavailable_value);
        }
    }
}

#[test]
fn ruler_offer_to_own_kingdom_is_below_every_real_score() {
    let f = common::build_frontier();
    let config = ValuationConfig::default();
    let ctx = ValuationContext::new(&f.world, &config);

    let value = evaluate_join(
        &ctx,
        f.north.ruling_clan,
        Some(f.north.kingdom.into()),
        f.north.ruling_clan.into(),
    )
    .unwrap();
    assert_eq!(value, IMPOSSIBLE);
    assert!(value < config.barter.unavailable_value);
}

#[test]
fn losing_and_rival_kingdoms_see_opposite_signs() {
    let f = common::build_frontier();
    let config = ValuationConfig::default();
    let ctx = ValuationContext::new(&f.world, &config);

    let losing = evaluate_leave(&ctx, f.vassal, None, f.north.kingdom.into()).unwrap();
    let rival = evaluate_leave(&ctx, f.vassal, None, f.south.kingdom.into()).unwrap();
    assert!(losing != 0.0);
    assert_eq!(losing.signum(), -rival.signum());
    assert!((losing + rival).abs() < 1e-9);
}

#[test]
fn third_parties_follow_war_and_alliance() {
    let f = common::build_frontier();
    let config = ValuationConfig::default();
    let ctx = ValuationContext::new(&f.world, &config);
    let strength = clan_strength(&config.strength, f.world.clan(f.vassal).unwrap());

    let leave = LeaveKingdomAsClan {
        owner: f.vassal,
        target: None,
    };
    assert_eq!(
        leave.classify(&ctx, f.south.ruling_clan.into()).unwrap(),
        Perspective::UnrelatedThirdParty
    );
    let enemy_clan = leave.value_for(&ctx, f.south.ruling_clan.into()).unwrap();
    let fellow_vassal = leave.value_for(&ctx, f.north.ruling_clan.into()).unwrap();
    let bystander = leave.value_for(&ctx, f.free.into()).unwrap();
    assert!((enemy_clan - 0.5 * strength).abs() < 1e-9);
    assert!((fellow_vassal + 0.5 * strength).abs() < 1e-9);
    assert!((bystander - 0.01 * strength).abs() < 1e-9);
}

#[test]
fn defector_keeps_land_when_switching_sides_mid_war() {
    let f = common::build_frontier();
    let config = ValuationConfig::default();
    let ctx = ValuationContext::new(&f.world, &config);

    let join = JoinKingdomAsClan {
        owner: f.vassal,
        target: Some(f.south.kingdom.into()),
    };
    let owner_value = join.value_for(&ctx, f.vassal.into()).unwrap();
    let expected = join_score(&ctx, f.vassal, f.south.kingdom).unwrap()
        + evaluate_leave(&ctx, f.vassal, None, f.vassal.into()).unwrap();
    assert!((owner_value - expected).abs() < 1e-6);

    let kingdom_value = join.value_for(&ctx, f.south.kingdom.into()).unwrap();
    assert!(kingdom_value > 0.0);
}

#[test]
fn favorable_war_outlook_raises_join_value() {
    let f = common::build_frontier();
    let calm = ValuationConfig::default();
    let mut wary = ValuationConfig::default();
    wary.war_outlook.enabled = true;

    let target = Some(FactionId::Kingdom(f.north.kingdom));
    let without = evaluate_join(&ValuationContext::new(&f.world, &calm), f.free, target, f.free.into()).unwrap();
    let with = evaluate_join(&ValuationContext::new(&f.world, &wary), f.free, target, f.free.into()).unwrap();
    // North (850 strength) outweighs South (400): multiplier capped at 1.5.
    assert!(with > without);
}
