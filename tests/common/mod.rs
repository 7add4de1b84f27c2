use fealty::model::*;
use fealty::scenario::{KingdomSetup, Scenario};
use fealty::ClanId;

/// Two kingdoms at war plus an independent clan and a vassal with land.
pub struct Frontier {
    pub world: WorldSnapshot,
    pub north: KingdomSetup,
    pub south: KingdomSetup,
    pub vassal: ClanId,
    pub free: ClanId,
}

pub fn build_frontier() -> Frontier {
    let mut s = Scenario::at_day(250);
    let north = s.add_kingdom("North");
    let south = s.add_kingdom("South");
    s.clan_mut(north.ruling_clan).heroes(3).strength(600.0);
    s.clan_mut(south.ruling_clan).heroes(2).strength(400.0);

    s.settlement("Northwatch", north.ruling_clan)
        .kind(SettlementKind::Town)
        .at(0.0, 20.0)
        .prosperity(4000.0)
        .id();
    s.settlement("Frostkeep", north.ruling_clan)
        .kind(SettlementKind::Castle)
        .at(10.0, 25.0)
        .prosperity(1500.0)
        .id();
    s.settlement("Sunspire", south.ruling_clan)
        .kind(SettlementKind::Town)
        .at(0.0, -20.0)
        .prosperity(3500.0)
        .id();

    let vassal = s
        .clan("Marcher")
        .kingdom(north.kingdom)
        .heroes(2)
        .strength(250.0)
        .reliability(1.1)
        .last_faction_change_day(200)
        .id();
    s.settlement("Borderhold", vassal)
        .kind(SettlementKind::Castle)
        .at(5.0, 5.0)
        .prosperity(1200.0)
        .id();

    let free = s.clan("Wanderers").heroes(3).strength(300.0).id();
    s.settlement("Outpost", free)
        .kind(SettlementKind::Village)
        .at(-5.0, -10.0)
        .prosperity(600.0)
        .id();

    s.relation(north.ruling_clan, vassal, 15.0);
    s.relation(south.ruling_clan, free, 30.0);
    s.war(north.kingdom.into(), south.kingdom.into());

    Frontier {
        world: s.build(),
        north,
        south,
        vassal,
        free,
    }
}
