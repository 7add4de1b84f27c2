use crate::id::{ClanId, CultureId, FactionId, HeroId, IdGenerator, KingdomId, SettlementId};
use crate::model::world::{CultureProsperityBonus, LeaderReliability};
use crate::model::*;

/// IDs returned by [`Scenario::add_kingdom`] / [`Scenario::add_kingdom_with_culture`].
pub struct KingdomSetup {
    pub kingdom: KingdomId,
    pub ruling_clan: ClanId,
    pub leader: HeroId,
}

// -- Builder-style ref types --

/// Typed reference to a clan in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::clan`] (creation) or [`Scenario::clan_mut`] (mutation).
/// Call [`.id()`](ClanRef::id) to terminate the chain and extract the clan ID.
pub struct ClanRef<'a> {
    scenario: &'a mut Scenario,
    id: ClanId,
}

impl<'a> ClanRef<'a> {
    fn data_mut(&mut self) -> &mut Clan {
        let id = self.id;
        self.scenario.file.clans.iter_mut().find(|c| c.id == id).unwrap()
    }

    pub fn kingdom(mut self, v: KingdomId) -> Self { self.data_mut().kingdom = Some(v); self }
    pub fn independent(mut self) -> Self { self.data_mut().kingdom = None; self }
    pub fn culture(mut self, v: CultureId) -> Self { self.data_mut().culture = v; self }
    pub fn heroes(mut self, v: u32) -> Self { self.data_mut().commander_heroes = v; self }
    pub fn strength(mut self, v: f64) -> Self { self.data_mut().total_strength = v; self }
    pub fn minor(mut self) -> Self { self.data_mut().is_minor_faction = true; self }
    pub fn last_faction_change(mut self, v: CampaignTime) -> Self { self.data_mut().last_faction_change = v; self }
    pub fn last_faction_change_day(self, day: u64) -> Self { self.last_faction_change(CampaignTime::from_days(day)) }

    /// Record the leader's reliability constant.
    pub fn reliability(mut self, v: f64) -> Self {
        let hero = self.data_mut().leader.unwrap();
        let entries = &mut self.scenario.file.reliability;
        entries.retain(|r| r.hero != hero);
        entries.push(LeaderReliability { hero, value: v });
        self
    }

    pub fn without_leader(mut self) -> Self {
        if let Some(hero) = self.data_mut().leader.take() {
            self.scenario.file.reliability.retain(|r| r.hero != hero);
        }
        self
    }

    /// Escape hatch: apply an arbitrary closure to the clan.
    pub fn with(mut self, f: impl FnOnce(&mut Clan)) -> Self { f(self.data_mut()); self }

    /// Terminate the chain and return the clan ID.
    pub fn id(self) -> ClanId { self.id }
}

/// Typed reference to a settlement in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::settlement`] (creation) or [`Scenario::settlement_mut`] (mutation).
/// Call [`.id()`](SettlementRef::id) to terminate the chain and extract the settlement ID.
pub struct SettlementRef<'a> {
    scenario: &'a mut Scenario,
    id: SettlementId,
}

impl<'a> SettlementRef<'a> {
    fn data_mut(&mut self) -> &mut Settlement {
        let id = self.id;
        self.scenario.file.settlements.iter_mut().find(|s| s.id == id).unwrap()
    }

    pub fn kind(mut self, v: SettlementKind) -> Self { self.data_mut().kind = v; self }
    pub fn at(mut self, x: f64, y: f64) -> Self { self.data_mut().position = MapPosition::new(x, y); self }
    pub fn prosperity(mut self, v: f64) -> Self { self.data_mut().prosperity = v; self }
    pub fn culture(mut self, v: CultureId) -> Self { self.data_mut().culture = v; self }
    pub fn owner(mut self, v: Option<ClanId>) -> Self { self.data_mut().owner = v; self }

    /// Escape hatch: apply an arbitrary closure to the settlement.
    pub fn with(mut self, f: impl FnOnce(&mut Settlement)) -> Self { f(self.data_mut()); self }

    /// Terminate the chain and return the settlement ID.
    pub fn id(self) -> SettlementId { self.id }
}

/// Fluent builder for constructing world snapshots.
///
/// Every clan gets a leader hero, one commander hero and 100 strength; every
/// settlement is a town of prosperity 1000 with the owner's culture, placed on
/// its own map spot. Override any of it through the ref setters.
///
/// Used by tests for deterministic scenario setup.
pub struct Scenario {
    file: SnapshotFile,
    ids: IdGenerator,
    default_culture: CultureId,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Create a new scenario at day 0.
    pub fn new() -> Self {
        Self::at_day(0)
    }

    /// Create a new scenario whose current time is the given campaign day.
    pub fn at_day(day: u64) -> Self {
        let mut ids = IdGenerator::new();
        let default_culture = ids.next_culture();
        let file = SnapshotFile {
            now: CampaignTime::from_days(day),
            ..SnapshotFile::default()
        };
        Self {
            file,
            ids,
            default_culture,
        }
    }

    pub fn default_culture(&self) -> CultureId {
        self.default_culture
    }

    // -- Entity creation --

    pub fn add_culture(&mut self) -> CultureId {
        self.ids.next_culture()
    }

    /// Add a culture whose settlements gain `bonus` (fractional) prosperity when
    /// scored for a faction of the same culture.
    pub fn add_culture_with_bonus(&mut self, bonus: f64) -> CultureId {
        let culture = self.ids.next_culture();
        self.file
            .culture_prosperity_bonus
            .push(CultureProsperityBonus { culture, bonus });
        culture
    }

    /// Add a kingdom of the default culture, with a ruling clan.
    pub fn add_kingdom(&mut self, name: &str) -> KingdomSetup {
        let culture = self.default_culture;
        self.add_kingdom_with_culture(name, culture)
    }

    pub fn add_kingdom_with_culture(&mut self, name: &str, culture: CultureId) -> KingdomSetup {
        let kingdom = self.ids.next_kingdom();
        let ruling_clan = self
            .clan(&format!("{name} rulers"))
            .kingdom(kingdom)
            .culture(culture)
            .id();
        self.file.kingdoms.push(Kingdom {
            id: kingdom,
            name: name.to_string(),
            ruling_clan,
            culture,
            clans: Vec::new(),
            fortifications: Vec::new(),
        });
        let leader = self.clan_data(ruling_clan).leader.unwrap();
        KingdomSetup {
            kingdom,
            ruling_clan,
            leader,
        }
    }

    /// Add an independent clan with a leader hero.
    pub fn clan(&mut self, name: &str) -> ClanRef<'_> {
        let id = self.ids.next_clan();
        let leader = self.ids.next_hero();
        self.file.clans.push(Clan {
            id,
            name: name.to_string(),
            kingdom: None,
            culture: self.default_culture,
            is_minor_faction: false,
            total_strength: 100.0,
            commander_heroes: 1,
            leader: Some(leader),
            last_faction_change: CampaignTime::default(),
            settlements: Vec::new(),
            towns_count: 0,
        });
        ClanRef { scenario: self, id }
    }

    pub fn clan_mut(&mut self, id: ClanId) -> ClanRef<'_> {
        ClanRef { scenario: self, id }
    }

    /// Add a settlement owned by `owner`, inheriting the owner's culture.
    pub fn settlement(&mut self, name: &str, owner: ClanId) -> SettlementRef<'_> {
        let id = self.ids.next_settlement();
        let culture = self.clan_data(owner).culture;
        let spot = self.file.settlements.len() as f64;
        self.file.settlements.push(Settlement {
            id,
            name: name.to_string(),
            kind: SettlementKind::Town,
            position: MapPosition::new(10.0 * spot, -10.0),
            owner: Some(owner),
            prosperity: 1000.0,
            culture,
        });
        SettlementRef { scenario: self, id }
    }

    pub fn settlement_mut(&mut self, id: SettlementId) -> SettlementRef<'_> {
        SettlementRef { scenario: self, id }
    }

    // -- Relationships --

    pub fn relation(&mut self, from: ClanId, to: ClanId, value: f64) {
        self.file.relations.retain(|r| !(r.from == from && r.to == to));
        self.file.relations.push(ClanRelation { from, to, value });
    }

    pub fn war(&mut self, attacker: FactionId, defender: FactionId) {
        self.war_between(WarSide::new(attacker), WarSide::new(defender));
    }

    /// Declare a war with explicit per-side statistics.
    pub fn war_between(&mut self, attacker: WarSide, defender: WarSide) {
        self.file.wars.push(War { attacker, defender });
    }

    pub fn alliance(&mut self, a: FactionId, b: FactionId) {
        self.file.alliances.push(Alliance { a, b });
    }

    // -- World state --

    pub fn player_clan(&mut self, clan: ClanId) {
        self.file.player_clan = Some(clan);
    }

    pub fn now(&mut self, time: CampaignTime) {
        self.file.now = time;
    }

    fn clan_data(&self, id: ClanId) -> &Clan {
        self.file.clans.iter().find(|c| c.id == id).unwrap()
    }

    // -- Finalization --

    /// Validate and return the snapshot. Panics if the scenario is inconsistent.
    pub fn build(self) -> WorldSnapshot {
        WorldSnapshot::try_from(self.file).unwrap()
    }

    /// Return the raw file without validation.
    pub fn into_file(self) -> SnapshotFile {
        self.file
    }
}
