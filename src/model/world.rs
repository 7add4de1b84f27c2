use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Clan, Kingdom, Settlement};
use super::relationship::{Alliance, ClanRelation, War};
use super::timestamp::CampaignTime;
use crate::error::ValuationError;
use crate::id::{ClanId, CultureId, FactionId, HeroId, KingdomId, SettlementId};

/// Honor-derived reliability of a clan leader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderReliability {
    pub hero: HeroId,
    pub value: f64,
}

/// Prosperity bonus applied when a settlement is scored for a faction of this culture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CultureProsperityBonus {
    pub culture: CultureId,
    pub bonus: f64,
}

/// On-disk shape of a world snapshot. Derived collections are rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub now: CampaignTime,
    #[serde(default)]
    pub player_clan: Option<ClanId>,
    #[serde(default)]
    pub clans: Vec<Clan>,
    #[serde(default)]
    pub kingdoms: Vec<Kingdom>,
    #[serde(default)]
    pub settlements: Vec<Settlement>,
    #[serde(default)]
    pub relations: Vec<ClanRelation>,
    #[serde(default)]
    pub wars: Vec<War>,
    #[serde(default)]
    pub alliances: Vec<Alliance>,
    #[serde(default)]
    pub reliability: Vec<LeaderReliability>,
    #[serde(default)]
    pub culture_prosperity_bonus: Vec<CultureProsperityBonus>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u64 },
    #[error("clan {clan} belongs to unknown kingdom {kingdom}")]
    DanglingKingdom { clan: ClanId, kingdom: KingdomId },
    #[error("settlement {settlement} is owned by unknown clan {owner}")]
    DanglingOwner {
        settlement: SettlementId,
        owner: ClanId,
    },
    #[error("ruling clan {clan} of {kingdom} is not a member of it")]
    RulerNotMember { kingdom: KingdomId, clan: ClanId },
    #[error("reference to unknown faction {0}")]
    UnknownFaction(FactionId),
    #[error("{field} of {owner} must be a finite non-negative number, got {value}")]
    InvalidNumber {
        field: &'static str,
        owner: String,
        value: f64,
    },
}

/// Read-only, validated snapshot of the campaign state the engine scores against.
///
/// Built once per evaluation round. Every derived collection (clan holdings,
/// kingdom membership, fortifications) is consistent with the raw ownership data
/// by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SnapshotFile", into = "SnapshotFile")]
pub struct WorldSnapshot {
    now: CampaignTime,
    player_clan: Option<ClanId>,
    clans: BTreeMap<ClanId, Clan>,
    kingdoms: BTreeMap<KingdomId, Kingdom>,
    settlements: BTreeMap<SettlementId, Settlement>,
    relations: HashMap<(ClanId, ClanId), f64>,
    wars: Vec<War>,
    alliances: Vec<Alliance>,
    reliability: BTreeMap<HeroId, f64>,
    culture_prosperity_bonus: BTreeMap<CultureId, f64>,
    average_settlement_distance: f64,
}

impl WorldSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }

    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn now(&self) -> CampaignTime {
        self.now
    }

    pub fn player_clan(&self) -> Option<ClanId> {
        self.player_clan
    }

    pub fn clan(&self, id: ClanId) -> Result<&Clan, ValuationError> {
        self.clans.get(&id).ok_or(ValuationError::UnknownClan(id))
    }

    pub fn kingdom(&self, id: KingdomId) -> Result<&Kingdom, ValuationError> {
        self.kingdoms.get(&id).ok_or(ValuationError::UnknownKingdom(id))
    }

    pub fn settlement(&self, id: SettlementId) -> Result<&Settlement, ValuationError> {
        self.settlements
            .get(&id)
            .ok_or(ValuationError::UnknownSettlement(id))
    }

    pub fn clans(&self) -> impl Iterator<Item = &Clan> {
        self.clans.values()
    }

    pub fn kingdoms(&self) -> impl Iterator<Item = &Kingdom> {
        self.kingdoms.values()
    }

    pub fn settlements(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.values()
    }

    pub fn wars(&self) -> &[War] {
        &self.wars
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    /// Stored relation from `a` toward `b`, falling back to `b` toward `a`.
    pub fn stored_relation(&self, a: ClanId, b: ClanId) -> Option<f64> {
        self.relations
            .get(&(a, b))
            .or_else(|| self.relations.get(&(b, a)))
            .copied()
    }

    pub fn stored_reliability(&self, hero: HeroId) -> Option<f64> {
        self.reliability.get(&hero).copied()
    }

    pub fn culture_bonus(&self, culture: CultureId) -> f64 {
        self.culture_prosperity_bonus
            .get(&culture)
            .copied()
            .unwrap_or(0.0)
    }

    /// Mean distance between every pair of settlements on the map (0 with fewer than two).
    pub fn average_settlement_distance(&self) -> f64 {
        self.average_settlement_distance
    }

    /// The faction that represents `faction` on the map: a clan's kingdom when it has one.
    pub fn map_faction(&self, faction: FactionId) -> FactionId {
        match faction {
            FactionId::Clan(id) => self
                .clans
                .get(&id)
                .and_then(|c| c.kingdom)
                .map(FactionId::Kingdom)
                .unwrap_or(faction),
            FactionId::Kingdom(_) => faction,
        }
    }

    /// Map faction of the clan owning a settlement, if owned.
    pub fn settlement_map_faction(&self, settlement: &Settlement) -> Option<FactionId> {
        settlement
            .owner
            .map(|owner| self.map_faction(FactionId::Clan(owner)))
    }

    /// Sum of member clan strength.
    pub fn kingdom_strength(&self, kingdom: &Kingdom) -> f64 {
        kingdom
            .clans
            .iter()
            .filter_map(|id| self.clans.get(id))
            .map(|c| c.total_strength)
            .sum()
    }

    /// Strength of a faction as a war participant (kingdom total or clan strength).
    pub fn faction_strength(&self, faction: FactionId) -> f64 {
        match faction {
            FactionId::Kingdom(id) => self
                .kingdoms
                .get(&id)
                .map(|k| self.kingdom_strength(k))
                .unwrap_or(0.0),
            FactionId::Clan(id) => self
                .clans
                .get(&id)
                .map(|c| c.total_strength)
                .unwrap_or(0.0),
        }
    }

    fn faction_exists(&self, faction: FactionId) -> bool {
        match faction {
            FactionId::Clan(id) => self.clans.contains_key(&id),
            FactionId::Kingdom(id) => self.kingdoms.contains_key(&id),
        }
    }
}

fn check_number(field: &'static str, owner: impl ToString, value: f64) -> Result<(), SnapshotError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SnapshotError::InvalidNumber {
            field,
            owner: owner.to_string(),
            value,
        })
    }
}

fn check_finite(field: &'static str, owner: impl ToString, value: f64) -> Result<(), SnapshotError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SnapshotError::InvalidNumber {
            field,
            owner: owner.to_string(),
            value,
        })
    }
}

fn mean_pairwise_distance(settlements: &BTreeMap<SettlementId, Settlement>) -> f64 {
    let all: Vec<&Settlement> = settlements.values().collect();
    let mut total = 0.0;
    let mut pairs = 0u64;
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            total += a.position.distance_to(b.position);
            pairs += 1;
        }
    }
    if pairs == 0 { 0.0 } else { total / pairs as f64 }
}

impl TryFrom<SnapshotFile> for WorldSnapshot {
    type Error = SnapshotError;

    fn try_from(file: SnapshotFile) -> Result<Self, Self::Error> {
        let mut clans = BTreeMap::new();
        for mut clan in file.clans {
            check_number("total_strength", clan.id, clan.total_strength)?;
            clan.settlements.clear();
            clan.towns_count = 0;
            let id = clan.id;
            if clans.insert(id, clan).is_some() {
                return Err(SnapshotError::DuplicateId { kind: "clan", id: id.0 });
            }
        }

        let mut kingdoms = BTreeMap::new();
        for mut kingdom in file.kingdoms {
            kingdom.clans.clear();
            kingdom.fortifications.clear();
            let id = kingdom.id;
            if kingdoms.insert(id, kingdom).is_some() {
                return Err(SnapshotError::DuplicateId { kind: "kingdom", id: id.0 });
            }
        }

        let mut settlements = BTreeMap::new();
        for settlement in file.settlements {
            check_number("prosperity", settlement.id, settlement.prosperity)?;
            check_finite("position.x", settlement.id, settlement.position.x)?;
            check_finite("position.y", settlement.id, settlement.position.y)?;
            let id = settlement.id;
            if settlements.insert(id, settlement).is_some() {
                return Err(SnapshotError::DuplicateId { kind: "settlement", id: id.0 });
            }
        }

        // Membership, in clan ID order.
        for clan in clans.values() {
            if let Some(kid) = clan.kingdom {
                let kingdom = kingdoms.get_mut(&kid).ok_or(SnapshotError::DanglingKingdom {
                    clan: clan.id,
                    kingdom: kid,
                })?;
                kingdom.clans.push(clan.id);
            }
        }
        for kingdom in kingdoms.values() {
            if !kingdom.clans.contains(&kingdom.ruling_clan) {
                return Err(SnapshotError::RulerNotMember {
                    kingdom: kingdom.id,
                    clan: kingdom.ruling_clan,
                });
            }
        }

        // Holdings, in settlement ID order.
        let mut seen_positions = BTreeSet::new();
        for settlement in settlements.values() {
            let key = (settlement.position.x.to_bits(), settlement.position.y.to_bits());
            if !seen_positions.insert(key) {
                tracing::warn!(
                    "settlement {} shares its map position with another settlement",
                    settlement.id
                );
            }
            let Some(owner) = settlement.owner else {
                continue;
            };
            let clan = clans.get_mut(&owner).ok_or(SnapshotError::DanglingOwner {
                settlement: settlement.id,
                owner,
            })?;
            clan.settlements.push(settlement.id);
            if settlement.is_town() {
                clan.towns_count += 1;
            }
            if settlement.is_fortification()
                && let Some(kid) = clan.kingdom
                && let Some(kingdom) = kingdoms.get_mut(&kid)
            {
                kingdom.fortifications.push(settlement.id);
            }
        }

        if let Some(player) = file.player_clan
            && !clans.contains_key(&player)
        {
            return Err(SnapshotError::UnknownFaction(FactionId::Clan(player)));
        }

        let mut relations = HashMap::new();
        for rel in &file.relations {
            for id in [rel.from, rel.to] {
                if !clans.contains_key(&id) {
                    return Err(SnapshotError::UnknownFaction(FactionId::Clan(id)));
                }
            }
            check_finite("relation", format!("{}->{}", rel.from, rel.to), rel.value)?;
            relations.insert((rel.from, rel.to), rel.value);
        }

        let mut reliability = BTreeMap::new();
        for entry in &file.reliability {
            check_number("reliability", entry.hero, entry.value)?;
            reliability.insert(entry.hero, entry.value);
        }

        let mut culture_prosperity_bonus = BTreeMap::new();
        for entry in &file.culture_prosperity_bonus {
            check_finite("culture bonus", entry.culture, entry.bonus)?;
            culture_prosperity_bonus.insert(entry.culture, entry.bonus);
        }

        let average_settlement_distance = mean_pairwise_distance(&settlements);

        let snapshot = WorldSnapshot {
            now: file.now,
            player_clan: file.player_clan,
            clans,
            kingdoms,
            settlements,
            relations,
            wars: file.wars,
            alliances: file.alliances,
            reliability,
            culture_prosperity_bonus,
            average_settlement_distance,
        };

        for war in &snapshot.wars {
            for faction in [war.attacker.faction, war.defender.faction] {
                if !snapshot.faction_exists(faction) {
                    return Err(SnapshotError::UnknownFaction(faction));
                }
            }
        }
        for alliance in &snapshot.alliances {
            for faction in [alliance.a, alliance.b] {
                if !snapshot.faction_exists(faction) {
                    return Err(SnapshotError::UnknownFaction(faction));
                }
            }
        }

        Ok(snapshot)
    }
}

impl From<WorldSnapshot> for SnapshotFile {
    fn from(world: WorldSnapshot) -> Self {
        let mut relations: Vec<ClanRelation> = world
            .relations
            .iter()
            .map(|(&(from, to), &value)| ClanRelation { from, to, value })
            .collect();
        relations.sort_by_key(|r| (r.from, r.to));

        SnapshotFile {
            now: world.now,
            player_clan: world.player_clan,
            clans: world.clans.into_values().collect(),
            kingdoms: world.kingdoms.into_values().collect(),
            settlements: world.settlements.into_values().collect(),
            relations,
            wars: world.wars,
            alliances: world.alliances,
            reliability: world
                .reliability
                .into_iter()
                .map(|(hero, value)| LeaderReliability { hero, value })
                .collect(),
            culture_prosperity_bonus: world
                .culture_prosperity_bonus
                .into_iter()
                .map(|(culture, bonus)| CultureProsperityBonus { culture, bonus })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::{MapPosition, SettlementKind};
    use crate::scenario::Scenario;

    #[test]
    fn derives_holdings_and_membership() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Vlandia");
        let clan = s.clan("dey Tero").kingdom(realm.kingdom).id();
        let town = s.settlement("Sargot", clan).kind(SettlementKind::Town).at(1.0, 1.0).id();
        let village = s.settlement("Ibiran", clan).kind(SettlementKind::Village).at(2.0, 1.0).id();
        let world = s.build();

        let c = world.clan(clan).unwrap();
        assert_eq!(c.settlements, vec![town, village]);
        assert_eq!(c.towns_count, 1);

        let k = world.kingdom(realm.kingdom).unwrap();
        assert_eq!(k.clans, vec![realm.ruling_clan, clan]);
        assert!(k.fortifications.contains(&town));
        assert!(!k.fortifications.contains(&village));
    }

    #[test]
    fn average_distance_over_all_pairs() {
        let mut s = Scenario::new();
        let clan = s.clan("Lone").id();
        s.settlement("A", clan).at(0.0, 0.0).id();
        s.settlement("B", clan).at(3.0, 4.0).id();
        s.settlement("C", clan).at(6.0, 8.0).id();
        let world = s.build();
        // Pairs: 5, 10, 5
        assert!((world.average_settlement_distance() - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn relation_lookup_falls_back_to_reverse() {
        let mut s = Scenario::new();
        let a = s.clan("A").id();
        let b = s.clan("B").id();
        s.relation(a, b, 25.0);
        let world = s.build();
        assert_eq!(world.stored_relation(a, b), Some(25.0));
        assert_eq!(world.stored_relation(b, a), Some(25.0));
    }

    #[test]
    fn map_faction_resolves_clan_to_kingdom() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Sturgia");
        let loose = s.clan("Loose").id();
        let world = s.build();
        assert_eq!(
            world.map_faction(FactionId::Clan(realm.ruling_clan)),
            FactionId::Kingdom(realm.kingdom)
        );
        assert_eq!(world.map_faction(FactionId::Clan(loose)), FactionId::Clan(loose));
    }

    #[test]
    fn rejects_ruler_outside_kingdom() {
        let file = SnapshotFile {
            clans: vec![Clan {
                id: ClanId(1),
                name: "Outsider".to_string(),
                kingdom: None,
                culture: CultureId(9),
                is_minor_faction: false,
                total_strength: 10.0,
                commander_heroes: 1,
                leader: None,
                last_faction_change: CampaignTime::default(),
                settlements: vec![],
                towns_count: 0,
            }],
            kingdoms: vec![Kingdom {
                id: KingdomId(2),
                name: "Empire".to_string(),
                ruling_clan: ClanId(1),
                culture: CultureId(9),
                clans: vec![],
                fortifications: vec![],
            }],
            ..SnapshotFile::default()
        };
        let err = WorldSnapshot::try_from(file).unwrap_err();
        assert!(matches!(err, SnapshotError::RulerNotMember { .. }));
    }

    #[test]
    fn rejects_dangling_owner() {
        let file = SnapshotFile {
            settlements: vec![Settlement {
                id: SettlementId(5),
                name: "Nowhere".to_string(),
                kind: SettlementKind::Castle,
                position: MapPosition::new(0.0, 0.0),
                owner: Some(ClanId(77)),
                prosperity: 100.0,
                culture: CultureId(1),
            }],
            ..SnapshotFile::default()
        };
        let err = WorldSnapshot::try_from(file).unwrap_err();
        assert!(matches!(err, SnapshotError::DanglingOwner { .. }));
    }

    #[test]
    fn rejects_non_finite_strength() {
        let mut s = Scenario::new();
        s.clan("Broken").strength(f64::NAN).id();
        let err = WorldSnapshot::try_from(s.into_file()).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidNumber { field: "total_strength", .. }));
    }

    #[test]
    fn rejects_war_with_unknown_faction() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Khuzait");
        s.war(realm.kingdom.into(), FactionId::Kingdom(KingdomId(999)));
        let err = WorldSnapshot::try_from(s.into_file()).unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownFaction(_)));
    }

    #[test]
    fn json_round_trip_preserves_derived_state() {
        let mut s = Scenario::new();
        let realm = s.add_kingdom("Aserai");
        let clan = s.clan("Banu Hulyan").kingdom(realm.kingdom).heroes(3).id();
        s.settlement("Quyaz", clan).at(5.0, 5.0).id();
        s.relation(realm.ruling_clan, clan, -12.0);
        let world = s.build();

        let json = world.to_json_string().unwrap();
        let reloaded = WorldSnapshot::from_json_str(&json).unwrap();

        let c = reloaded.clan(clan).unwrap();
        assert_eq!(c.commander_heroes, 3);
        assert_eq!(c.settlements.len(), 1);
        assert_eq!(reloaded.stored_relation(clan, realm.ruling_clan), Some(-12.0));
        assert_eq!(reloaded.kingdom(realm.kingdom).unwrap().clans.len(), 2);
    }

    #[test]
    fn from_file_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorldSnapshot::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Read { .. }));
    }
}
