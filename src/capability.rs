//! Narrow read-only queries the engine needs from the host simulation.
//!
//! [`WorldSnapshot`] implements every trait here, so a snapshot alone is enough
//! to score. Hosts with their own relation, honor or pathfinding systems can
//! swap any single capability through [`Capabilities`].

use crate::id::{ClanId, CultureId, FactionId, HeroId, KingdomId};
use crate::model::{Settlement, WorldSnapshot};

/// Power ratio reported for a kingdom nobody is fighting.
pub const UNOPPOSED_POWER_RATIO: f64 = 10.0;

/// Reliability of a leader with no recorded honor.
pub const NEUTRAL_RELIABILITY: f64 = 1.0;

pub trait RelationSource: Send + Sync {
    /// Relation of `a` toward `b`; 0 when unknown.
    fn relation_between(&self, a: ClanId, b: ClanId) -> f64;
}

pub trait PowerBalance: Send + Sync {
    /// Kingdom strength divided by the strength of everyone at war with it.
    fn power_ratio_to_enemies(&self, kingdom: KingdomId) -> f64;
}

pub trait ReliabilitySource: Send + Sync {
    /// Honor-derived multiplier: higher for more principled leaders.
    fn reliability_constant(&self, leader: HeroId) -> f64;
}

pub trait MapGeometry: Send + Sync {
    fn distance(&self, a: &Settlement, b: &Settlement) -> f64;

    fn average_settlement_distance(&self) -> f64;

    /// Mean distance from `settlement` to its `k` nearest `peers`.
    /// Uses every peer when fewer than `k` exist; `None` when there are none.
    fn k_nearest_mean_distance(
        &self,
        settlement: &Settlement,
        peers: &[&Settlement],
        k: usize,
    ) -> Option<f64> {
        let mut distances: Vec<f64> = peers
            .iter()
            .filter(|p| p.id != settlement.id)
            .map(|p| self.distance(settlement, p))
            .collect();
        if distances.is_empty() || k == 0 {
            return None;
        }
        distances.sort_by(f64::total_cmp);
        distances.truncate(k);
        Some(distances.iter().sum::<f64>() / distances.len() as f64)
    }
}

pub trait ProsperityModel: Send + Sync {
    /// Settlement prosperity as seen by a faction of `culture`.
    fn culture_adjusted_prosperity(&self, settlement: &Settlement, culture: CultureId) -> f64;
}

pub trait Diplomacy: Send + Sync {
    fn is_at_war(&self, a: FactionId, b: FactionId) -> bool;
    fn is_allied(&self, a: FactionId, b: FactionId) -> bool;
}

/// The full set of external services a valuation reads from.
#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
    pub relations: &'a dyn RelationSource,
    pub power: &'a dyn PowerBalance,
    pub reliability: &'a dyn ReliabilitySource,
    pub geometry: &'a dyn MapGeometry,
    pub prosperity: &'a dyn ProsperityModel,
    pub diplomacy: &'a dyn Diplomacy,
}

impl<'a> Capabilities<'a> {
    /// Serve every capability from the snapshot itself.
    pub fn from_snapshot(world: &'a WorldSnapshot) -> Self {
        Self {
            relations: world,
            power: world,
            reliability: world,
            geometry: world,
            prosperity: world,
            diplomacy: world,
        }
    }
}

impl RelationSource for WorldSnapshot {
    fn relation_between(&self, a: ClanId, b: ClanId) -> f64 {
        if a == b {
            return 0.0;
        }
        self.stored_relation(a, b).unwrap_or(0.0)
    }
}

impl PowerBalance for WorldSnapshot {
    fn power_ratio_to_enemies(&self, kingdom: KingdomId) -> f64 {
        let own = FactionId::Kingdom(kingdom);
        let own_strength = self.faction_strength(own);
        let enemy_strength: f64 = self
            .wars()
            .iter()
            .filter_map(|w| w.sides_for(own))
            .map(|(_, enemy)| self.faction_strength(enemy.faction))
            .sum();
        if enemy_strength <= 0.0 {
            return UNOPPOSED_POWER_RATIO;
        }
        own_strength / enemy_strength
    }
}

impl ReliabilitySource for WorldSnapshot {
    fn reliability_constant(&self, leader: HeroId) -> f64 {
        self.stored_reliability(leader)
            .unwrap_or(NEUTRAL_RELIABILITY)
    }
}

impl MapGeometry for WorldSnapshot {
    fn distance(&self, a: &Settlement, b: &Settlement) -> f64 {
        a.position.distance_to(b.position)
    }

    fn average_settlement_distance(&self) -> f64 {
        WorldSnapshot::average_settlement_distance(self)
    }
}

impl ProsperityModel for WorldSnapshot {
    fn culture_adjusted_prosperity(&self, settlement: &Settlement, culture: CultureId) -> f64 {
        if settlement.culture == culture {
            settlement.prosperity * (1.0 + self.culture_bonus(culture))
        } else {
            settlement.prosperity
        }
    }
}

impl Diplomacy for WorldSnapshot {
    fn is_at_war(&self, a: FactionId, b: FactionId) -> bool {
        let a = self.map_faction(a);
        let b = self.map_faction(b);
        a != b && self.wars().iter().any(|w| w.is_between(a, b))
    }

    fn is_allied(&self, a: FactionId, b: FactionId) -> bool {
        let a = self.map_faction(a);
        let b = self.map_faction(b);
        a == b || self.alliances().iter().any(|al| al.is_between(a, b))
    }
}
