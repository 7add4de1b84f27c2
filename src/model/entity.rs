use serde::{Deserialize, Serialize};

use super::timestamp::CampaignTime;
use crate::id::{ClanId, CultureId, HeroId, KingdomId, SettlementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    Town,
    Castle,
    Village,
}

/// Map coordinates of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapPosition {
    pub x: f64,
    pub y: f64,
}

impl MapPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: MapPosition) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub name: String,
    pub kind: SettlementKind,
    pub position: MapPosition,
    /// Owning clan; `None` for unowned settlements.
    #[serde(default)]
    pub owner: Option<ClanId>,
    pub prosperity: f64,
    pub culture: CultureId,
}

impl Settlement {
    /// Towns and castles can be defended; villages cannot.
    pub fn is_fortification(&self) -> bool {
        matches!(self.kind, SettlementKind::Town | SettlementKind::Castle)
    }

    pub fn is_town(&self) -> bool {
        self.kind == SettlementKind::Town
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clan {
    pub id: ClanId,
    pub name: String,
    /// Kingdom the clan currently serves, if any.
    #[serde(default)]
    pub kingdom: Option<KingdomId>,
    pub culture: CultureId,
    /// Mercenary clans are minor factions.
    #[serde(default)]
    pub is_minor_faction: bool,
    pub total_strength: f64,
    /// Number of heroes able to lead a party.
    #[serde(default)]
    pub commander_heroes: u32,
    #[serde(default)]
    pub leader: Option<HeroId>,
    #[serde(default)]
    pub last_faction_change: CampaignTime,

    /// Derived at snapshot load from settlement ownership, ordered by ID.
    #[serde(skip)]
    pub settlements: Vec<SettlementId>,
    /// Derived at snapshot load: owned settlements of kind `Town`.
    #[serde(skip)]
    pub towns_count: u32,
}

impl Clan {
    pub fn is_independent(&self) -> bool {
        self.kingdom.is_none()
    }

    /// A minor faction serving a kingdom under contract.
    pub fn is_under_mercenary_service(&self) -> bool {
        self.is_minor_faction && self.kingdom.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kingdom {
    pub id: KingdomId,
    pub name: String,
    pub ruling_clan: ClanId,
    pub culture: CultureId,

    /// Derived at snapshot load from clan membership, ordered by ID.
    #[serde(skip)]
    pub clans: Vec<ClanId>,
    /// Derived at snapshot load: fortified settlements owned by member clans.
    #[serde(skip)]
    pub fortifications: Vec<SettlementId>,
}

impl Kingdom {
    pub fn is_ruled_by(&self, clan: ClanId) -> bool {
        self.ruling_clan == clan
    }
}
