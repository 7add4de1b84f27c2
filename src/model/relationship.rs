use serde::{Deserialize, Serialize};

use crate::id::{ClanId, FactionId};

/// Directed relation score from one clan toward another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClanRelation {
    pub from: ClanId,
    pub to: ClanId,
    pub value: f64,
}

/// One side's record in a war. The statistics only feed the war outlook.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarSide {
    pub faction: FactionId,
    #[serde(default)]
    pub renown: f64,
    #[serde(default)]
    pub raids: u32,
    #[serde(default)]
    pub sieges: u32,
    #[serde(default)]
    pub casualties: u32,
}

impl WarSide {
    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            renown: 0.0,
            raids: 0,
            sieges: 0,
            casualties: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct War {
    pub attacker: WarSide,
    pub defender: WarSide,
}

impl War {
    pub fn involves(&self, faction: FactionId) -> bool {
        self.attacker.faction == faction || self.defender.faction == faction
    }

    pub fn is_between(&self, a: FactionId, b: FactionId) -> bool {
        (self.attacker.faction == a && self.defender.faction == b)
            || (self.attacker.faction == b && self.defender.faction == a)
    }

    /// Returns `(own side, opposing side)` for a participant.
    pub fn sides_for(&self, faction: FactionId) -> Option<(&WarSide, &WarSide)> {
        if self.attacker.faction == faction {
            Some((&self.attacker, &self.defender))
        } else if self.defender.faction == faction {
            Some((&self.defender, &self.attacker))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub a: FactionId,
    pub b: FactionId,
}

impl Alliance {
    pub fn is_between(&self, x: FactionId, y: FactionId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}
