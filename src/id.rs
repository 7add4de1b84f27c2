use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic ID generator shared across all snapshot object types.
/// Guarantees that no clan, kingdom, settlement, hero or culture shares a raw ID.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_clan(&mut self) -> ClanId {
        ClanId(self.next_raw())
    }

    pub fn next_kingdom(&mut self) -> KingdomId {
        KingdomId(self.next_raw())
    }

    pub fn next_settlement(&mut self) -> SettlementId {
        SettlementId(self.next_raw())
    }

    pub fn next_hero(&mut self) -> HeroId {
        HeroId(self.next_raw())
    }

    pub fn next_culture(&mut self) -> CultureId {
        CultureId(self.next_raw())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

typed_id!(ClanId, "clan");
typed_id!(KingdomId, "kingdom");
typed_id!(SettlementId, "settlement");
typed_id!(
    /// Identifies a hero; only clan leaders are referenced by the engine.
    HeroId,
    "hero"
);
typed_id!(CultureId, "culture");

/// A political actor: either a clan or a kingdom.
///
/// Every "who is asking" query and every war/alliance endpoint is a `FactionId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FactionId {
    Clan(ClanId),
    Kingdom(KingdomId),
}

impl FactionId {
    pub fn as_clan(self) -> Option<ClanId> {
        match self {
            FactionId::Clan(id) => Some(id),
            FactionId::Kingdom(_) => None,
        }
    }

    pub fn as_kingdom(self) -> Option<KingdomId> {
        match self {
            FactionId::Kingdom(id) => Some(id),
            FactionId::Clan(_) => None,
        }
    }

    pub fn is_clan(self) -> bool {
        matches!(self, FactionId::Clan(_))
    }
}

impl From<ClanId> for FactionId {
    fn from(id: ClanId) -> Self {
        FactionId::Clan(id)
    }
}

impl From<KingdomId> for FactionId {
    fn from(id: KingdomId) -> Self {
        FactionId::Kingdom(id)
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactionId::Clan(id) => id.fmt(f),
            FactionId::Kingdom(id) => id.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_across_kinds() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.next_clan(), ClanId(1));
        assert_eq!(id_gen.next_kingdom(), KingdomId(2));
        assert_eq!(id_gen.next_settlement(), SettlementId(3));
    }

    #[test]
    fn starting_from() {
        let mut id_gen = IdGenerator::starting_from(100);
        assert_eq!(id_gen.next_raw(), 100);
        assert_eq!(id_gen.next_hero(), HeroId(101));
    }

    #[test]
    fn faction_id_serde_shape() {
        let json = serde_json::to_value(FactionId::Kingdom(KingdomId(7))).unwrap();
        assert_eq!(json["kind"], "kingdom");
        assert_eq!(json["id"], 7);

        let parsed: FactionId = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.as_kingdom(), Some(KingdomId(7)));
        assert!(parsed.as_clan().is_none());
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(ClanId(4).to_string(), "clan#4");
        assert_eq!(FactionId::from(KingdomId(9)).to_string(), "kingdom#9");
    }
}
