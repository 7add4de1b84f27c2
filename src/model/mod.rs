pub mod entity;
pub mod relationship;
pub mod timestamp;
pub mod world;

pub use entity::{Clan, Kingdom, MapPosition, Settlement, SettlementKind};
pub use relationship::{Alliance, ClanRelation, War, WarSide};
pub use timestamp::CampaignTime;
pub use world::{SnapshotError, SnapshotFile, WorldSnapshot};
