pub mod barter;
pub mod batch;
pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod id;
pub mod model;
pub mod scenario;
pub mod valuation;

pub use barter::{Barterable, JoinKingdomAsClan, LeaveKingdomAsClan, Perspective, evaluate_join, evaluate_leave};
pub use config::{ConfigError, ValuationConfig};
pub use context::ValuationContext;
pub use error::ValuationError;
pub use id::{ClanId, CultureId, FactionId, HeroId, IdGenerator, KingdomId, SettlementId};
pub use model::{
    Alliance, CampaignTime, Clan, ClanRelation, Kingdom, MapPosition, Settlement, SettlementKind,
    SnapshotError, SnapshotFile, War, WarSide, WorldSnapshot,
};
pub use valuation::IMPOSSIBLE;
