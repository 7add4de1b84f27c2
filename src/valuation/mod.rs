//! Scoring functions for clans changing allegiance.
//!
//! Every valuator returns a signed utility; positive means the party gains.

pub mod acquire;
pub mod mercenary;
pub mod multipliers;
pub mod settlement;
pub mod vassal;
pub mod war;

/// Returned when a transition cannot happen at all. Lower than any real score.
pub const IMPOSSIBLE: f64 = f64::NEG_INFINITY;

pub use acquire::{AcquireTerms, acquire_score, acquire_terms};
pub use mercenary::{MercenaryLeaveValuator, StructuralMercenaryLeave};
pub use multipliers::{MultiplierFamily, culture_multiplier, relation_multiplier};
pub use settlement::{clan_settlement_value, kingdom_fortification_value, settlement_value};
pub use vassal::{
    JoinTerms, LeaveTerms, clan_strength, cooldown_penalty, join_score, join_terms,
    kingdom_commander_heroes, leave_score, leave_terms,
};
pub use war::war_multiplier;
