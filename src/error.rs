use thiserror::Error;

use crate::id::{ClanId, KingdomId, SettlementId};

/// Precondition violations raised while scoring.
///
/// Domain impossibility (a ruler joining its own kingdom, a join offer with no
/// kingdom attached) is not an error; it is reported as a sentinel score.
/// These variants mean the host handed the engine inconsistent data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValuationError {
    #[error("unknown clan {0}")]
    UnknownClan(ClanId),
    #[error("unknown kingdom {0}")]
    UnknownKingdom(KingdomId),
    #[error("unknown settlement {0}")]
    UnknownSettlement(SettlementId),
    #[error("clan {0} has no leader")]
    MissingLeader(ClanId),
    #[error("clan {0} is not a member of any kingdom")]
    NotInKingdom(ClanId),
    #[error("clan {clan} last changed faction {days_ahead:.1} days in the future")]
    FactionChangeInFuture { clan: ClanId, days_ahead: f64 },
    #[error("power ratio for {kingdom} is not a finite non-negative number: {value}")]
    InvalidPowerRatio { kingdom: KingdomId, value: f64 },
}
