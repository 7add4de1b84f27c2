//! Per-party values for proposed allegiance changes.
//!
//! A barterable is a short-lived proposal (`owner` clan, optional `target`
//! faction). Asking it for its value to a requester first classifies the
//! requester into a [`Perspective`], then routes to the matching valuator.

pub mod join;
pub mod leave;

use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{ClanId, FactionId};

pub use join::JoinKingdomAsClan;
pub use leave::LeaveKingdomAsClan;

/// How a requester relates to a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    /// The clan making the move.
    Owner,
    /// The kingdom a join would deliver the clan to.
    DirectTarget,
    /// The kingdom a leave would take the clan away from.
    OwnFactionLosing,
    /// A kingdom at war with the one losing the clan.
    RivalFaction,
    UnrelatedThirdParty,
}

pub trait Barterable {
    fn classify(&self, ctx: &ValuationContext, requester: FactionId) -> Result<Perspective, ValuationError>;

    /// Signed utility of the proposal to `requester`.
    fn value_for(&self, ctx: &ValuationContext, requester: FactionId) -> Result<f64, ValuationError>;
}

/// Value to `requester` of `owner` joining `target`.
pub fn evaluate_join(
    ctx: &ValuationContext,
    owner: ClanId,
    target: Option<FactionId>,
    requester: FactionId,
) -> Result<f64, ValuationError> {
    JoinKingdomAsClan { owner, target }.value_for(ctx, requester)
}

/// Value to `requester` of `owner` leaving its kingdom.
pub fn evaluate_leave(
    ctx: &ValuationContext,
    owner: ClanId,
    target: Option<FactionId>,
    requester: FactionId,
) -> Result<f64, ValuationError> {
    LeaveKingdomAsClan { owner, target }.value_for(ctx, requester)
}
