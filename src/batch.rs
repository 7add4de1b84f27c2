//! Bulk evaluation over a snapshot.
//!
//! Every evaluation reads the same immutable context, so the work is split
//! across rayon's pool with no shared accumulator; results come back in input
//! (or ID) order regardless of scheduling.

use rayon::prelude::*;

use crate::barter::{evaluate_join, evaluate_leave};
use crate::context::ValuationContext;
use crate::error::ValuationError;
use crate::id::{ClanId, FactionId, KingdomId};

/// Both sides of one possible join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinAssessment {
    pub clan: ClanId,
    pub kingdom: KingdomId,
    /// What the clan thinks of joining (including leaving its current kingdom).
    pub clan_value: f64,
    /// What the kingdom thinks of receiving the clan.
    pub kingdom_value: f64,
}

/// Score every clan against every kingdom, ordered by (clan, kingdom).
pub fn assess_all_joins(ctx: &ValuationContext) -> Result<Vec<JoinAssessment>, ValuationError> {
    let pairs: Vec<(ClanId, KingdomId)> = ctx
        .world
        .clans()
        .flat_map(|clan| ctx.world.kingdoms().map(move |kingdom| (clan.id, kingdom.id)))
        .collect();

    let assessments = pairs
        .into_par_iter()
        .map(|(clan, kingdom)| {
            let target = Some(FactionId::Kingdom(kingdom));
            Ok(JoinAssessment {
                clan,
                kingdom,
                clan_value: evaluate_join(ctx, clan, target, FactionId::Clan(clan))?,
                kingdom_value: evaluate_join(ctx, clan, target, FactionId::Kingdom(kingdom))?,
            })
        })
        .collect::<Result<Vec<_>, ValuationError>>()?;

    tracing::debug!(count = assessments.len(), "assessed joins");
    Ok(assessments)
}

/// A proposal as seen by one requesting party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    Join {
        owner: ClanId,
        target: Option<FactionId>,
        requester: FactionId,
    },
    Leave {
        owner: ClanId,
        target: Option<FactionId>,
        requester: FactionId,
    },
}

impl Proposal {
    pub fn evaluate(&self, ctx: &ValuationContext) -> Result<f64, ValuationError> {
        match *self {
            Proposal::Join {
                owner,
                target,
                requester,
            } => evaluate_join(ctx, owner, target, requester),
            Proposal::Leave {
                owner,
                target,
                requester,
            } => evaluate_leave(ctx, owner, target, requester),
        }
    }
}

/// Evaluate proposals in parallel; one result per proposal, in input order.
pub fn evaluate_proposals(ctx: &ValuationContext, proposals: &[Proposal]) -> Vec<Result<f64, ValuationError>> {
    proposals.par_iter().map(|p| p.evaluate(ctx)).collect()
}
