//! Protocol rearrangement, swaps and the control mechanic.
//!
//! Cards stay in their lanes; only the protocol names move, and each
//! compiled flag travels with its protocol. An arrangement is scored from
//! the owning side's point of view:
//!
//! - lane value sitting under uncompiled protocols
//! - a full compile bonus for threatened lanes under uncompiled protocols,
//!   a quarter of it when the threat would only recompile
//! - hand cards that can be played face-up into uncompiled lanes
//!
//! The opponent's arrangements are scored the same way and negated.

use tracing::debug;

use super::rank;
use crate::ai::context::DecisionContext;
use crate::core::{AiAction, ControlChoice, Side, LANE_COUNT};

/// Every ordering of three lanes; the first is the identity.
pub(crate) const PERMUTATIONS: [[usize; LANE_COUNT]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

pub(crate) const SWAP_PAIRS: [[usize; 2]; 3] = [[0, 1], [0, 2], [1, 2]];

/// A candidate placement of one side's protocols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrangement {
    pub protocols: [String; LANE_COUNT],
    pub compiled: [bool; LANE_COUNT],
}

impl Arrangement {
    /// The side's current placement.
    #[must_use]
    pub fn current(ctx: &DecisionContext<'_>, side: Side) -> Self {
        let s = ctx.side(side);
        Self {
            protocols: s.protocols.clone(),
            compiled: s.compiled,
        }
    }

    /// Lane `i` receives what currently sits in lane `perm[i]`.
    #[must_use]
    pub fn permuted(&self, perm: [usize; LANE_COUNT]) -> Self {
        Self {
            protocols: perm.map(|i| self.protocols[i].clone()),
            compiled: perm.map(|i| self.compiled[i]),
        }
    }

    /// Exchange the protocols of two lanes.
    #[must_use]
    pub fn swapped(&self, [a, b]: [usize; 2]) -> Self {
        let mut next = self.clone();
        next.protocols.swap(a, b);
        next.compiled.swap(a, b);
        next
    }
}

/// Value of `arrangement` for `side`, higher is better for that side.
#[must_use]
pub fn arrangement_score(
    ctx: &DecisionContext<'_>,
    side: Side,
    arrangement: &Arrangement,
) -> f64 {
    let p = ctx.profile;
    let config = ctx.config();
    let other = side.opposite();
    let other_protocols = &ctx.side(other).protocols;

    let mut score = 0.0;
    for lane in 0..LANE_COUNT {
        let value = ctx.lane_value(side, lane);
        let threat = config.compiles(value, ctx.lane_value(other, lane));
        if arrangement.compiled[lane] {
            if threat {
                score += p.compile_setup_bonus / 4.0;
            }
        } else {
            score += p.value_weight * f64::from(value);
            if threat {
                score += p.compile_setup_bonus;
            }
        }
    }

    for card in &ctx.side(side).hand {
        let best = (0..LANE_COUNT)
            .filter(|lane| {
                !arrangement.compiled[*lane]
                    && (card.protocol == arrangement.protocols[*lane]
                        || card.protocol == other_protocols[*lane])
            })
            .map(|lane| {
                let after = ctx.lane_value(side, lane) + card.value;
                if config.compiles(after, ctx.lane_value(other, lane)) {
                    p.compile_setup_bonus / 4.0
                } else {
                    f64::from(card.value)
                }
            })
            .fold(0.0, f64::max);
        score += best;
    }
    score
}

/// Arrangement score from our point of view.
fn our_view(ctx: &DecisionContext<'_>, target: Side, arrangement: &Arrangement) -> f64 {
    let score = arrangement_score(ctx, target, arrangement);
    if target == ctx.me {
        score
    } else {
        -score
    }
}

/// Best permutation of `target`'s protocols and its gain over the current
/// placement, from our point of view.
#[must_use]
pub fn best_rearrangement(
    ctx: &DecisionContext<'_>,
    target: Side,
    must_change: bool,
) -> Option<(Arrangement, f64)> {
    let current = Arrangement::current(ctx, target);
    let baseline = our_view(ctx, target, &current);
    let candidates: Vec<(usize, f64)> = PERMUTATIONS
        .iter()
        .enumerate()
        .filter(|(i, _)| !must_change || *i != 0)
        .map(|(i, perm)| (i, our_view(ctx, target, &current.permuted(*perm))))
        .collect();
    let (index, score) = rank(candidates).into_iter().next()?;
    Some((current.permuted(PERMUTATIONS[index]), score - baseline))
}

/// Answer a rearrange prompt for `target`.
#[must_use]
pub fn rearrange(ctx: &DecisionContext<'_>, target: Side, must_change: bool) -> AiAction {
    match best_rearrangement(ctx, target, must_change) {
        Some((arrangement, gain)) => {
            debug!(target: "compile_ai::resolver", %target, gain, order = ?arrangement.protocols, "rearrange");
            AiAction::RearrangeProtocols {
                target,
                order: arrangement.protocols,
            }
        }
        None => AiAction::Skip,
    }
}

/// Answer a swap prompt for `target`.
#[must_use]
pub fn swap(ctx: &DecisionContext<'_>, target: Side) -> AiAction {
    let current = Arrangement::current(ctx, target);
    let scored = SWAP_PAIRS
        .iter()
        .map(|pair| (*pair, our_view(ctx, target, &current.swapped(*pair))))
        .collect();
    rank(scored)
        .first()
        .map_or(AiAction::Skip, |(lanes, _)| AiAction::ResolveSwapProtocols {
            target,
            lanes: *lanes,
        })
}

/// Whether a rearrange of the opponent moves one of their compile threats
/// onto an already compiled protocol.
#[must_use]
pub fn defuses_threat(ctx: &DecisionContext<'_>, arrangement: &Arrangement) -> bool {
    ctx.imminent_compiles(ctx.opp())
        .iter()
        .any(|lane| !ctx.is_compiled(ctx.opp(), *lane) && arrangement.compiled[*lane])
}

/// Use control on whichever side gains more, or keep it.
#[must_use]
pub fn use_control(ctx: &DecisionContext<'_>) -> AiAction {
    let min_gain = ctx.profile.control_lead_bonus;
    let theirs = best_rearrangement(ctx, ctx.opp(), true);
    let ours = best_rearrangement(ctx, ctx.me, true);

    let opponent_gain = match &theirs {
        Some((arrangement, gain)) if defuses_threat(ctx, arrangement) => gain.max(min_gain),
        Some((_, gain)) => *gain,
        None => f64::NEG_INFINITY,
    };
    let own_gain = ours.as_ref().map_or(f64::NEG_INFINITY, |(_, gain)| *gain);

    let choice = if opponent_gain >= min_gain && opponent_gain >= own_gain {
        ControlChoice::RearrangeOpponent
    } else if own_gain >= min_gain {
        ControlChoice::RearrangeOwn
    } else {
        ControlChoice::Skip
    };
    debug!(target: "compile_ai::resolver", ?choice, opponent_gain, own_gain, "control mechanic");
    AiAction::ResolveControlMechanicPrompt { choice }
}
