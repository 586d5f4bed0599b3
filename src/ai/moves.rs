//! Move generation and scoring for the action phase.
//!
//! Every (hand card, lane, orientation) triple that the rules allow is
//! scored, plus refilling the hand. The list is sorted by score, noise may
//! swap the top two, and the first candidate that still validates wins.
//!
//! ## Score components
//!
//! - Blocking an opposing compile dominates everything else; playing into
//!   a lane the opponent compiles anyway is penalized as a wasted card.
//! - Reaching our own compile condition earns a setup bonus.
//! - Value building, board opening and disruption are smaller terms.
//! - Face-down plays pay for the value they hide.

use std::cmp::Ordering;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::context::DecisionContext;
use crate::cards::{Card, Keyword};
use crate::core::{AiAction, RandomSource, LANE_COUNT};

/// A candidate action with its heuristic score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMove {
    pub action: AiAction,
    pub score: f64,
    /// The move stops an opposing compile.
    pub blocks: bool,
}

impl ScoredMove {
    fn new(action: AiAction, score: f64) -> Self {
        Self {
            action,
            score,
            blocks: false,
        }
    }
}

/// Restrictions on which plays to consider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayConstraints {
    /// Only this lane.
    pub lane: Option<usize>,
    /// Never this lane.
    pub disallowed_lane: Option<usize>,
    /// Only face-down plays.
    pub face_down_only: bool,
}

impl PlayConstraints {
    fn admits_lane(&self, lane: usize) -> bool {
        self.lane.map_or(true, |l| l == lane) && self.disallowed_lane != Some(lane)
    }
}

/// Sort descending by score, keeping insertion order among equals.
pub fn sort_moves(moves: &mut [ScoredMove]) {
    moves.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Score placing `card` into `lane` with the given orientation.
///
/// Returns `None` when the lane is compiled for us or the play is illegal.
#[must_use]
pub fn score_play(
    ctx: &DecisionContext<'_>,
    card: &Card,
    lane: usize,
    face_up: bool,
) -> Option<ScoredMove> {
    if lane >= LANE_COUNT || ctx.is_compiled(ctx.me, lane) {
        return None;
    }
    if let Err(reason) = ctx
        .rules
        .can_play_card(ctx.state, ctx.me, lane, face_up, &card.protocol)
    {
        trace!(target: "compile_ai::moves", card = %card.id, lane, face_up, %reason, "play not allowed");
        return None;
    }

    let p = ctx.profile;
    let config = ctx.config();
    let threshold = f64::from(ctx.threshold());

    let before = ctx.lane_value(ctx.me, lane);
    let opposing = ctx.lane_value(ctx.opp(), lane);
    let placed = card.oriented(face_up);
    let stack = ctx.stack_with_card(ctx.me, lane, &placed);
    let after = ctx.value_with_stack(ctx.me, lane, &stack);
    let opposing_after = ctx.facing_value_with_stack(ctx.me, lane, &stack);

    let action = AiAction::PlayCard {
        card_id: card.id,
        lane,
        face_up,
    };

    let sets_up = config.compiles(after, opposing_after) && !config.compiles(before, opposing);

    if config.compiles(opposing, before) {
        if config.compiles(opposing_after, after) {
            return Some(ScoredMove::new(action, -p.fail_to_block_penalty));
        }
        let mut score = p.block_bonus + p.value_weight * f64::from(after);
        if sets_up {
            score += p.compile_setup_bonus;
        }
        return Some(ScoredMove {
            action,
            score,
            blocks: true,
        });
    }

    let mut score = p.value_weight * f64::from(after - before);

    if sets_up {
        score += p.compile_setup_bonus;
    } else if config.compiles(before, opposing) {
        score -= p.overbuild_penalty;
    }

    let cap = ctx.threshold();
    score += p.lane_progress_weight * f64::from(after.min(cap) - before.min(cap)) / threshold;

    if face_up {
        if ctx.mine().board_card_count() == 0 && card.value >= 4 {
            score += p.early_opening_bonus;
        }
        if card.has_disruption() {
            if ctx.opponent_has_targets() {
                score += p.disruption_bonus * card.keywords.disruption_count() as f64;
            } else if card.keywords.iter().any(|k| k.needs_board_target()) {
                score -= p.no_target_penalty;
            }
        }
        if card.has_keyword(Keyword::Draw) && ctx.mine().hand.len() > ctx.hand_limit() {
            score -= p.forced_discard_penalty;
        }
    } else {
        let hidden = card.value - ctx.face_down_value_in(ctx.me, lane);
        if hidden > 0 && !sets_up {
            score -= p.face_down_penalty * f64::from(hidden);
        }
    }

    if let Some(top) = ctx.mine().uncovered(lane) {
        if top.deletes_self_on_cover() {
            score -= p.cover_loss_penalty * f64::from(top.value);
        }
    }

    if ctx.hunting_control() && before <= opposing && after > opposing {
        score += p.control_lead_bonus;
    }

    Some(ScoredMove::new(action, score))
}

/// Score every allowed play, sorted best first.
#[must_use]
pub fn score_plays(ctx: &DecisionContext<'_>, constraints: PlayConstraints) -> Vec<ScoredMove> {
    let mut moves = Vec::new();
    for card in ctx.mine().hand.iter() {
        for lane in (0..LANE_COUNT).filter(|l| constraints.admits_lane(*l)) {
            let orientations: &[bool] = if constraints.face_down_only {
                &[false]
            } else {
                &[true, false]
            };
            for face_up in orientations {
                if let Some(m) = score_play(ctx, card, lane, *face_up) {
                    trace!(target: "compile_ai::moves", action = ?m.action, score = m.score, blocks = m.blocks, "candidate");
                    moves.push(m);
                }
            }
        }
    }
    sort_moves(&mut moves);
    moves
}

/// Score of refilling the hand, if refilling is possible.
fn refill_move(ctx: &DecisionContext<'_>, plays: &[ScoredMove]) -> Option<ScoredMove> {
    if ctx.mine().hand.len() >= ctx.hand_limit() {
        return None;
    }

    let p = ctx.profile;
    let threats = ctx.imminent_compiles(ctx.opp());
    let emergency = !threats.is_empty()
        && ((ctx.holds_control() && control_can_defuse(ctx, &threats))
            || (!plays.iter().any(|m| m.blocks)
                && plays.first().map_or(true, |m| m.score <= 0.0)));

    let score = if emergency {
        p.emergency_refill_score
    } else {
        p.refill_score
    };
    Some(ScoredMove::new(AiAction::FillHand, score))
}

/// Whether a rearrange could turn an opposing compile into a recompile.
fn control_can_defuse(ctx: &DecisionContext<'_>, threats: &[usize]) -> bool {
    let theirs = ctx.theirs();
    theirs.compiled_count() > 0 && threats.iter().any(|lane| !theirs.compiled[*lane])
}

/// All scored candidates for the action phase, best first.
///
/// An empty hand yields only `FillHand`.
#[must_use]
pub fn rank_moves(ctx: &DecisionContext<'_>) -> Vec<ScoredMove> {
    if ctx.mine().hand.is_empty() {
        return vec![ScoredMove::new(AiAction::FillHand, f64::MAX)];
    }
    let mut moves = score_plays(ctx, PlayConstraints::default());
    if let Some(refill) = refill_move(ctx, &moves) {
        moves.push(refill);
        sort_moves(&mut moves);
    }
    moves
}

/// Swap the top two moves with the profile's noise probability.
///
/// Never displaces a blocking move, and only promotes a positive one.
pub fn apply_noise(moves: &mut [ScoredMove], noise: f64, rng: &mut dyn RandomSource) {
    if moves.len() < 2 || moves[0].blocks || moves[1].score <= 0.0 {
        return;
    }
    if rng.gen_bool(noise) {
        debug!(target: "compile_ai::moves", from = ?moves[0].action, to = ?moves[1].action, "noise swapped top move");
        moves.swap(0, 1);
    }
}

/// Re-check a move against the snapshot.
#[must_use]
pub fn validate_move(ctx: &DecisionContext<'_>, action: &AiAction) -> bool {
    match action {
        AiAction::PlayCard {
            card_id,
            lane,
            face_up,
        } => {
            let Some(card) = ctx.mine().hand_card(*card_id) else {
                return false;
            };
            *lane < LANE_COUNT
                && !ctx.is_compiled(ctx.me, *lane)
                && ctx
                    .rules
                    .can_play_card(ctx.state, ctx.me, *lane, *face_up, &card.protocol)
                    .is_ok()
        }
        AiAction::FillHand => true,
        _ => false,
    }
}

/// Pick the action-phase move.
pub fn best_move(ctx: &DecisionContext<'_>, rng: &mut dyn RandomSource) -> AiAction {
    let mut moves = rank_moves(ctx);
    apply_noise(&mut moves, ctx.profile.move_noise, rng);

    for m in &moves {
        if validate_move(ctx, &m.action) {
            debug!(target: "compile_ai::moves", action = ?m.action, score = m.score, "chose move");
            return m.action.clone();
        }
        warn!(target: "compile_ai::moves", action = ?m.action, "candidate failed validation");
    }
    AiAction::FillHand
}

/// Pick a lane to compile.
///
/// Uncompiled protocols first, then the lane where the opponent loses the
/// most value. No eligible lane resolves to `Skip`.
#[must_use]
pub fn choose_compile(ctx: &DecisionContext<'_>, lanes: &[usize]) -> AiAction {
    let eligible: SmallVec<[usize; LANE_COUNT]> =
        lanes.iter().copied().filter(|l| *l < LANE_COUNT).collect();

    eligible
        .iter()
        .copied()
        .min_by_key(|lane| {
            (
                ctx.is_compiled(ctx.me, *lane),
                -ctx.lane_value(ctx.opp(), *lane),
                *lane,
            )
        })
        .map_or(AiAction::Skip, |lane| AiAction::Compile { lane })
}
