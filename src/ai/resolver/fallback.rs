//! Generic rescue.
//!
//! Reached when no tier produced an acceptable answer or the prompt failed
//! validation. Always returns something: `Skip` where skipping is allowed,
//! else the first legal candidate, else a shape-correct neutral answer.

use tracing::warn;

use super::easy::simple_answer;
use crate::ai::context::DecisionContext;
use crate::core::{AiAction, ControlChoice, ResponseKind, RevealFollowUp};
use crate::effects::ActionRequired;

/// Answer `action` without heuristics.
#[must_use]
pub fn rescue(ctx: &DecisionContext<'_>, action: &ActionRequired) -> AiAction {
    if action.allows_skip() {
        return AiAction::Skip;
    }

    let mut first = |_len: usize| 0_usize;
    if let Some(answer) = simple_answer(ctx, action, &mut first) {
        if action.accepts(&answer) {
            return answer;
        }
    }

    warn!(target: "compile_ai::resolver", prompt = action.kind.name(), "no legal candidate");
    neutral(action.expected_response())
}

/// Answer of the expected shape that changes as little as possible.
fn neutral(kind: ResponseKind) -> AiAction {
    match kind {
        ResponseKind::DiscardCards => AiAction::discard([]),
        ResponseKind::ResolveOptionalEffectPrompt => {
            AiAction::ResolveOptionalEffectPrompt { accept: false }
        }
        ResponseKind::ResolveDiscardOrDeletePrompt => {
            AiAction::ResolveDiscardOrDeletePrompt { discard: true }
        }
        ResponseKind::ResolveRevealedCardPrompt => AiAction::ResolveRevealedCardPrompt {
            choice: RevealFollowUp::Skip,
        },
        ResponseKind::ResolveControlMechanicPrompt => AiAction::ResolveControlMechanicPrompt {
            choice: ControlChoice::Skip,
        },
        _ => AiAction::Skip,
    }
}
