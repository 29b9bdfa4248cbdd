//! End-to-end attack: formula, one dice call, outcome

use super::{AttackContext, AttackFormula, AttackOutcome};
use crate::dice::{DiceError, DiceRoll, DiceRoller};
use crate::modifier::ModifierRules;
use crate::to_hit::ToHitResolver;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything produced while resolving an attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAttack {
    pub formula: AttackFormula,
    pub roll: DiceRoll,
    pub outcome: AttackOutcome,
}

impl ResolvedAttack {
    /// Get a summary string
    pub fn summary(&self) -> String {
        let results: Vec<&str> = self
            .outcome
            .per_target
            .iter()
            .map(|r| r.message.as_str())
            .collect();
        format!(
            "{} = {} [{}]",
            self.formula.summary(),
            self.roll.total,
            results.join("; ")
        )
    }
}

/// Resolve an attack against the context's target
///
/// The roller is called exactly once. A roller error is returned as-is and
/// nothing is retried.
pub fn resolve_attack(
    resolver: &ToHitResolver,
    ctx: &AttackContext,
    rules: ModifierRules<'_>,
    dice: &mut dyn DiceRoller,
) -> Result<ResolvedAttack, DiceError> {
    let formula = resolver.build_attack_formula(ctx, rules);
    let roll = dice.evaluate(&formula.roll_expression())?;

    let difficulty = resolver.effective_difficulty(&ctx.attacker);
    let lowest = resolver.resolve_outcome(roll.dice_sum(), roll.total, difficulty);
    let outcome = AttackOutcome {
        lowest_armor_defeated: lowest,
        per_target: ctx
            .target
            .iter()
            .map(|t| resolver.target_result(lowest, t, ctx.weapon.category))
            .collect(),
    };

    debug!(
        attacker = %ctx.attacker.name,
        variant = %resolver.variant(),
        natural = roll.dice_sum(),
        total = roll.total,
        ?lowest,
        hits = outcome.hits().len(),
        "attack resolved"
    );

    Ok(ResolvedAttack {
        formula,
        roll,
        outcome,
    })
}
