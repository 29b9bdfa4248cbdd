//! Modifier aggregation - additive to-hit contributions with an ordered digest
//!
//! Every contribution is appended to a `ModifierBreakdown` in a fixed order.
//! The numeric sum does not depend on the order, but the digest does, and the
//! digest is what gets shown to players.

mod aggregator;
mod groups;

pub use aggregator::{compute_melee_modifier, compute_missile_modifier};
pub use groups::{apply_group_modifiers, NoSpecialRules, SpecialRuleOracle};

use crate::rules::{AbilityScoreRules, WeaponMasteryRules};
use serde::{Deserialize, Serialize};

/// Where a contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierSource {
    Manual,
    AttackBonus,
    Weapon,
    Ammo,
    Effects,
    Ability,
    Target,
    OpponentGroup,
    Mastery,
}

/// One term of a digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierContribution {
    pub source: ModifierSource,
    pub amount: i32,
    pub label: String,
}

impl ModifierContribution {
    pub fn new(source: ModifierSource, amount: i32, label: impl Into<String>) -> Self {
        ModifierContribution {
            source,
            amount,
            label: label.into(),
        }
    }

    /// Display form, e.g. `Longsword +1`
    pub fn describe(&self) -> String {
        format!("{} {:+}", self.label, self.amount)
    }
}

/// Running total plus the digest that explains it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBreakdown {
    pub amount: i32,
    pub digest: Vec<ModifierContribution>,
}

impl ModifierBreakdown {
    pub fn new() -> Self {
        ModifierBreakdown::default()
    }

    /// Append a contribution. Zero amounts are skipped.
    pub fn push(&mut self, source: ModifierSource, amount: i32, label: impl Into<String>) {
        if amount == 0 {
            return;
        }
        self.amount += amount;
        self.digest
            .push(ModifierContribution::new(source, amount, label));
    }

    /// Append every contribution of `other`, keeping its order
    pub fn extend(&mut self, other: ModifierBreakdown) {
        self.amount += other.amount;
        self.digest.extend(other.digest);
    }

    pub fn labels(&self) -> Vec<&str> {
        self.digest.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn sources(&self) -> Vec<ModifierSource> {
        self.digest.iter().map(|c| c.source).collect()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.digest.is_empty() {
            return "No modifiers".to_string();
        }
        self.digest
            .iter()
            .map(ModifierContribution::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Optional collaborators consulted while aggregating
///
/// Every field may be absent; an absent collaborator contributes zero.
#[derive(Clone, Copy, Default)]
pub struct ModifierRules<'a> {
    pub ability_scores: Option<&'a dyn AbilityScoreRules>,
    pub weapon_mastery: Option<&'a dyn WeaponMasteryRules>,
    pub special_rules: Option<&'a dyn SpecialRuleOracle>,
}

impl<'a> ModifierRules<'a> {
    pub fn none() -> Self {
        ModifierRules::default()
    }

    pub fn with_special_rules(mut self, oracle: &'a dyn SpecialRuleOracle) -> Self {
        self.special_rules = Some(oracle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_skips_zero() {
        let mut b = ModifierBreakdown::new();
        b.push(ModifierSource::Weapon, 0, "Club");
        assert_eq!(b.amount, 0);
        assert!(b.digest.is_empty());
        assert_eq!(b.summary(), "No modifiers");
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = ModifierBreakdown::new();
        first.push(ModifierSource::Manual, 2, "Manual");

        let mut second = ModifierBreakdown::new();
        second.push(ModifierSource::Weapon, 1, "Sword");
        second.push(ModifierSource::Ability, -1, "Strength");

        first.extend(second);
        assert_eq!(first.amount, 2);
        assert_eq!(first.labels(), vec!["Manual", "Sword", "Strength"]);
        assert_eq!(first.summary(), "Manual +2, Sword +1, Strength -1");
    }
}
