//! Attack inputs and results

mod resolve;

pub use resolve::{resolve_attack, ResolvedAttack};

use crate::modifier::ModifierContribution;
use crate::stats::{AmmoStats, AttackerStats, TargetStats, WeaponStats};
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// Caller-supplied adjustments for one attack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOptions {
    /// Situational modifier typed in by the player or referee
    #[serde(default)]
    pub manual_modifier: Option<i32>,
    /// Replaces the default `1d20`
    #[serde(default)]
    pub forced_formula: Option<String>,
}

/// Snapshot of everything the to-hit resolver needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackContext {
    pub attacker: AttackerStats,
    pub weapon: WeaponStats,
    #[serde(default)]
    pub ammo: Option<AmmoStats>,
    #[serde(default)]
    pub target: Option<TargetStats>,
    #[serde(default)]
    pub options: AttackOptions,
}

impl AttackContext {
    pub fn new(attacker: AttackerStats, weapon: WeaponStats) -> Self {
        AttackContext {
            attacker,
            weapon,
            ammo: None,
            target: None,
            options: AttackOptions::default(),
        }
    }

    pub fn with_target(mut self, target: TargetStats) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_ammo(mut self, ammo: AmmoStats) -> Self {
        self.ammo = Some(ammo);
        self
    }

    pub fn with_manual_modifier(mut self, amount: i32) -> Self {
        self.options.manual_modifier = Some(amount);
        self
    }

    pub fn with_forced_formula(mut self, formula: impl Into<String>) -> Self {
        self.options.forced_formula = Some(formula.into());
        self
    }
}

/// Dice expression plus the modifier that goes with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackFormula {
    pub dice_expression: String,
    pub numeric_modifier: i32,
    pub digest: Vec<ModifierContribution>,
}

impl AttackFormula {
    /// Full formula handed to the dice roller, e.g. `1d20+3`
    pub fn roll_expression(&self) -> String {
        match self.numeric_modifier {
            0 => self.dice_expression.clone(),
            m => format!("{}{:+}", self.dice_expression, m),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.digest.iter().map(|c| c.label.as_str()).collect()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let terms: Vec<String> = self.digest.iter().map(|c| c.describe()).collect();
        if terms.is_empty() {
            self.roll_expression()
        } else {
            format!("{} ({})", self.roll_expression(), terms.join(", "))
        }
    }
}

/// The best-armored AC a roll defeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowestArmorDefeated {
    Armor(i32),
    /// Natural minimum roll
    GuaranteedMiss,
    /// Natural maximum roll
    GuaranteedHit,
    /// No table entry is satisfied
    NoArmorHit,
}

impl LowestArmorDefeated {
    /// Numeric form on the descending scale
    ///
    /// A guaranteed hit compares below every AC, both miss forms above.
    pub fn sentinel_value(&self) -> i32 {
        match self {
            LowestArmorDefeated::Armor(ac) => *ac,
            LowestArmorDefeated::GuaranteedHit => i32::MIN,
            LowestArmorDefeated::GuaranteedMiss | LowestArmorDefeated::NoArmorHit => i32::MAX,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            LowestArmorDefeated::GuaranteedMiss | LowestArmorDefeated::NoArmorHit
        )
    }
}

/// Per-target hit result; `success` is `None` when the target has no usable AC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    pub target_id: CombatantId,
    pub success: Option<bool>,
    pub message: String,
}

/// Resolved outcome of one attack roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub lowest_armor_defeated: LowestArmorDefeated,
    pub per_target: Vec<TargetResult>,
}

impl AttackOutcome {
    /// Ids of every target that was hit
    pub fn hits(&self) -> Vec<&CombatantId> {
        self.per_target
            .iter()
            .filter(|r| r.success == Some(true))
            .map(|r| &r.target_id)
            .collect()
    }
}
