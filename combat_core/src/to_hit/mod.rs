//! To-hit resolution - five interchangeable algorithms
//!
//! `ToHitResolver` is a closed set of variants. Each one builds the attack
//! formula the same way and differs only in how a roll total becomes the
//! lowest armor class defeated.

mod table;

pub use table::{lowest_satisfied, BoundedTable, Plateau, PlateauTable, TableEntry, TableHalf};

use crate::attack::{AttackContext, AttackFormula, LowestArmorDefeated, TargetResult};
use crate::modifier::{
    compute_melee_modifier, compute_missile_modifier, ModifierBreakdown, ModifierRules,
    ModifierSource,
};
use crate::stats::{AttackerStats, TargetStats};
use crate::types::AttackCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default attack die
pub const DEFAULT_ATTACK_DICE: &str = "1d20";

/// Identifies one of the to-hit algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToHitVariant {
    DescendingThac0,
    AscendingAc,
    Classic,
    DarkDungeons,
    Heroic,
}

impl ToHitVariant {
    pub fn all() -> &'static [ToHitVariant] {
        &[
            ToHitVariant::DescendingThac0,
            ToHitVariant::AscendingAc,
            ToHitVariant::Classic,
            ToHitVariant::DarkDungeons,
            ToHitVariant::Heroic,
        ]
    }
}

impl fmt::Display for ToHitVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToHitVariant::DescendingThac0 => "descending_thac0",
            ToHitVariant::AscendingAc => "ascending_ac",
            ToHitVariant::Classic => "classic",
            ToHitVariant::DarkDungeons => "dark_dungeons",
            ToHitVariant::Heroic => "heroic",
        };
        f.write_str(name)
    }
}

/// Which armor class scale a variant compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorScale {
    /// Lower is better; hit when the target AC is at or above the lowest defeated
    Descending,
    /// Higher is better; hit when the target AAC is at or below the roll
    Ascending,
}

/// The active to-hit algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToHitResolver {
    DescendingThac0,
    AscendingAc,
    Classic(BoundedTable),
    DarkDungeons(PlateauTable),
    Heroic(PlateauTable),
}

impl ToHitResolver {
    /// Resolver with the stock tables for a variant
    pub fn for_variant(variant: ToHitVariant) -> Self {
        match variant {
            ToHitVariant::DescendingThac0 => ToHitResolver::DescendingThac0,
            ToHitVariant::AscendingAc => ToHitResolver::AscendingAc,
            ToHitVariant::Classic => ToHitResolver::Classic(BoundedTable::classic()),
            ToHitVariant::DarkDungeons => ToHitResolver::DarkDungeons(PlateauTable::dark_dungeons()),
            ToHitVariant::Heroic => ToHitResolver::Heroic(PlateauTable::heroic()),
        }
    }

    pub fn variant(&self) -> ToHitVariant {
        match self {
            ToHitResolver::DescendingThac0 => ToHitVariant::DescendingThac0,
            ToHitResolver::AscendingAc => ToHitVariant::AscendingAc,
            ToHitResolver::Classic(_) => ToHitVariant::Classic,
            ToHitResolver::DarkDungeons(_) => ToHitVariant::DarkDungeons,
            ToHitResolver::Heroic(_) => ToHitVariant::Heroic,
        }
    }

    pub fn scale(&self) -> ArmorScale {
        match self {
            ToHitResolver::AscendingAc => ArmorScale::Ascending,
            _ => ArmorScale::Descending,
        }
    }

    /// Difficulty handed to `resolve_outcome` for this attacker
    pub fn effective_difficulty(&self, attacker: &AttackerStats) -> i32 {
        attacker.thac0
    }

    /// Build the formula for an attack without rolling anything
    ///
    /// Digest order: manual, attack bonus (ascending scale only), weapon and
    /// ammo, effects, ability, target, opponent groups, weapon mastery.
    pub fn build_attack_formula(
        &self,
        ctx: &AttackContext,
        rules: ModifierRules<'_>,
    ) -> AttackFormula {
        let mut breakdown = ModifierBreakdown::new();

        if let Some(manual) = ctx.options.manual_modifier {
            breakdown.push(ModifierSource::Manual, manual, "Manual");
        }

        if self.scale() == ArmorScale::Ascending {
            breakdown.push(
                ModifierSource::AttackBonus,
                ctx.attacker.attack_bonus,
                "Attack bonus",
            );
        }

        let base = match ctx.weapon.category {
            AttackCategory::Melee => {
                compute_melee_modifier(&ctx.attacker, &ctx.weapon, ctx.target.as_ref(), rules)
            }
            AttackCategory::Missile => compute_missile_modifier(
                &ctx.attacker,
                &ctx.weapon,
                ctx.ammo.as_ref(),
                ctx.target.as_ref(),
                rules,
            ),
        };
        breakdown.extend(base);

        if let Some(mastery) = rules.weapon_mastery {
            if let Some(level) = ctx.weapon.mastery {
                breakdown.push(
                    ModifierSource::Mastery,
                    mastery.to_hit_bonus(level),
                    format!("Mastery ({})", level),
                );
            }
        }

        AttackFormula {
            dice_expression: ctx
                .options
                .forced_formula
                .clone()
                .unwrap_or_else(|| DEFAULT_ATTACK_DICE.to_string()),
            numeric_modifier: breakdown.amount,
            digest: breakdown.digest,
        }
    }

    /// Turn a roll into the lowest armor class it defeats
    ///
    /// `dice_sum` is the natural roll (dice only), `roll_total` includes
    /// every modifier.
    pub fn resolve_outcome(
        &self,
        dice_sum: i32,
        roll_total: i32,
        effective_difficulty: i32,
    ) -> LowestArmorDefeated {
        match self {
            ToHitResolver::DescendingThac0 => {
                LowestArmorDefeated::Armor(effective_difficulty - roll_total)
            }
            ToHitResolver::AscendingAc => LowestArmorDefeated::Armor(roll_total),
            ToHitResolver::Classic(table) => {
                if let Some(natural) = natural_result(dice_sum) {
                    return natural;
                }
                from_table(&table.build(effective_difficulty), roll_total)
            }
            ToHitResolver::DarkDungeons(table) | ToHitResolver::Heroic(table) => {
                if table.natural_override {
                    if let Some(natural) = natural_result(dice_sum) {
                        return natural;
                    }
                }
                from_table(&table.build(effective_difficulty), roll_total)
            }
        }
    }

    /// Whether a target is hit, on this resolver's scale
    pub fn target_result(
        &self,
        lowest: LowestArmorDefeated,
        target: &TargetStats,
        category: AttackCategory,
    ) -> TargetResult {
        let success = target.armor_class.map(|ac| match lowest {
            LowestArmorDefeated::Armor(value) => match self.scale() {
                ArmorScale::Descending => ac.descending(category) >= value,
                ArmorScale::Ascending => ac.ascending(category) <= value,
            },
            sentinel => !sentinel.is_miss(),
        });

        let message = match success {
            Some(true) => format!("Hit {}", target.name),
            Some(false) => format!("Missed {}", target.name),
            None => format!("{} has no armor class", target.name),
        };

        TargetResult {
            target_id: target.id.clone(),
            success,
            message,
        }
    }

    pub fn resolve_targets(
        &self,
        lowest: LowestArmorDefeated,
        targets: &[TargetStats],
        category: AttackCategory,
    ) -> Vec<TargetResult> {
        targets
            .iter()
            .map(|t| self.target_result(lowest, t, category))
            .collect()
    }
}

impl Default for ToHitResolver {
    fn default() -> Self {
        ToHitResolver::DescendingThac0
    }
}

fn natural_result(dice_sum: i32) -> Option<LowestArmorDefeated> {
    match dice_sum {
        1 => Some(LowestArmorDefeated::GuaranteedMiss),
        20 => Some(LowestArmorDefeated::GuaranteedHit),
        _ => None,
    }
}

fn from_table(entries: &[TableEntry], roll_total: i32) -> LowestArmorDefeated {
    lowest_satisfied(entries, roll_total)
        .map(LowestArmorDefeated::Armor)
        .unwrap_or(LowestArmorDefeated::NoArmorHit)
}
