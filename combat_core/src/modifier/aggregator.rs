//! Melee and missile modifier pipelines

use super::groups::apply_group_modifiers;
use super::{ModifierBreakdown, ModifierRules, ModifierSource};
use crate::stats::{AmmoStats, AttackerStats, TargetStats, WeaponStats};
use crate::types::AttackCategory;

/// Sum every melee to-hit contribution
///
/// Order: weapon, effects, strength, target self-inflicted, opponent groups.
pub fn compute_melee_modifier(
    attacker: &AttackerStats,
    weapon: &WeaponStats,
    target: Option<&TargetStats>,
    rules: ModifierRules<'_>,
) -> ModifierBreakdown {
    let mut breakdown = ModifierBreakdown::new();

    breakdown.push(ModifierSource::Weapon, weapon.to_hit, weapon.name.clone());
    breakdown.push(
        ModifierSource::Effects,
        attacker.effects.melee_to_hit,
        "Effects",
    );
    push_ability(&mut breakdown, attacker, AttackCategory::Melee, rules);

    if let Some(target) = target {
        push_target(&mut breakdown, weapon, None, target, rules);
    }

    breakdown
}

/// Sum every missile to-hit contribution
///
/// Order: weapon, ammo, effects, dexterity (strength for thrown weapons),
/// target self-inflicted, opponent groups from the weapon then the ammo.
pub fn compute_missile_modifier(
    attacker: &AttackerStats,
    weapon: &WeaponStats,
    ammo: Option<&AmmoStats>,
    target: Option<&TargetStats>,
    rules: ModifierRules<'_>,
) -> ModifierBreakdown {
    let mut breakdown = ModifierBreakdown::new();

    breakdown.push(ModifierSource::Weapon, weapon.to_hit, weapon.name.clone());
    if let Some(ammo) = ammo {
        breakdown.push(ModifierSource::Ammo, ammo.to_hit, ammo.name.clone());
    }
    breakdown.push(
        ModifierSource::Effects,
        attacker.effects.missile_to_hit,
        "Effects",
    );

    let ability_path = if weapon.thrown {
        AttackCategory::Melee
    } else {
        AttackCategory::Missile
    };
    push_ability(&mut breakdown, attacker, ability_path, rules);

    if let Some(target) = target {
        push_target(&mut breakdown, weapon, ammo, target, rules);
    }

    breakdown
}

fn push_ability(
    breakdown: &mut ModifierBreakdown,
    attacker: &AttackerStats,
    path: AttackCategory,
    rules: ModifierRules<'_>,
) {
    let (Some(ability_rules), Some(scores)) = (rules.ability_scores, attacker.ability_scores.as_ref())
    else {
        return;
    };

    match path {
        AttackCategory::Melee => breakdown.push(
            ModifierSource::Ability,
            ability_rules.melee_to_hit(scores),
            "Strength",
        ),
        AttackCategory::Missile => breakdown.push(
            ModifierSource::Ability,
            ability_rules.missile_to_hit(scores),
            "Dexterity",
        ),
    }
}

fn push_target(
    breakdown: &mut ModifierBreakdown,
    weapon: &WeaponStats,
    ammo: Option<&AmmoStats>,
    target: &TargetStats,
    rules: ModifierRules<'_>,
) {
    breakdown.push(
        ModifierSource::Target,
        target.self_inflicted_to_hit,
        format!("{} (target)", target.name),
    );

    apply_group_modifiers(&weapon.vs_groups, target, rules.special_rules, breakdown);
    if let Some(ammo) = ammo {
        apply_group_modifiers(&ammo.vs_groups, target, rules.special_rules, breakdown);
    }
}
