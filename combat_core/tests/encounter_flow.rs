//! Full encounter flow through the public API

use combat_core::prelude::*;
use combat_core::rules::{AbilityScoreVariant, InitiativeVariant, MasteryVariant};
use combat_core::{EncounterPhase, ModifierRules};
use std::sync::Arc;

fn registry_rules(config: RulesConfig) -> RuleSet {
    RuleSet::from_config(&RuleRegistry::with_defaults(), &config).unwrap()
}

#[test]
fn descending_thac0_end_to_end() {
    let rules = registry_rules(RulesConfig::default());
    let attacker = AttackerStats::new("Fighter", 19);
    let sword = WeaponStats::melee("Sword", 1);

    // THAC0 19 rolling 16 defeats AC 3: a hit needs target AC >= 3, so AC 2
    // is the first armor class it misses
    let mut dice = ScriptedDice::new([15, 15]);

    let vs_ac3 = AttackContext::new(attacker.clone(), sword.clone())
        .with_target(TargetStats::new("guard", "Guard", 3));
    let resolved = rules.resolve_attack(&vs_ac3, None, &mut dice).unwrap();
    assert_eq!(resolved.roll.total, 16);
    assert_eq!(resolved.outcome.lowest_armor_defeated, LowestArmorDefeated::Armor(3));
    assert_eq!(resolved.outcome.per_target[0].success, Some(true));

    let vs_ac2 = AttackContext::new(attacker, sword)
        .with_target(TargetStats::new("knight", "Knight", 2));
    let resolved = rules.resolve_attack(&vs_ac2, None, &mut dice).unwrap();
    assert_eq!(resolved.outcome.per_target[0].success, Some(false));
}

#[test]
fn weapon_and_ability_digest() {
    let config = RulesConfig {
        ability_scores: Some(AbilityScoreVariant::Classic),
        ..RulesConfig::default()
    };
    let rules = registry_rules(config);
    let attacker = AttackerStats::new("Fighter", 19).with_ability_scores(AbilityScores {
        strength: 16,
        ..AbilityScores::default()
    });
    let ctx = AttackContext::new(attacker, WeaponStats::melee("Sword", 1));

    let formula = rules.build_attack_formula(&ctx, None);
    assert_eq!(formula.numeric_modifier, 3);
    assert_eq!(formula.labels(), vec!["Sword", "Strength"]);
    assert_eq!(formula.roll_expression(), "1d20+3");
}

struct Undead;

impl SpecialRuleOracle for Undead {
    fn applies(&self, target: &TargetStats, rule_id: &str) -> bool {
        rule_id == "undead" && target.name == "Wight"
    }
}

#[test]
fn full_digest_order_with_every_source() {
    let config = RulesConfig {
        to_hit: ToHitVariant::AscendingAc,
        ability_scores: Some(AbilityScoreVariant::Classic),
        weapon_mastery: Some(MasteryVariant::Becmi),
        ..RulesConfig::default()
    };
    let rules = registry_rules(config);

    let attacker = AttackerStats::new("Paladin", 16)
        .with_ability_scores(AbilityScores {
            strength: 13,
            ..AbilityScores::default()
        })
        .with_effects(EffectModifiers {
            melee_to_hit: 1,
            missile_to_hit: 0,
        });
    let mace = WeaponStats::melee("Mace", 1)
        .with_vs_group(VsGroupModifier::new("undead", 2))
        .with_mastery(MasteryLevel::Expert);
    let wight = TargetStats {
        self_inflicted_to_hit: -1,
        ..TargetStats::new("w", "Wight", 5)
    };
    let ctx = AttackContext::new(attacker, mace)
        .with_target(wight)
        .with_manual_modifier(2);

    let formula = rules.build_attack_formula(&ctx, Some(&Undead));
    assert_eq!(
        formula.labels(),
        vec![
            "Manual",
            "Attack bonus",
            "Mace",
            "Effects",
            "Strength",
            "Wight (target)",
            "vs undead",
            "Mastery (expert)",
        ]
    );
    assert_eq!(formula.numeric_modifier, 2 + 3 + 1 + 1 + 1 - 1 + 2 + 4);

    // Without the oracle the group bonus disappears
    let formula = rules.build_attack_formula(&ctx, None);
    assert!(!formula.labels().contains(&"vs undead"));
}

#[test]
fn table_variants_from_registry() {
    let registry = RuleRegistry::with_defaults();

    let classic = registry.resolve_to_hit(ToHitVariant::Classic).unwrap();
    assert_eq!(classic.resolve_outcome(1, 40, 19), LowestArmorDefeated::GuaranteedMiss);
    assert_eq!(classic.resolve_outcome(20, 0, 19), LowestArmorDefeated::GuaranteedHit);

    let dark = registry.resolve_to_hit(ToHitVariant::DarkDungeons).unwrap();
    assert_eq!(dark.resolve_outcome(10, 10, 10), LowestArmorDefeated::Armor(0));
    assert_eq!(dark.resolve_outcome(10, 9, 10), LowestArmorDefeated::Armor(2));

    let heroic = registry.resolve_to_hit(ToHitVariant::Heroic).unwrap();
    assert_eq!(heroic.resolve_outcome(5, -50, 19), LowestArmorDefeated::NoArmorHit);
}

#[test]
fn encounter_round_trip() {
    let config = RulesConfig {
        initiative: InitiativeVariant::Group,
        initiative_reset: InitiativeResetPolicy::Reset,
        ..RulesConfig::default()
    };
    let mut encounter = CombatEncounter::new(registry_rules(config));
    encounter
        .add_combatant(Combatant::new("hero", "Hero", CombatGroup::Friendly).with_controller("alice"))
        .unwrap();
    encounter
        .add_combatant(Combatant::new("sidekick", "Sidekick", CombatGroup::Friendly))
        .unwrap();
    encounter
        .add_combatant(Combatant::new("ogre", "Ogre", CombatGroup::Hostile))
        .unwrap();

    encounter.start().unwrap();
    assert_eq!(encounter.phase(), EncounterPhase::Active { round: 1 });
    assert!(encounter.declarations_open());

    let alice = Requester::Participant(ParticipantId::from("alice"));
    encounter
        .declare_named(&alice, &CombatantId::from("hero"), "fire")
        .unwrap();

    let mut dice = ScriptedDice::new([3, 5]);
    encounter.roll_initiative(&mut dice).unwrap();
    let order: Vec<&str> = encounter.turn_order().iter().map(|id| id.0.as_str()).collect();
    assert_eq!(order, vec!["ogre", "hero", "sidekick"]);

    // Locked once initiative is in
    assert!(encounter
        .declare(&alice, &CombatantId::from("hero"), Maneuver::Retreat)
        .is_err());

    encounter
        .record_attack(
            &CombatantId::from("ogre"),
            AttackCategory::Melee,
            &[CombatantId::from("hero")],
        )
        .unwrap();

    let mut no_dice = ScriptedDice::default();
    assert_eq!(
        encounter.next_turn(&mut no_dice).unwrap(),
        Some(CombatantId::from("hero"))
    );
    encounter.next_turn(&mut no_dice).unwrap();
    encounter.next_turn(&mut no_dice).unwrap();

    assert_eq!(encounter.round(), 2);
    assert!(encounter
        .combatants()
        .iter()
        .all(|c| c.state.initiative.is_none() && c.state.attacks_made == 0));

    let state = encounter.snapshot();
    assert_eq!(state.initiative_reset_policy, InitiativeResetPolicy::Reset);
    assert_eq!(state.elapsed_seconds, 20);

    encounter.end().unwrap();
    assert!(encounter.advance_round(&mut no_dice).is_err());
}

#[test]
fn shared_handle_serializes_rounds() {
    let rules = RuleSet::new(
        ToHitResolver::for_variant(ToHitVariant::Classic),
        Arc::new(combat_core::rules::IndividualInitiative),
    );
    let shared = SharedEncounter::new(CombatEncounter::new(rules));
    shared
        .with(|e| e.add_combatant(Combatant::new("bandit", "Bandit", CombatGroup::Hostile)))
        .unwrap();
    shared.with(|e| e.start()).unwrap();

    let mut dice = RngDice::from_seed(3);
    shared
        .with(|e| e.advance_round(&mut dice).map(|_| ()))
        .unwrap();
    assert_eq!(shared.snapshot().unwrap().round, 2);
}

#[test]
fn bundled_config_resolves() {
    let rules = registry_rules(default_rules_config());
    assert_eq!(rules.to_hit.variant(), ToHitVariant::Classic);
    assert!(rules.encumbrance.is_some());
    assert!(rules.weapon_mastery.is_none());

    let formula = rules.to_hit.build_attack_formula(
        &AttackContext::new(AttackerStats::new("Thief", 19), WeaponStats::thrown("Dagger", 0)),
        ModifierRules::none(),
    );
    assert_eq!(formula.roll_expression(), "1d20");
}
