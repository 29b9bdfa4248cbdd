//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{AttackCategory, ClassAffiliation, CombatGroup, CombatantId, ParticipantId, Requester};
pub use crate::stats::{AbilityScores, AmmoStats, ArmorClass, AttackerStats, EffectModifiers, TargetStats, VsGroupModifier, WeaponStats};

// Attacks
pub use crate::attack::{AttackContext, AttackFormula, AttackOutcome, LowestArmorDefeated, ResolvedAttack};
pub use crate::to_hit::{ToHitResolver, ToHitVariant};
pub use crate::modifier::{ModifierRules, SpecialRuleOracle};

// Rules
pub use crate::rules::{InitiativeResetPolicy, MasteryLevel, RuleRegistry, RuleSet, RuleVariantId};

// Encounters
pub use crate::encounter::{CombatEncounter, Combatant, EncounterError, Maneuver, SharedEncounter};

// Dice
pub use crate::dice::{DiceRoller, RngDice, ScriptedDice};

// Config
pub use crate::config::{default_rules_config, RulesConfig};
