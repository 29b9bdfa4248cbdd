//! Initiative rolling and turn ordering

use super::AbilityScoreRules;
use crate::dice::{DiceError, DiceRoller};
use crate::encounter::Combatant;
use crate::types::{CombatGroup, CombatantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Initiative die
pub const INITIATIVE_DICE: &str = "1d6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeVariant {
    Individual,
    Group,
}

impl fmt::Display for InitiativeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitiativeVariant::Individual => f.write_str("individual"),
            InitiativeVariant::Group => f.write_str("group"),
        }
    }
}

/// What happens to initiative values when a new round starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeResetPolicy {
    /// Keep every value and the current ordering
    #[default]
    Hold,
    /// Clear every value; rolls are needed before the next ordering
    Reset,
    /// Roll new values for everyone immediately
    Reroll,
}

impl fmt::Display for InitiativeResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitiativeResetPolicy::Hold => f.write_str("hold"),
            InitiativeResetPolicy::Reset => f.write_str("reset"),
            InitiativeResetPolicy::Reroll => f.write_str("reroll"),
        }
    }
}

pub trait InitiativeRules: fmt::Debug + Send + Sync {
    fn variant(&self) -> InitiativeVariant;

    /// Roll for every combatant still awaiting initiative
    ///
    /// Combatants that already have a value are left alone. `abilities` is
    /// the active ability score strategy, if any.
    fn roll(
        &self,
        combatants: &mut [Combatant],
        abilities: Option<&dyn AbilityScoreRules>,
        dice: &mut dyn DiceRoller,
    ) -> Result<(), DiceError>;

    /// Turn order: highest initiative first, awaiting combatants last,
    /// ties kept in join order
    fn order(&self, combatants: &[Combatant]) -> Vec<CombatantId> {
        let mut ranked: Vec<&Combatant> = combatants.iter().collect();
        ranked.sort_by_key(|c| std::cmp::Reverse(c.state.initiative));
        ranked.into_iter().map(|c| c.id.clone()).collect()
    }
}

/// 1d6 plus the combatant's own modifier and dexterity adjustment, rolled
/// per combatant
#[derive(Debug, Clone, Copy, Default)]
pub struct IndividualInitiative;

impl InitiativeRules for IndividualInitiative {
    fn variant(&self) -> InitiativeVariant {
        InitiativeVariant::Individual
    }

    fn roll(
        &self,
        combatants: &mut [Combatant],
        abilities: Option<&dyn AbilityScoreRules>,
        dice: &mut dyn DiceRoller,
    ) -> Result<(), DiceError> {
        for combatant in combatants.iter_mut().filter(|c| c.state.initiative.is_none()) {
            let roll = dice.evaluate(INITIATIVE_DICE)?;
            let value = roll.total + combatant.initiative_bonus(abilities);
            debug!(combatant = %combatant.id, value, "initiative rolled");
            combatant.state.initiative = Some(value);
        }
        Ok(())
    }
}

/// One 1d6 per side, shared by every member; individual modifiers do not apply
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupInitiative;

impl InitiativeRules for GroupInitiative {
    fn variant(&self) -> InitiativeVariant {
        InitiativeVariant::Group
    }

    fn roll(
        &self,
        combatants: &mut [Combatant],
        _abilities: Option<&dyn AbilityScoreRules>,
        dice: &mut dyn DiceRoller,
    ) -> Result<(), DiceError> {
        // Late joiners inherit the value their side already has
        let mut by_group: HashMap<CombatGroup, i32> = combatants
            .iter()
            .filter_map(|c| c.state.initiative.map(|v| (c.state.group, v)))
            .collect();

        for combatant in combatants.iter_mut().filter(|c| c.state.initiative.is_none()) {
            let group = combatant.state.group;
            let value = match by_group.get(&group) {
                Some(value) => *value,
                None => {
                    let value = dice.evaluate(INITIATIVE_DICE)?.total;
                    debug!(?group, value, "group initiative rolled");
                    by_group.insert(group, value);
                    value
                }
            };
            combatant.state.initiative = Some(value);
        }
        Ok(())
    }

    /// Sides act together; within a tie, the side that joined first goes first
    fn order(&self, combatants: &[Combatant]) -> Vec<CombatantId> {
        let mut first_seen: HashMap<CombatGroup, usize> = HashMap::new();
        for (index, c) in combatants.iter().enumerate() {
            first_seen.entry(c.state.group).or_insert(index);
        }

        let mut ranked: Vec<&Combatant> = combatants.iter().collect();
        ranked.sort_by_key(|c| {
            (
                std::cmp::Reverse(c.state.initiative),
                first_seen.get(&c.state.group).copied().unwrap_or(usize::MAX),
            )
        });
        ranked.into_iter().map(|c| c.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::rules::ClassicAbilityScores;
    use crate::stats::AbilityScores;

    fn party() -> Vec<Combatant> {
        vec![
            Combatant::new("a", "Aldric", CombatGroup::Friendly),
            Combatant::new("g1", "Goblin", CombatGroup::Hostile),
            Combatant::new("b", "Bera", CombatGroup::Friendly).with_initiative_modifier(1),
            Combatant::new("g2", "Goblin", CombatGroup::Hostile),
        ]
    }

    fn ids(order: Vec<CombatantId>) -> Vec<String> {
        order.into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn test_individual_rolls_each() {
        let mut combatants = party();
        let mut dice = ScriptedDice::new([3, 5, 3, 1]);
        IndividualInitiative.roll(&mut combatants, None, &mut dice).unwrap();

        let values: Vec<Option<i32>> = combatants.iter().map(|c| c.state.initiative).collect();
        assert_eq!(values, vec![Some(3), Some(5), Some(4), Some(1)]);
        assert_eq!(ids(IndividualInitiative.order(&combatants)), vec!["g1", "b", "a", "g2"]);
    }

    #[test]
    fn test_order_is_stable_for_ties() {
        let mut combatants = party();
        let mut dice = ScriptedDice::new([4, 4, 3, 4]);
        IndividualInitiative.roll(&mut combatants, None, &mut dice).unwrap();

        let first = IndividualInitiative.order(&combatants);
        let second = IndividualInitiative.order(&combatants);
        assert_eq!(first, second);
        assert_eq!(ids(first), vec!["a", "g1", "b", "g2"]);
    }

    #[test]
    fn test_awaiting_sorts_last() {
        let mut combatants = party();
        combatants[3].state.initiative = Some(2);
        assert_eq!(ids(IndividualInitiative.order(&combatants))[0], "g2");
    }

    #[test]
    fn test_roll_skips_assigned() {
        let mut combatants = party();
        combatants[0].state.initiative = Some(6);
        let mut dice = ScriptedDice::new([1, 1, 1]);
        IndividualInitiative.roll(&mut combatants, None, &mut dice).unwrap();
        assert_eq!(combatants[0].state.initiative, Some(6));
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_group_shares_one_roll_per_side() {
        let mut combatants = party();
        let mut dice = ScriptedDice::new([2, 5]);
        GroupInitiative.roll(&mut combatants, None, &mut dice).unwrap();

        let values: Vec<Option<i32>> = combatants.iter().map(|c| c.state.initiative).collect();
        assert_eq!(values, vec![Some(2), Some(5), Some(2), Some(5)]);
        assert_eq!(ids(GroupInitiative.order(&combatants)), vec!["g1", "g2", "a", "b"]);
    }

    #[test]
    fn test_group_late_joiner_inherits() {
        let mut combatants = party();
        let mut dice = ScriptedDice::new([4, 4]);
        GroupInitiative.roll(&mut combatants, None, &mut dice).unwrap();

        combatants.push(Combatant::new("c", "Cato", CombatGroup::Friendly));
        GroupInitiative.roll(&mut combatants, None, &mut dice).unwrap();
        assert_eq!(combatants[4].state.initiative, Some(4));
        // Tied sides: friendly joined first
        assert_eq!(ids(GroupInitiative.order(&combatants)), vec!["a", "b", "c", "g1", "g2"]);
    }

    #[test]
    fn test_individual_adds_dexterity() {
        let mut combatants = vec![
            Combatant::new("d", "Dara", CombatGroup::Friendly).with_ability_scores(AbilityScores {
                dexterity: 16,
                ..AbilityScores::default()
            }),
            Combatant::new("g", "Goblin", CombatGroup::Hostile),
        ];
        let mut dice = ScriptedDice::new([3, 3]);
        IndividualInitiative
            .roll(&mut combatants, Some(&ClassicAbilityScores), &mut dice)
            .unwrap();
        assert_eq!(combatants[0].state.initiative, Some(4));
        assert_eq!(combatants[1].state.initiative, Some(3));
    }

    #[test]
    fn test_group_ignores_dexterity() {
        let mut combatants = vec![Combatant::new("d", "Dara", CombatGroup::Friendly)
            .with_ability_scores(AbilityScores {
                dexterity: 18,
                ..AbilityScores::default()
            })];
        let mut dice = ScriptedDice::new([2]);
        GroupInitiative
            .roll(&mut combatants, Some(&ClassicAbilityScores), &mut dice)
            .unwrap();
        assert_eq!(combatants[0].state.initiative, Some(2));
    }

    #[test]
    fn test_dice_error_propagates() {
        let mut combatants = party();
        let mut dice = ScriptedDice::new([3]);
        assert!(IndividualInitiative.roll(&mut combatants, None, &mut dice).is_err());
    }
}
