//! Opponent-group ("vs") modifiers

use super::{ModifierBreakdown, ModifierSource};
use crate::stats::{TargetStats, VsGroupModifier};

/// Host-provided predicate for special rules, e.g. "counts as undead"
pub trait SpecialRuleOracle: Send + Sync {
    fn applies(&self, target: &TargetStats, rule_id: &str) -> bool;
}

/// Oracle that never matches
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpecialRules;

impl SpecialRuleOracle for NoSpecialRules {
    fn applies(&self, _target: &TargetStats, _rule_id: &str) -> bool {
        false
    }
}

/// Append every matching group modifier to `breakdown`, in configured order
///
/// A target matches when it declares membership of the group, or when the
/// oracle says the group's rule applies to it.
pub fn apply_group_modifiers(
    modifiers: &[VsGroupModifier],
    target: &TargetStats,
    oracle: Option<&dyn SpecialRuleOracle>,
    breakdown: &mut ModifierBreakdown,
) {
    for modifier in modifiers {
        let member = target.is_member_of(&modifier.group);
        let special = !member && oracle.is_some_and(|o| o.applies(target, modifier.rule_id()));

        if member || special {
            breakdown.push(
                ModifierSource::OpponentGroup,
                modifier.amount,
                format!("vs {}", modifier.group),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UndeadOracle;

    impl SpecialRuleOracle for UndeadOracle {
        fn applies(&self, target: &TargetStats, rule_id: &str) -> bool {
            rule_id == "undead" && target.name.contains("Skeleton")
        }
    }

    #[test]
    fn test_member_matches() {
        let target = TargetStats::new("g1", "Hill Giant", 4).with_group("giants");
        let mods = vec![
            VsGroupModifier::new("giants", 2),
            VsGroupModifier::new("undead", 3),
        ];
        let mut b = ModifierBreakdown::new();
        apply_group_modifiers(&mods, &target, None, &mut b);
        assert_eq!(b.amount, 2);
        assert_eq!(b.labels(), vec!["vs giants"]);
    }

    #[test]
    fn test_oracle_matches_non_member() {
        let target = TargetStats::new("s1", "Skeleton Archer", 7);
        let mods = vec![VsGroupModifier::new("undead", 1)];

        let mut without = ModifierBreakdown::new();
        apply_group_modifiers(&mods, &target, Some(&NoSpecialRules), &mut without);
        assert_eq!(without.amount, 0);

        let mut with = ModifierBreakdown::new();
        apply_group_modifiers(&mods, &target, Some(&UndeadOracle), &mut with);
        assert_eq!(with.amount, 1);
        assert_eq!(with.sources(), vec![ModifierSource::OpponentGroup]);
    }

    #[test]
    fn test_member_and_oracle_apply_once() {
        let target = TargetStats::new("s2", "Skeleton", 7).with_group("undead");
        let mods = vec![VsGroupModifier::new("undead", 1)];
        let mut b = ModifierBreakdown::new();
        apply_group_modifiers(&mods, &target, Some(&UndeadOracle), &mut b);
        assert_eq!(b.amount, 1);
        assert_eq!(b.digest.len(), 1);
    }
}
