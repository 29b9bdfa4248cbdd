//! Required-roll tables for the table-driven to-hit variants
//!
//! A table maps each armor class to the total needed to hit it. Lookup picks
//! the lowest (best-armored) AC whose requirement the roll total meets.

use serde::{Deserialize, Serialize};

/// One entry of a generated table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub armor_class: i32,
    pub required: i32,
}

/// Lowest armor class satisfied by `roll_total`, if any
pub fn lowest_satisfied(entries: &[TableEntry], roll_total: i32) -> Option<i32> {
    entries
        .iter()
        .filter(|e| e.required <= roll_total)
        .map(|e| e.armor_class)
        .min()
}

/// Clamped linear table: `required = clamp(thac0 - ac, min_roll, max_roll)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedTable {
    pub lowest_ac: i32,
    pub highest_ac: i32,
    pub min_roll: i32,
    pub max_roll: i32,
}

impl BoundedTable {
    /// AC -19 to 19, every requirement between 2 and 20
    pub fn classic() -> Self {
        BoundedTable {
            lowest_ac: -19,
            highest_ac: 19,
            min_roll: 2,
            max_roll: 20,
        }
    }

    pub fn build(&self, thac0: i32) -> Vec<TableEntry> {
        (self.lowest_ac..=self.highest_ac)
            .map(|ac| TableEntry {
                armor_class: ac,
                required: (thac0 - ac).clamp(self.min_roll, self.max_roll),
            })
            .collect()
    }
}

/// Which required values hold for several AC steps before moving on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plateau {
    /// Every value repeats
    Every(u32),
    /// Only the listed trigger values repeat; all others step immediately
    AtTriggers { length: u32, triggers: Vec<i32> },
}

impl Plateau {
    fn length_at(&self, required: i32) -> u32 {
        match self {
            Plateau::Every(length) => *length,
            Plateau::AtTriggers { length, triggers } => {
                if triggers.contains(&required) {
                    *length
                } else {
                    1
                }
            }
        }
    }
}

/// One half of a plateau table, walked outward from AC 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHalf {
    /// First AC of the half (0 or -1)
    pub first_ac: i32,
    /// Last AC of the half, inclusive
    pub last_ac: i32,
    /// Added to THAC0 to get the first required value
    pub seed_offset: i32,
    pub plateau: Plateau,
}

impl TableHalf {
    /// Walk the half, holding each value for its plateau length
    pub fn walk(&self, thac0: i32) -> Vec<TableEntry> {
        let ac_step = if self.last_ac >= self.first_ac { 1 } else { -1 };
        // Required rolls fall as AC rises
        let roll_step = -ac_step;

        let mut entries = Vec::new();
        let mut required = thac0 + self.seed_offset;
        let mut repeat = 0;
        let mut ac = self.first_ac;

        loop {
            entries.push(TableEntry {
                armor_class: ac,
                required,
            });

            repeat += 1;
            if repeat >= self.plateau.length_at(required) {
                repeat = 0;
                required += roll_step;
            }

            if ac == self.last_ac {
                break;
            }
            ac += ac_step;
        }

        entries
    }
}

/// Stepped table built from an ascending and a descending half
///
/// The halves carry their own seed and plateau rules; they are deliberately
/// not mirror images of each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateauTable {
    pub ascending: TableHalf,
    pub descending: TableHalf,
    /// Natural 1 misses and natural 20 hits
    pub natural_override: bool,
}

impl PlateauTable {
    /// Open-ended table: two-step plateau everywhere, AC -99 to 20
    pub fn dark_dungeons() -> Self {
        PlateauTable {
            ascending: TableHalf {
                first_ac: 0,
                last_ac: 20,
                seed_offset: 0,
                plateau: Plateau::Every(2),
            },
            descending: TableHalf {
                first_ac: -1,
                last_ac: -99,
                seed_offset: 1,
                plateau: Plateau::Every(2),
            },
            natural_override: true,
        }
    }

    /// Tiered table: five-step plateaus at trigger values only
    pub fn heroic() -> Self {
        PlateauTable {
            ascending: TableHalf {
                first_ac: 0,
                last_ac: 20,
                seed_offset: 0,
                plateau: Plateau::AtTriggers {
                    length: 5,
                    triggers: vec![30, 2, -10, -20, -30, -40],
                },
            },
            descending: TableHalf {
                first_ac: -1,
                last_ac: -99,
                seed_offset: 1,
                plateau: Plateau::AtTriggers {
                    length: 5,
                    triggers: vec![2, 20, 30, 40, 50, 60, 70, 80, 90, 100],
                },
            },
            natural_override: false,
        }
    }

    pub fn build(&self, thac0: i32) -> Vec<TableEntry> {
        let mut entries = self.descending.walk(thac0);
        entries.reverse();
        entries.extend(self.ascending.walk(thac0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn required_for(entries: &[TableEntry], ac: i32) -> i32 {
        entries
            .iter()
            .find(|e| e.armor_class == ac)
            .map(|e| e.required)
            .unwrap()
    }

    #[test]
    fn test_classic_clamps() {
        let table = BoundedTable::classic().build(19);
        assert_eq!(table.len(), 39);
        assert_eq!(required_for(&table, 0), 19);
        assert_eq!(required_for(&table, -5), 20);
        assert_eq!(required_for(&table, 18), 2);
        assert_eq!(required_for(&table, 9), 10);
    }

    #[test]
    fn test_dark_dungeons_plateau_of_two() {
        let table = PlateauTable::dark_dungeons().build(10);
        let ascending: Vec<i32> = (0..=4).map(|ac| required_for(&table, ac)).collect();
        assert_eq!(ascending, vec![10, 10, 9, 9, 8]);

        let descending: Vec<i32> = (1..=4).map(|n| required_for(&table, -n)).collect();
        assert_eq!(descending, vec![11, 11, 12, 12]);
    }

    #[test]
    fn test_dark_dungeons_extent() {
        let table = PlateauTable::dark_dungeons().build(19);
        assert_eq!(table.len(), 120);
        assert_eq!(table.first().map(|e| e.armor_class), Some(-99));
        assert_eq!(table.last().map(|e| e.armor_class), Some(20));
    }

    #[test]
    fn test_heroic_trigger_holds_five_steps() {
        let table = PlateauTable::heroic().build(2);
        let run: Vec<i32> = (0..=6).map(|ac| required_for(&table, ac)).collect();
        assert_eq!(run, vec![2, 2, 2, 2, 2, 1, 0]);
    }

    #[test]
    fn test_heroic_steps_immediately_off_trigger() {
        let table = PlateauTable::heroic().build(15);
        let run: Vec<i32> = (0..=3).map(|ac| required_for(&table, ac)).collect();
        assert_eq!(run, vec![15, 14, 13, 12]);
    }

    #[test]
    fn test_heroic_halves_are_asymmetric() {
        // 20 only holds on the descending half
        let table = PlateauTable::heroic().build(19);
        let descending: Vec<i32> = (1..=7).map(|n| required_for(&table, -n)).collect();
        assert_eq!(descending, vec![20, 20, 20, 20, 20, 21, 22]);

        let table = PlateauTable::heroic().build(20);
        let ascending: Vec<i32> = (0..=2).map(|ac| required_for(&table, ac)).collect();
        assert_eq!(ascending, vec![20, 19, 18]);
    }

    #[test]
    fn test_lowest_satisfied_none() {
        let table = BoundedTable::classic().build(19);
        assert_eq!(lowest_satisfied(&table, 1), None);
        assert_eq!(lowest_satisfied(&table, 16), Some(3));
    }

    proptest! {
        #[test]
        fn required_never_rises_with_armor_class(thac0 in -10i32..40) {
            for table in [PlateauTable::dark_dungeons(), PlateauTable::heroic()] {
                let entries = table.build(thac0);
                for pair in entries.windows(2) {
                    prop_assert_eq!(pair[1].armor_class, pair[0].armor_class + 1);
                    prop_assert!(pair[1].required <= pair[0].required);
                }
            }
        }
    }
}
