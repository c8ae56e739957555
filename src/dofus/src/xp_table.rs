//! Pet experience curve.

use serde::{Deserialize, Serialize};

/// Cumulative experience needed to reach a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpLevel {
    pub level: u32,
    pub xp_total: u64,
}

/// Experience curve, one row per level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpTable {
    levels: Vec<XpLevel>,
}

impl XpTable {
    /// Build a table; rows are ordered by level and a repeated level keeps
    /// its last row
    pub fn new(mut levels: Vec<XpLevel>) -> Self {
        levels.reverse();
        levels.sort_by_key(|l| l.level);
        levels.dedup_by_key(|l| l.level);
        Self { levels }
    }

    pub fn levels(&self) -> &[XpLevel] {
        &self.levels
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Total experience of the highest level, `None` for an empty table
    pub fn ceiling(&self) -> Option<u64> {
        self.levels.last().map(|l| l.xp_total)
    }

    pub fn xp_for_level(&self, level: u32) -> Option<u64> {
        self.levels
            .binary_search_by_key(&level, |l| l.level)
            .ok()
            .map(|i| self.levels[i].xp_total)
    }

    /// Highest level whose total is reached by `xp`
    pub fn level_for_xp(&self, xp: u64) -> Option<u32> {
        self.levels
            .iter()
            .take_while(|l| l.xp_total <= xp)
            .last()
            .map(|l| l.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> XpTable {
        XpTable::new(vec![
            XpLevel { level: 3, xp_total: 300 },
            XpLevel { level: 1, xp_total: 0 },
            XpLevel { level: 2, xp_total: 100 },
        ])
    }

    #[test]
    fn test_ceiling_is_highest_level() {
        assert_eq!(table().ceiling(), Some(300));
        assert_eq!(XpTable::default().ceiling(), None);
    }

    #[test]
    fn test_lookups() {
        let table = table();
        assert_eq!(table.xp_for_level(2), Some(100));
        assert_eq!(table.xp_for_level(9), None);
        assert_eq!(table.level_for_xp(0), Some(1));
        assert_eq!(table.level_for_xp(299), Some(2));
        assert_eq!(table.level_for_xp(10_000), Some(3));
    }

    #[test]
    fn test_duplicate_level_keeps_last() {
        let table = XpTable::new(vec![
            XpLevel { level: 1, xp_total: 0 },
            XpLevel { level: 1, xp_total: 5 },
        ]);
        assert_eq!(table.levels().len(), 1);
        assert_eq!(table.xp_for_level(1), Some(5));
    }
}
