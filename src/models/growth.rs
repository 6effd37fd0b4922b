//! Growth stages of a topic's tree, unlocked by cumulative earned currency.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Seed,
    Sprout,
    Sapling,
    YoungTree,
    Blooming,
    Mature,
}

/// Stages in ascending order with the minimum currency each one needs.
const STAGE_TABLE: [(GrowthStage, u64); 6] = [
    (GrowthStage::Seed, 0),
    (GrowthStage::Sprout, 1),
    (GrowthStage::Sapling, 25),
    (GrowthStage::YoungTree, 75),
    (GrowthStage::Blooming, 150),
    (GrowthStage::Mature, 300),
];

impl GrowthStage {
    pub const COUNT: usize = STAGE_TABLE.len();

    /// Ordinal position, 0 for `Seed`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn min_currency(self) -> u64 {
        STAGE_TABLE[self.index()].1
    }

    pub fn next(self) -> Option<GrowthStage> {
        STAGE_TABLE.get(self.index() + 1).map(|&(stage, _)| stage)
    }

    /// How far `currency` has moved from this stage's threshold towards the
    /// next one, in 0.0..=1.0. Always 1.0 once mature.
    pub fn progress_to_next(self, currency: u64) -> f64 {
        let Some(next) = self.next() else {
            return 1.0;
        };
        let floor = self.min_currency();
        let span = next.min_currency() - floor;
        (currency.saturating_sub(floor) as f64 / span as f64).clamp(0.0, 1.0)
    }
}

/// Highest stage whose threshold `cumulative_currency` has reached.
pub fn growth_stage(cumulative_currency: u64) -> GrowthStage {
    STAGE_TABLE
        .iter()
        .rev()
        .find(|(_, min)| cumulative_currency >= *min)
        .map_or(GrowthStage::Seed, |&(stage, _)| stage)
}
