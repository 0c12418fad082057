use rand::Rng;
use shared::reward_wheel::TierTable;

/// Chance of each reward, in percent. Drawn by rolling `[0, 100)` and walking
/// the cumulative weights in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardOdds {
    entries: Vec<(u32, f64)>,
}

impl RewardOdds {
    pub fn new(entries: Vec<(u32, f64)>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("reward odds are empty".to_string());
        }
        if let Some((points, weight)) = entries.iter().find(|(_, weight)| *weight <= 0.0) {
            return Err(format!("reward {} has non-positive weight {}", points, weight));
        }
        let total: f64 = entries.iter().map(|(_, weight)| weight).sum();
        if (total - 100.0).abs() > 1e-6 {
            return Err(format!("reward weights sum to {}, expected 100", total));
        }
        Ok(Self { entries })
    }

    /// 35 / 25 / 20 / 12 / 8 percent over the reference tiers.
    pub fn reference() -> Self {
        Self {
            entries: vec![(100, 35.0), (200, 25.0), (300, 20.0), (400, 12.0), (500, 8.0)],
        }
    }

    pub fn rewards(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(points, _)| *points)
    }

    /// Rewards the client wheel would not be able to show.
    pub fn missing_from(&self, tiers: &TierTable) -> Vec<u32> {
        self.rewards()
            .filter(|points| tiers.index_of(*points).is_none())
            .collect()
    }

    pub fn pick(&self, result_number: f64) -> u32 {
        let mut threshold = 0.0;
        for (points, weight) in &self.entries {
            threshold += weight;
            if result_number < threshold {
                return *points;
            }
        }
        // Rounding in the running sum can leave the top edge uncovered.
        self.entries[self.entries.len() - 1].0
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> (u32, f64) {
        let result_number = rng.gen_range(0.0..100.0);
        (self.pick(result_number), result_number)
    }
}
