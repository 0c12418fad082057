use once_cell::sync::Lazy;
use rand::distributions::Open01;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WheelError;

// Constants for wheel geometry and animation
pub const FULL_ROTATIONS: u32 = 5;      // Full turns before settling, purely visual
pub const JITTER_FRACTION: f64 = 0.075; // Max jitter as a fraction of one segment
pub const SPIN_DURATION_MS: u32 = 6000;
pub const WHEEL_SPIN_COOLDOWN_SECS: u64 = 82800; // 23 hours

/// One reward bucket on the wheel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RewardTier {
    pub points: u32,
    pub label: String,
    pub emoji: String,
    pub color_pair: (String, String),
}

impl RewardTier {
    pub fn new(points: u32, label: &str, emoji: &str, colors: (&str, &str)) -> Self {
        Self {
            points,
            label: label.to_string(),
            emoji: emoji.to_string(),
            color_pair: (colors.0.to_string(), colors.1.to_string()),
        }
    }
}

static REFERENCE_TIERS: Lazy<TierTable> = Lazy::new(|| TierTable {
    tiers: vec![
        RewardTier::new(100, "100 points", "🚗", ("#fde68a", "#f59e0b")),
        RewardTier::new(200, "200 points", "🚕", ("#a5f3fc", "#06b6d4")),
        RewardTier::new(300, "300 points", "🎟️", ("#ddd6fe", "#8b5cf6")),
        RewardTier::new(400, "400 points", "🎁", ("#fbcfe8", "#ec4899")),
        RewardTier::new(500, "500 points", "🏆", ("#bbf7d0", "#22c55e")),
    ],
});

/// Ordered tiers laid out clockwise from the pointer, one equal segment each.
///
/// Validated once at construction: non-empty, points strictly ascending.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<RewardTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<RewardTier>) -> Result<Self, WheelError> {
        if tiers.is_empty() {
            return Err(WheelError::InvalidTierTable("table has no tiers".to_string()));
        }
        if let Some(pair) = tiers.windows(2).find(|pair| pair[0].points >= pair[1].points) {
            return Err(WheelError::InvalidTierTable(format!(
                "points must be strictly ascending, found {} before {}",
                pair[0].points, pair[1].points
            )));
        }
        Ok(Self { tiers })
    }

    /// The five-tier catalog the backend also draws from.
    pub fn reference() -> &'static TierTable {
        &REFERENCE_TIERS
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn tiers(&self) -> &[RewardTier] {
        &self.tiers
    }

    pub fn get(&self, index: usize) -> Option<&RewardTier> {
        self.tiers.get(index)
    }

    pub fn segment_span(&self) -> f64 {
        360.0 / self.tiers.len() as f64
    }

    /// Clockwise `[start, end)` degrees from the pointer.
    pub fn span_of(&self, index: usize) -> (f64, f64) {
        let seg = self.segment_span();
        (index as f64 * seg, (index + 1) as f64 * seg)
    }

    pub fn center_of(&self, index: usize) -> f64 {
        let seg = self.segment_span();
        index as f64 * seg + seg / 2.0
    }

    // First match wins if a hand-built table ever repeats points.
    pub fn index_of(&self, points: u32) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.points == points)
    }

    pub fn find(&self, points: u32) -> Option<&RewardTier> {
        self.index_of(points).map(|i| &self.tiers[i])
    }

    /// Tier sitting under the pointer once the wheel has turned `rotation`
    /// degrees clockwise from zero.
    pub fn tier_at_pointer(&self, rotation: f64) -> &RewardTier {
        let index = (pointer_offset(rotation) / self.segment_span()).floor() as usize;
        &self.tiers[index.min(self.tiers.len() - 1)]
    }
}

/// Wheel-frame angle (clockwise from the tier-0 edge) that lines up with the
/// pointer after a clockwise rotation of `rotation` degrees.
pub fn pointer_offset(rotation: f64) -> f64 {
    let offset = (-rotation).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if offset >= 360.0 { 0.0 } else { offset }
}

/// Absolute clockwise rotation that lands `reward` under the pointer.
///
/// The result counts from a zero baseline; callers reset the wheel to zero
/// before every spin so targets never grow across spins. The jitter keeps
/// repeated outcomes from looking identical and always stays inside the
/// tier's segment.
pub fn map_outcome_to_angle<R: Rng + ?Sized>(
    reward: u32,
    tiers: &TierTable,
    rng: &mut R,
) -> Result<f64, WheelError> {
    let index = tiers
        .index_of(reward)
        .ok_or(WheelError::NoMatchingTier { reward })?;

    let center = tiers.center_of(index);
    let jitter = sample_jitter(tiers.segment_span(), rng);

    Ok(360.0 * FULL_ROTATIONS as f64 - (center + jitter))
}

// Open interval on both ends so the jitter never touches the bound.
fn sample_jitter<R: Rng + ?Sized>(segment_span: f64, rng: &mut R) -> f64 {
    let bound = JITTER_FRACTION * segment_span;
    let unit: f64 = rng.sample(Open01);
    bound * (2.0 * unit - 1.0)
}

// Format time for cooldown display
pub fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WheelStatusResponse {
    pub cooldown_seconds: i64,
    #[serde(default)]
    pub requires_membership: bool,
    /// Full cooldown the server applies after a spin.
    #[serde(default)]
    pub window_seconds: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelSpinRequest {
    pub timestamp: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WheelSpinResponse {
    pub success: bool,
    pub reward_points: Option<u32>,
    pub cooldown_seconds: i64,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn jitter_bound(tiers: &TierTable) -> f64 {
        JITTER_FRACTION * tiers.segment_span()
    }

    #[test]
    fn test_reference_table_layout() {
        let tiers = TierTable::reference();
        assert_eq!(tiers.len(), 5);
        assert_eq!(tiers.segment_span(), 72.0);
        assert_eq!(tiers.center_of(2), 180.0);
        assert_eq!(tiers.span_of(4), (288.0, 360.0));
        assert_eq!(tiers.index_of(300), Some(2));
    }

    #[test]
    fn test_every_reward_lands_inside_its_tier() {
        let tiers = TierTable::reference();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            for (index, tier) in tiers.tiers().iter().enumerate() {
                let angle = map_outcome_to_angle(tier.points, tiers, &mut rng).unwrap();
                let (start, end) = tiers.span_of(index);
                let landing = pointer_offset(angle);
                assert!(landing > start && landing < end, "{} outside [{}, {})", landing, start, end);
                assert!((landing - tiers.center_of(index)).abs() < jitter_bound(tiers));
                assert_eq!(tiers.tier_at_pointer(angle).points, tier.points);
            }
        }
    }

    #[test]
    fn test_reward_300_targets_180_degrees() {
        let tiers = TierTable::reference();
        let mut rng = StdRng::seed_from_u64(42);

        let angle = map_outcome_to_angle(300, tiers, &mut rng).unwrap();
        assert!(angle > 0.0);
        assert!((angle.rem_euclid(360.0) - 180.0).abs() < 5.4);
        assert!((angle - (1800.0 - 180.0)).abs() < 5.4);
    }

    #[test]
    fn test_midpoint_generator_gives_exact_center() {
        // 1 << 63 samples to the middle of the open unit interval
        let tiers = TierTable::reference();
        let mut rng = StepRng::new(1 << 63, 0);

        let angle = map_outcome_to_angle(300, tiers, &mut rng).unwrap();
        assert!((angle - 1620.0).abs() < 1e-9);

        let angle = map_outcome_to_angle(100, tiers, &mut rng).unwrap();
        assert!((angle - 1764.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_generator_values_stay_inside_bound() {
        let tiers = TierTable::reference();
        for raw in [0u64, u64::MAX] {
            let mut rng = StepRng::new(raw, 0);
            let angle = map_outcome_to_angle(500, tiers, &mut rng).unwrap();
            let landing = pointer_offset(angle);
            assert!((landing - 324.0).abs() <= jitter_bound(tiers) + 1e-9);
            assert_eq!(tiers.tier_at_pointer(angle).points, 500);
        }
    }

    #[test]
    fn test_unknown_reward_is_rejected() {
        let tiers = TierTable::reference();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            map_outcome_to_angle(999, tiers, &mut rng),
            Err(WheelError::NoMatchingTier { reward: 999 })
        );
    }

    #[test]
    fn test_same_reward_twice_differs_but_same_tier() {
        let tiers = TierTable::reference();
        let mut rng = StdRng::seed_from_u64(2024);

        let first = map_outcome_to_angle(200, tiers, &mut rng).unwrap();
        let second = map_outcome_to_angle(200, tiers, &mut rng).unwrap();
        assert_ne!(first, second);
        assert_eq!(tiers.tier_at_pointer(first).points, 200);
        assert_eq!(tiers.tier_at_pointer(second).points, 200);
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let tiers = TierTable::reference();
        let a = map_outcome_to_angle(400, tiers, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = map_outcome_to_angle(400, tiers, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_table_validation() {
        assert!(matches!(TierTable::new(vec![]), Err(WheelError::InvalidTierTable(_))));

        let descending = vec![
            RewardTier::new(200, "200", "a", ("#000", "#fff")),
            RewardTier::new(100, "100", "b", ("#000", "#fff")),
        ];
        assert!(matches!(TierTable::new(descending), Err(WheelError::InvalidTierTable(_))));

        let duplicate = vec![
            RewardTier::new(100, "100", "a", ("#000", "#fff")),
            RewardTier::new(100, "100", "b", ("#000", "#fff")),
        ];
        assert!(TierTable::new(duplicate).is_err());

        let single = TierTable::new(vec![RewardTier::new(50, "50", "a", ("#000", "#fff"))]).unwrap();
        assert_eq!(single.segment_span(), 360.0);
        assert_eq!(single.tier_at_pointer(1234.5).points, 50);
    }

    #[test]
    fn test_pointer_offset_wraps() {
        assert_eq!(pointer_offset(0.0), 0.0);
        assert_eq!(pointer_offset(90.0), 270.0);
        assert_eq!(pointer_offset(1620.0), 180.0);
        assert_eq!(pointer_offset(1e-20), 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(3723), "1h 2m 3s");
        assert_eq!(format_time(125), "2m 5s");
        assert_eq!(format_time(9), "9s");
        assert_eq!(format_time(-4), "0s");
    }

    #[test]
    fn test_status_response_defaults_membership() {
        let status: WheelStatusResponse = serde_json::from_str(r#"{"cooldown_seconds": 12}"#).unwrap();
        assert_eq!(status.cooldown_seconds, 12);
        assert!(!status.requires_membership);
        assert_eq!(status.window_seconds, None);
    }
}
