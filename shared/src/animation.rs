use crate::reward_wheel::SPIN_DURATION_MS;

/// Quartic ease-out: fast start, long settle.
pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub rotation: f64,
    pub progress: f64,
    pub finished: bool,
}

/// Timed interpolation from a zero baseline to an absolute target rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    started_at_ms: f64,
    duration_ms: f64,
    target: f64,
}

impl SpinAnimation {
    pub fn new(started_at_ms: f64, target: f64) -> Self {
        Self::with_duration(started_at_ms, SPIN_DURATION_MS as f64, target)
    }

    pub fn with_duration(started_at_ms: f64, duration_ms: f64, target: f64) -> Self {
        Self {
            started_at_ms,
            duration_ms: duration_ms.max(0.0),
            target,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn sample(&self, now_ms: f64) -> AnimationFrame {
        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        if self.duration_ms == 0.0 || elapsed >= self.duration_ms {
            return AnimationFrame {
                rotation: self.target,
                progress: 1.0,
                finished: true,
            };
        }

        let progress = elapsed / self.duration_ms;
        AnimationFrame {
            rotation: self.target * ease_out_quart(progress),
            progress,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(ease_out_quart(2.0), 1.0);
        assert!(ease_out_quart(0.5) > 0.5);
    }

    #[test]
    fn test_animation_runs_from_zero_to_target() {
        let anim = SpinAnimation::with_duration(1_000.0, 6_000.0, 1620.0);

        let start = anim.sample(1_000.0);
        assert_eq!(start.rotation, 0.0);
        assert!(!start.finished);

        let mid = anim.sample(4_000.0);
        assert!(mid.rotation > 0.0 && mid.rotation < 1620.0);
        assert_eq!(mid.progress, 0.5);

        let end = anim.sample(7_000.0);
        assert!(end.finished);
        assert_eq!(end.rotation, 1620.0);
    }

    #[test]
    fn test_rotation_never_decreases() {
        let anim = SpinAnimation::new(0.0, 1764.0);
        let mut last = 0.0;
        for step in 0..=70 {
            let frame = anim.sample(step as f64 * 100.0);
            assert!(frame.rotation >= last);
            last = frame.rotation;
        }
        assert_eq!(last, 1764.0);
    }

    #[test]
    fn test_clock_before_start_clamps() {
        let anim = SpinAnimation::with_duration(500.0, 1_000.0, 900.0);
        let frame = anim.sample(100.0);
        assert_eq!(frame.rotation, 0.0);
        assert_eq!(frame.progress, 0.0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let anim = SpinAnimation::with_duration(0.0, 0.0, 42.0);
        assert!(anim.sample(0.0).finished);
    }
}
