//! Easing curves for the assembly animation

/// Easing function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Hermite smoothstep, zero slope at both ends. Drives vertex displacement.
    SmoothStep,
    /// Quadratic deceleration. Drives the apex marker.
    EaseOut,
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 2] = [Easing::SmoothStep, Easing::EaseOut];

    #[test]
    fn test_ease_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(ease(0.0, easing), 0.0, "{:?} should start at 0", easing);
            assert_eq!(ease(1.0, easing), 1.0, "{:?} should end at 1", easing);
        }
    }

    #[test]
    fn test_ease_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=1000 {
                let v = ease(i as f32 / 1000.0, easing);
                assert!(v >= prev, "{:?} should be monotonic", easing);
                prev = v;
            }
        }
    }

    #[test]
    fn test_smoothstep_flat_at_both_ends() {
        let h = 1e-3;
        let start_slope = ease(h, Easing::SmoothStep) / h;
        let end_slope = (1.0 - ease(1.0 - h, Easing::SmoothStep)) / h;
        assert!(start_slope < 0.01);
        assert!(end_slope < 0.01);
    }

    #[test]
    fn test_curves_are_distinct() {
        // Ease-out leads smoothstep early on
        assert!(ease(0.25, Easing::EaseOut) > ease(0.25, Easing::SmoothStep));
        assert!((ease(0.5, Easing::EaseOut) - 0.75).abs() < 1e-6);
        assert!((ease(0.5, Easing::SmoothStep) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-0.5, Easing::SmoothStep), 0.0);
        assert_eq!(ease(1.5, Easing::EaseOut), 1.0);
    }
}
