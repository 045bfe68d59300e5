//! Explosion-to-assembly intro animation
//!
//! One shared progress scalar drives every instance. The renderer evaluates
//! the per-vertex displacement from that scalar, so the host only advances a
//! single number each frame (plus the apex marker, which is one object).

use super::easing::{ease, Easing};
use crate::math::Vec3;

/// Shared animation record read by the renderer every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyState {
    /// Overall progress (0.0 = fully dispersed, 1.0 = assembled)
    pub progress: f32,
    /// Progress added on the next frame; grows by `acceleration` every frame
    pub step_size: f32,
    pub acceleration: f32,
}

/// Phase of the intro animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPhase {
    Dispersing,
    Settled,
}

/// Result of advancing the animator by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStep {
    /// Still converging
    Advanced,
    /// Reached 1.0 on this frame; reported exactly once per session
    JustSettled,
    /// Already settled, nothing changed
    Idle,
}

/// The star on top of the tree: flies in from a random origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApexMarker {
    pub final_position: Vec3,
    /// Offset from the final position the marker starts at
    pub random_origin: Vec3,
    /// Live position
    pub position: Vec3,
}

impl ApexMarker {
    pub fn new(final_position: Vec3, random_origin: Vec3) -> Self {
        Self {
            final_position,
            random_origin,
            position: final_position + random_origin,
        }
    }

    pub fn start_position(&self) -> Vec3 {
        self.final_position + self.random_origin
    }

    /// Interpolate toward the final position by an already-eased amount
    fn follow(&mut self, eased: f32) {
        self.position = self.start_position().lerp(&self.final_position, eased);
    }

    fn snap(&mut self) {
        self.position = self.final_position;
    }
}

/// Owns the shared progress value and advances it once per frame
#[derive(Debug, Clone)]
pub struct AssemblyAnimator {
    state: AssemblyState,
    phase: AssemblyPhase,
    /// Distance (in instance-local units) a fully dispersed vertex is pushed
    displacement_scale: f32,
    frames: u32,
}

impl AssemblyAnimator {
    pub fn new(initial_step: f32, acceleration: f32, displacement_scale: f32) -> Self {
        Self {
            state: AssemblyState {
                progress: 0.0,
                step_size: initial_step.max(0.0),
                acceleration,
            },
            phase: AssemblyPhase::Dispersing,
            displacement_scale,
            frames: 0,
        }
    }

    /// Animator that starts already assembled
    pub fn settled(displacement_scale: f32) -> Self {
        Self {
            state: AssemblyState {
                progress: 1.0,
                step_size: 0.0,
                acceleration: 0.0,
            },
            phase: AssemblyPhase::Settled,
            displacement_scale,
            frames: 0,
        }
    }

    /// Advance one frame. The apex marker follows the ease-out curve while
    /// dispersing and snaps exactly onto its final position on settling.
    pub fn step(&mut self, apex: &mut ApexMarker) -> AssemblyStep {
        if self.phase == AssemblyPhase::Settled {
            return AssemblyStep::Idle;
        }

        self.frames += 1;
        self.state.step_size += self.state.acceleration;
        self.state.progress = (self.state.progress + self.state.step_size).min(1.0);

        if self.state.progress >= 1.0 {
            self.state.progress = 1.0;
            self.phase = AssemblyPhase::Settled;
            apex.snap();
            log::info!("tree assembled after {} frames", self.frames);
            return AssemblyStep::JustSettled;
        }

        apex.follow(self.ease_out());
        AssemblyStep::Advanced
    }

    pub fn state(&self) -> &AssemblyState {
        &self.state
    }

    pub fn progress(&self) -> f32 {
        self.state.progress
    }

    pub fn phase(&self) -> AssemblyPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == AssemblyPhase::Settled
    }

    pub fn displacement_scale(&self) -> f32 {
        self.displacement_scale
    }

    /// Frames stepped while dispersing
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Smoothstep of progress, the curve used for vertex displacement
    pub fn eased(&self) -> f32 {
        ease(self.state.progress, Easing::SmoothStep)
    }

    /// Ease-out of progress, the curve used for the apex marker
    pub fn ease_out(&self) -> f32 {
        ease(self.state.progress, Easing::EaseOut)
    }

    /// `1 - sqrt(eased)`: 1 when fully dispersed, 0 when assembled
    pub fn explode_factor(&self) -> f32 {
        explode_factor(self.state.progress)
    }
}

/// Displacement factor for a given progress; mirrored by the instance shader
pub fn explode_factor(progress: f32) -> f32 {
    1.0 - ease(progress, Easing::SmoothStep).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apex() -> ApexMarker {
        ApexMarker::new(Vec3::new(0.0, 14.5, 0.0), Vec3::new(12.0, -7.0, 9.0))
    }

    #[test]
    fn test_explode_factor_endpoints_exact() {
        assert_eq!(explode_factor(0.0), 1.0);
        assert_eq!(explode_factor(1.0), 0.0);
    }

    #[test]
    fn test_explode_factor_decreases() {
        let mut prev = explode_factor(0.0);
        for i in 1..=100 {
            let f = explode_factor(i as f32 / 100.0);
            assert!(f <= prev);
            prev = f;
        }
    }

    #[test]
    fn test_progress_monotonic_and_saturates_exactly() {
        let mut anim = AssemblyAnimator::new(0.0005, 0.00005, 20.0);
        let mut marker = apex();
        let mut prev = anim.progress();
        let mut settled_at = None;

        for frame in 0..10_000 {
            let step = anim.step(&mut marker);
            assert!(anim.progress() >= prev);
            assert!(anim.progress() <= 1.0);
            prev = anim.progress();
            if step == AssemblyStep::JustSettled {
                settled_at = Some(frame);
                break;
            }
        }

        assert!(settled_at.is_some(), "never settled");
        assert_eq!(anim.progress(), 1.0);
        assert_eq!(anim.explode_factor(), 0.0);
    }

    #[test]
    fn test_bounded_frame_count() {
        // With step growing linearly, progress after n frames is at least
        // accel * n(n+1)/2, so n = ceil(sqrt(2 / accel)) frames always suffice.
        let accel = 0.0001;
        let mut anim = AssemblyAnimator::new(0.0, accel, 20.0);
        let mut marker = apex();
        let bound = (2.0f32 / accel).sqrt().ceil() as u32 + 1;
        while !anim.is_settled() {
            anim.step(&mut marker);
            assert!(anim.frames() <= bound);
        }
    }

    #[test]
    fn test_step_size_accelerates() {
        let mut anim = AssemblyAnimator::new(0.001, 0.001, 20.0);
        let mut marker = apex();
        anim.step(&mut marker);
        let first = anim.progress();
        anim.step(&mut marker);
        let second = anim.progress() - first;
        assert!(second > first);
        assert!((anim.state().step_size - 0.003).abs() < 1e-6);
    }

    #[test]
    fn test_settles_exactly_once_and_freezes() {
        let mut anim = AssemblyAnimator::new(0.4, 0.1, 20.0);
        let mut marker = apex();
        let steps: Vec<_> = (0..6).map(|_| anim.step(&mut marker)).collect();

        let settled = steps.iter().filter(|s| **s == AssemblyStep::JustSettled).count();
        assert_eq!(settled, 1);
        assert_eq!(steps[0], AssemblyStep::Advanced);
        assert_eq!(*steps.last().unwrap(), AssemblyStep::Idle);

        let frozen = *anim.state();
        anim.step(&mut marker);
        assert_eq!(*anim.state(), frozen);
    }

    #[test]
    fn test_apex_follows_ease_out_then_snaps() {
        let mut anim = AssemblyAnimator::new(0.0, 0.05, 20.0);
        let mut marker = apex();
        assert_eq!(marker.position, marker.start_position());

        anim.step(&mut marker);
        let expected = marker.start_position().lerp(&marker.final_position, anim.ease_out());
        assert!((marker.position - expected).length() < 1e-5);

        while anim.step(&mut marker) != AssemblyStep::JustSettled {}
        assert_eq!(marker.position, marker.final_position);
    }

    #[test]
    fn test_settled_animator() {
        let mut anim = AssemblyAnimator::settled(20.0);
        let mut marker = apex();
        assert_eq!(anim.step(&mut marker), AssemblyStep::Idle);
        assert_eq!(anim.explode_factor(), 0.0);
    }
}
