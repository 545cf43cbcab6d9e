//! Convergence timeline.
//!
//! Each particle gets one [`Tween`] from its dispersed position to its home.
//! Tweens share a duration and easing but start at staggered times, so the
//! shape assembles as a left-to-right sweep. All tweens are evaluated against
//! a single clock, which can run forward on its own ([`Timeline::play`]) or be
//! scrubbed to any normalized progress ([`Timeline::set_progress`]).
//!
//! ```ignore
//! let plan = ConvergencePlan::for_field(&field, Easing::default());
//! let mut timeline = Timeline::new(plan, field.current_mut()); // settled, paused
//!
//! timeline.play(field.current_mut());
//! // each frame:
//! timeline.tick(delta_seconds, field.current_mut());
//! ```

use crate::easing::Easing;
use crate::field::ParticleField;
use glam::Vec3;

/// Duration of every particle's tween, in timeline seconds.
pub const TWEEN_DURATION: f32 = 0.6;

/// Start offset per unit of horizontal ratio. The rightmost particle starts
/// this many seconds after the leftmost.
pub const STAGGER: f32 = 0.7;

/// One particle's move from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub index: usize,
    pub from: Vec3,
    pub to: Vec3,
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Un-eased progress of this tween at timeline time `time`.
    pub fn local_progress(&self, time: f32) -> f32 {
        if time >= self.end() {
            return 1.0;
        }
        if self.duration <= 0.0 || time <= self.start {
            return 0.0;
        }
        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Position at timeline time `time`. Exactly `from` before the tween and
    /// exactly `to` once it has finished.
    pub fn position_at(&self, time: f32) -> Vec3 {
        let k = self.easing.apply(self.local_progress(time));
        if k <= 0.0 {
            self.from
        } else if k >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * k
        }
    }
}

/// The full set of tweens for one particle field.
#[derive(Debug, Clone, Default)]
pub struct ConvergencePlan {
    tweens: Vec<Tween>,
    duration: f32,
}

impl ConvergencePlan {
    pub fn new(tweens: Vec<Tween>) -> Self {
        let duration = tweens.iter().map(Tween::end).fold(0.0, f32::max);
        Self { tweens, duration }
    }

    /// Plan moving every particle from its current (dispersed) position home.
    ///
    /// Particle `i` starts at `ratio(i) * STAGGER`, so left-side particles
    /// converge first.
    pub fn for_field(field: &ParticleField, easing: Easing) -> Self {
        let tweens = field
            .home()
            .iter()
            .zip(field.current())
            .enumerate()
            .map(|(index, (&to, &from))| Tween {
                index,
                from,
                to,
                start: field.ratio(index) * STAGGER,
                duration: TWEEN_DURATION,
                easing,
            })
            .collect();
        Self::new(tweens)
    }

    /// Time at which the last tween finishes.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Write every tweened position at `time` into `positions`.
    pub fn apply(&self, time: f32, positions: &mut [Vec3]) {
        for tween in &self.tweens {
            if let Some(slot) = positions.get_mut(tween.index) {
                *slot = tween.position_at(time);
            }
        }
    }
}

/// Playback state over a [`ConvergencePlan`].
///
/// Progress 0 is fully dispersed, 1 is fully converged. A new timeline starts
/// settled at progress 1 and paused.
#[derive(Debug, Clone)]
pub struct Timeline {
    plan: ConvergencePlan,
    time: f32,
    progress: f32,
    paused: bool,
}

impl Timeline {
    /// Create a settled, paused timeline and render it into `positions`.
    pub fn new(plan: ConvergencePlan, positions: &mut [Vec3]) -> Self {
        let mut timeline = Self {
            plan,
            time: 0.0,
            progress: 1.0,
            paused: true,
        };
        timeline.seek(1.0, positions);
        timeline
    }

    /// Restart from progress 0 and run forward until complete.
    pub fn play(&mut self, positions: &mut [Vec3]) {
        self.paused = false;
        self.seek(0.0, positions);
    }

    /// Jump to `progress` and pause there.
    pub fn set_progress(&mut self, progress: f32, positions: &mut [Vec3]) {
        self.paused = true;
        self.seek(progress, positions);
    }

    /// Current progress in 0.0-1.0.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the timeline is advancing on its own.
    #[inline]
    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    #[inline]
    pub fn plan(&self) -> &ConvergencePlan {
        &self.plan
    }

    /// Advance playback by `delta` seconds. Returns `true` if positions changed.
    ///
    /// Does nothing while paused. Reaching the end pauses at progress 1.
    pub fn tick(&mut self, delta: f32, positions: &mut [Vec3]) -> bool {
        if self.paused || delta <= 0.0 {
            return false;
        }

        let duration = self.plan.duration();
        if duration <= 0.0 {
            self.progress = 1.0;
            self.paused = true;
            return true;
        }

        self.time = (self.time + delta).min(duration);
        if self.time >= duration {
            self.progress = 1.0;
            self.paused = true;
        } else {
            self.progress = self.time / duration;
        }
        self.plan.apply(self.time, positions);
        true
    }

    /// Swap in a new plan, keeping the current progress and play state.
    pub fn rebuild(&mut self, plan: ConvergencePlan, positions: &mut [Vec3]) {
        let progress = self.progress;
        self.plan = plan;
        self.seek(progress, positions);
    }

    fn seek(&mut self, progress: f32, positions: &mut [Vec3]) {
        self.progress = progress.clamp(0.0, 1.0);
        self.time = self.progress * self.plan.duration();
        self.plan.apply(self.time, positions);
    }
}
