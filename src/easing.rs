//! Easing curves for tweens.

/// Shape of a tween's progress over its duration.
///
/// Every curve maps 0 to 0 and 1 to 1 and is monotonic in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^2`
    QuadOut,
    /// `1 - (1 - t)^3`
    CubicOut,
    /// `1 - (1 - t)^4`, the "power3" ease-out. Fast start, long soft landing.
    #[default]
    QuartOut,
    /// Cubic ease-in-out.
    CubicInOut,
}

impl Easing {
    /// Eased value for `t`, clamped to 0.0-1.0 first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
