//! Timing curves for curve-based animations.
//!
//! A timing curve maps linear progress `t` in `0.0..=1.0` to eased progress.
//! Curve animations take their curve and duration verbatim from the
//! [`AnimationSpec`](super::AnimationSpec) that built them.
//!
//! ## Built-in Curves
//!
//! - [`TimingCurve::Linear`] - Constant speed
//! - [`TimingCurve::EaseIn`] - Starts slow, ends fast
//! - [`TimingCurve::EaseOut`] - Starts fast, ends slow
//! - [`TimingCurve::EaseInOut`] - Slow start and end, fast middle
//!
//! [`TimingCurve::CubicBezier`] is the custom curve descriptor, given as the
//! two inner control points of a CSS-style cubic bezier.

/// Timing curve that controls the pacing of a curve animation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimingCurve {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Starts slow, speeds up, then slows down
    #[default]
    EaseInOut,
    /// Cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl TimingCurve {
    /// Evaluate the curve at time t (0.0 to 1.0).
    ///
    /// `t` is clamped to the unit range; the result may leave `[0, 1]` for
    /// bezier curves whose control points overshoot.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingCurve::Linear => t,
            TimingCurve::EaseIn => ease_in(t),
            TimingCurve::EaseOut => ease_out(t),
            TimingCurve::EaseInOut => ease_in_out(t),
            TimingCurve::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
        }
    }
}

// Easing functions

fn ease_in(t: f32) -> f32 {
    t * t
}

fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Cubic bezier curve evaluation.
/// Assumes x1 and x2 are in [0, 1] so x(t) is monotonic.
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Newton-Raphson: find the curve parameter whose x equals t
    let mut current_t = t;
    for _ in 0..8 {
        let current_x = cubic_bezier_x(current_t, x1, x2);
        let current_slope = cubic_bezier_slope(current_t, x1, x2);
        if current_slope.abs() < 1e-6 {
            break;
        }
        current_t -= (current_x - t) / current_slope;
    }
    cubic_bezier_y(current_t, y1, y2)
}

fn cubic_bezier_x(t: f32, x1: f32, x2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

fn cubic_bezier_y(t: f32, y1: f32, y2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

fn cubic_bezier_slope(t: f32, x1: f32, x2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}
