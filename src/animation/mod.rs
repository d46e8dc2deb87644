mod handle;
mod spring;
mod timing;

use std::time::Duration;

use crate::error::{Error, Result};

pub use handle::{AnimationHandle, AnimationKind, FillMode};
pub use spring::{SpringConfig, MAX_SETTLING_DURATION};
pub use timing::TimingCurve;

/// Describes how to build the animation for one property.
///
/// Specs are plain values: declared once in an [`ActionTable`](crate::ActionTable)
/// and turned into a fresh [`AnimationHandle`] every time a matching property
/// change is intercepted.
///
/// ```ignore
/// let fade = AnimationSpec::ease_in_out(Duration::from_millis(300));
/// let bounce = AnimationSpec::spring(300.0, 20.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationSpec {
    /// Spring physics; duration follows from how long the spring takes to settle
    Spring(SpringConfig),
    /// Timing curve with an explicit duration
    Curve {
        curve: TimingCurve,
        duration: Duration,
    },
}

impl AnimationSpec {
    /// Spring animation with unit mass.
    ///
    /// # Panics
    ///
    /// Panics if `stiffness` is not finite and positive, or `damping` is not
    /// finite and non-negative. Use [`try_spring`](Self::try_spring) for
    /// untrusted input.
    pub fn spring(stiffness: f32, damping: f32) -> Self {
        Self::try_spring(stiffness, damping).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_spring(stiffness: f32, damping: f32) -> Result<Self> {
        if !stiffness.is_finite() || stiffness <= 0.0 {
            return Err(Error::InvalidStiffness(stiffness));
        }
        if !damping.is_finite() || damping < 0.0 {
            return Err(Error::InvalidDamping(damping));
        }
        Ok(AnimationSpec::Spring(SpringConfig::new(stiffness, damping)))
    }

    pub fn curve(curve: TimingCurve, duration: Duration) -> Self {
        AnimationSpec::Curve { curve, duration }
    }

    /// Curve animation from a duration in seconds
    pub fn try_curve_secs(curve: TimingCurve, secs: f32) -> Result<Self> {
        let duration =
            Duration::try_from_secs_f32(secs).map_err(|_| Error::InvalidDuration(secs))?;
        Ok(Self::curve(curve, duration))
    }

    pub fn ease_in_out(duration: Duration) -> Self {
        Self::curve(TimingCurve::EaseInOut, duration)
    }

    pub fn ease_in(duration: Duration) -> Self {
        Self::curve(TimingCurve::EaseIn, duration)
    }

    pub fn ease_out(duration: Duration) -> Self {
        Self::curve(TimingCurve::EaseOut, duration)
    }

    pub fn linear(duration: Duration) -> Self {
        Self::curve(TimingCurve::Linear, duration)
    }

    /// Build a fresh animation from this spec.
    ///
    /// Deterministic: the same spec always yields the same parameters. The
    /// returned handle has no key path yet.
    pub fn build(&self) -> AnimationHandle {
        match *self {
            AnimationSpec::Spring(config) => {
                AnimationHandle::new(AnimationKind::Spring(config), config.settling_duration())
            }
            AnimationSpec::Curve { curve, duration } => {
                AnimationHandle::new(AnimationKind::Basic(curve), duration)
            }
        }
    }
}
