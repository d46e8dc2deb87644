use std::time::Duration;

use bitflags::bitflags;

use super::{SpringConfig, TimingCurve};

bitflags! {
    /// How an animation's values are presented outside its active time range.
    ///
    /// An empty set means the animation has no effect before it starts or
    /// after it ends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FillMode: u8 {
        /// Hold the end value after the animation finishes
        const FORWARDS = 1 << 0;
        /// Show the start value before the animation begins
        const BACKWARDS = 1 << 1;
        /// Both directions
        const BOTH = Self::FORWARDS.bits() | Self::BACKWARDS.bits();
    }
}

impl FillMode {
    /// No fill in either direction
    pub const REMOVED: Self = Self::empty();
}

/// Kind-specific parameters of a built animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKind {
    /// Spring-driven; the duration is the spring's settling duration
    Spring(SpringConfig),
    /// Curve-driven with an explicit duration
    Basic(TimingCurve),
}

/// A concrete animation ready to be handed to the host.
///
/// Produced by [`AnimationSpec::build`](super::AnimationSpec::build). The
/// host reads the key path and flags when attaching the animation to an
/// object.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationHandle {
    kind: AnimationKind,
    duration: Duration,
    key_path: Option<String>,
    fill_mode: FillMode,
    removed_on_completion: bool,
}

impl AnimationHandle {
    pub(crate) fn new(kind: AnimationKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            key_path: None,
            fill_mode: FillMode::REMOVED,
            removed_on_completion: true,
        }
    }

    pub fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Property this animation drives, once assigned
    pub fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn is_removed_on_completion(&self) -> bool {
        self.removed_on_completion
    }

    /// Stiffness and damping, for spring animations
    pub fn spring(&self) -> Option<&SpringConfig> {
        match &self.kind {
            AnimationKind::Spring(config) => Some(config),
            AnimationKind::Basic(_) => None,
        }
    }

    /// Timing curve, for curve animations
    pub fn timing_curve(&self) -> Option<TimingCurve> {
        match self.kind {
            AnimationKind::Basic(curve) => Some(curve),
            AnimationKind::Spring(_) => None,
        }
    }

    pub fn set_key_path(&mut self, key_path: impl Into<String>) {
        self.key_path = Some(key_path.into());
    }

    pub fn set_fill_mode(&mut self, fill_mode: FillMode) {
        self.fill_mode = fill_mode;
    }

    pub fn set_removed_on_completion(&mut self, removed: bool) {
        self.removed_on_completion = removed;
    }

    /// Builder form of [`set_key_path`](Self::set_key_path)
    pub fn key_path_for(mut self, key_path: impl Into<String>) -> Self {
        self.set_key_path(key_path);
        self
    }

    /// Eased progress at `elapsed` since the animation began.
    ///
    /// Curve animations clamp to `[0, 1]` in time; springs are simulated and
    /// may overshoot. Past the duration both report exactly 1.0.
    pub fn progress_at(&self, elapsed: Duration) -> f32 {
        if elapsed >= self.duration {
            return 1.0;
        }
        match &self.kind {
            AnimationKind::Spring(config) => config.position_at(elapsed.as_secs_f32()),
            AnimationKind::Basic(curve) => {
                let total = self.duration.as_secs_f32();
                if total <= 0.0 {
                    return 1.0;
                }
                curve.evaluate(elapsed.as_secs_f32() / total)
            }
        }
    }

    /// Whether the animation has run to completion at `elapsed`
    pub fn is_finished_at(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}
