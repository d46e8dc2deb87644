use std::time::Duration;

/// Sampling interval used when searching for the settling time (seconds)
const SAMPLE_STEP: f64 = 1.0 / 240.0;

/// Distance from rest (in both position and velocity) at which a spring counts as settled
const SETTLE_THRESHOLD: f64 = 0.001;

/// Damping ratios this close to 1.0 use the critically damped solution
const CRITICAL_EPSILON: f64 = 1e-4;

/// Upper bound on a spring's settling duration. Undamped springs never settle.
pub const MAX_SETTLING_DURATION: Duration = Duration::from_secs(10);

/// Configuration for spring physics animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Mass of the spring (default: 1.0)
    pub mass: f32,
    /// Stiffness of the spring
    pub stiffness: f32,
    /// Damping coefficient
    pub damping: f32,
}

impl SpringConfig {
    /// Create a unit-mass spring with the given stiffness and damping
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            mass: 1.0,
            stiffness,
            damping,
        }
    }

    /// Time the spring takes to come to rest, starting from position 0 with
    /// zero velocity and targeting 1.0.
    ///
    /// Derived purely from the spring parameters, so two identical configs
    /// always report the same duration. Capped at [`MAX_SETTLING_DURATION`].
    pub fn settling_duration(&self) -> Duration {
        let Some(motion) = SpringMotion::new(self) else {
            return MAX_SETTLING_DURATION;
        };
        let max_secs = MAX_SETTLING_DURATION.as_secs_f64();
        let mut step = 0u32;
        loop {
            step += 1;
            let elapsed = f64::from(step) * SAMPLE_STEP;
            if elapsed >= max_secs {
                return MAX_SETTLING_DURATION;
            }
            if motion.is_settled_at(elapsed) {
                return Duration::from_secs_f64(elapsed);
            }
        }
    }

    /// Spring position (0.0 = start, 1.0 = target) after `elapsed_secs`.
    ///
    /// Can overshoot 1.0 for under-damped springs.
    pub fn position_at(&self, elapsed_secs: f32) -> f32 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }
        match SpringMotion::new(self) {
            Some(motion) => (1.0 + motion.sample(f64::from(elapsed_secs)).0) as f32,
            None => 0.0,
        }
    }
}

/// Closed-form solution of a unit step response: displacement from the
/// target starts at -1 with zero velocity.
#[derive(Clone, Copy, Debug)]
enum SpringMotion {
    Underdamped {
        decay: f64,
        omega_d: f64,
        omega_0: f64,
    },
    Critical { omega_0: f64 },
    Overdamped {
        r1: f64,
        r2: f64,
        a: f64,
        b: f64,
    },
}

impl SpringMotion {
    /// `None` when the parameters do not describe a physical spring
    fn new(config: &SpringConfig) -> Option<Self> {
        let mass = f64::from(config.mass);
        let stiffness = f64::from(config.stiffness);
        let damping = f64::from(config.damping);

        let omega_0 = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());
        let physical = omega_0.is_finite() && omega_0 > 0.0 && zeta.is_finite() && zeta >= 0.0;
        if !physical {
            return None;
        }

        let motion = if (zeta - 1.0).abs() < CRITICAL_EPSILON {
            SpringMotion::Critical { omega_0 }
        } else if zeta < 1.0 {
            SpringMotion::Underdamped {
                decay: zeta * omega_0,
                omega_d: omega_0 * (1.0 - zeta * zeta).sqrt(),
                omega_0,
            }
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega_0 * (zeta - root);
            let r2 = -omega_0 * (zeta + root);
            SpringMotion::Overdamped {
                r1,
                r2,
                a: r2 / (r1 - r2),
                b: -r1 / (r1 - r2),
            }
        };
        Some(motion)
    }

    /// Displacement from the target and velocity at `t` seconds
    fn sample(&self, t: f64) -> (f64, f64) {
        match *self {
            SpringMotion::Underdamped {
                decay,
                omega_d,
                omega_0,
            } => {
                let envelope = (-decay * t).exp();
                let (sin, cos) = (omega_d * t).sin_cos();
                let displacement = -envelope * (cos + decay / omega_d * sin);
                let velocity = envelope * omega_0 * omega_0 / omega_d * sin;
                (displacement, velocity)
            }
            SpringMotion::Critical { omega_0 } => {
                let envelope = (-omega_0 * t).exp();
                (
                    -(1.0 + omega_0 * t) * envelope,
                    omega_0 * omega_0 * t * envelope,
                )
            }
            SpringMotion::Overdamped { r1, r2, a, b } => {
                let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
                (a * e1 + b * e2, a * r1 * e1 + b * r2 * e2)
            }
        }
    }

    fn is_settled_at(&self, t: f64) -> bool {
        let (displacement, velocity) = self.sample(t);
        displacement.abs() < SETTLE_THRESHOLD && velocity.abs() < SETTLE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_reaches_target() {
        let config = SpringConfig::new(100.0, 10.0);
        let position = config.position_at(3.0);
        assert!(
            (position - 1.0).abs() < 0.01,
            "Spring should settle near target, got {}",
            position
        );
    }

    #[test]
    fn test_spring_overshoots() {
        let config = SpringConfig::new(200.0, 10.0);

        let max_position = (0..120)
            .map(|i| config.position_at(i as f32 / 60.0))
            .fold(0.0f32, f32::max);

        assert!(
            max_position > 1.0,
            "Under-damped spring should overshoot, max was {}",
            max_position
        );
    }

    #[test]
    fn test_critically_damped_spring_does_not_overshoot() {
        // c = 2 * sqrt(k)
        let config = SpringConfig::new(400.0, 40.0);
        for i in 0..240 {
            let position = config.position_at(i as f32 / 120.0);
            assert!(position <= 1.0 + 1e-6, "overshot to {} at step {}", position, i);
        }
    }

    #[test]
    fn test_overdamped_spring_rises_monotonically() {
        let config = SpringConfig::new(100.0, 60.0);
        let mut last = 0.0;
        for i in 1..120 {
            let position = config.position_at(i as f32 / 60.0);
            assert!(position >= last, "fell from {} to {}", last, position);
            assert!(position <= 1.0);
            last = position;
        }
    }

    #[test]
    fn test_settling_duration_is_deterministic() {
        let a = SpringConfig::new(300.0, 20.0).settling_duration();
        let b = SpringConfig::new(300.0, 20.0).settling_duration();
        assert_eq!(a, b);
    }

    #[test]
    fn test_settling_duration_is_finite_for_damped_spring() {
        let duration = SpringConfig::new(300.0, 20.0).settling_duration();
        assert!(duration > Duration::from_millis(300), "got {:?}", duration);
        assert!(duration < Duration::from_secs(3), "got {:?}", duration);
    }

    #[test]
    fn test_lighter_damping_settles_later() {
        let heavy = SpringConfig::new(300.0, 30.0).settling_duration();
        let light = SpringConfig::new(300.0, 5.0).settling_duration();
        assert!(light > heavy, "light {:?} vs heavy {:?}", light, heavy);
    }

    #[test]
    fn test_undamped_spring_hits_cap() {
        let duration = SpringConfig::new(100.0, 0.0).settling_duration();
        assert_eq!(duration, MAX_SETTLING_DURATION);
    }

    #[test]
    fn test_stiff_spring_settles_quickly() {
        for config in [
            SpringConfig::new(100_000.0, 632.0),
            SpringConfig::new(250_000.0, 1000.0),
        ] {
            let duration = config.settling_duration();
            assert!(duration < Duration::from_millis(100), "{:?}: {:?}", config, duration);
        }
    }

    #[test]
    fn test_stiff_spring_position_stays_finite() {
        let config = SpringConfig::new(100_000.0, 632.0);
        for ms in [1, 5, 20, 50, 500, 5000] {
            let position = config.position_at(ms as f32 / 1000.0);
            assert!(position.is_finite(), "NaN at {}ms", ms);
            assert!((0.0..=1.01).contains(&position), "{} at {}ms", position, ms);
        }
        assert!((config.position_at(0.5) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_position_at_zero_is_start() {
        assert_eq!(SpringConfig::new(100.0, 10.0).position_at(0.0), 0.0);
    }
}
