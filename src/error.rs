use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("spring stiffness must be finite and greater than zero, got {0}")]
    InvalidStiffness(f32),
    #[error("spring damping must be finite and non-negative, got {0}")]
    InvalidDamping(f32),
    #[error("curve duration must be finite and non-negative, got {0}s")]
    InvalidDuration(f32),
    #[error("an animation batch needs at least one action name")]
    NoActions,
}

pub type Result<T> = std::result::Result<T, Error>;
