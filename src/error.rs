use thiserror::Error;

/// Configuration errors raised when constructing agents, environments, and spaces
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid value for `{name}`: {value} is not in the interval [{min}, {max}]")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("the {0} space must not be empty")]
    EmptySpace(&'static str),
    #[error("state range must be finite and positive, got {0}")]
    InvalidStateRange(f64),
    #[error("finite difference step size must be finite and positive, got {0}")]
    InvalidStepSize(f64),
    #[error("action grid bounds must be finite, got [{start}, {end}]")]
    InvalidGrid { start: f64, end: f64 },
    #[error("`vi - vf` must have same sign as `rate`")]
    DecaySign,
}

pub type Result<T> = std::result::Result<T, Error>;
