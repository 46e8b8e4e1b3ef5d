/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Training and evaluation loops
pub mod run;

/// Discretized state and action spaces
pub mod space;

mod error;
mod util;

pub use error::{Error, Result};
