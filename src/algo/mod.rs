/// Table-based methods for discrete actions
pub mod tabular;
