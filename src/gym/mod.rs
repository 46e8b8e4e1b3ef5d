pub mod derivative;

pub use derivative::DerivativeEnv;
