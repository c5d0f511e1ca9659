//! Interaction matrix module
pub mod matrix;
pub mod stability;

pub use self::matrix::{InteractionConfig, InteractionMatrixBuilder};
pub use self::stability::{EigenStability, StabilityValidator};
