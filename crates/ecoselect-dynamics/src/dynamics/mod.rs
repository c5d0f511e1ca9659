//! Population dynamics module
pub mod simulator;

pub use self::simulator::{PopulationDynamicsSimulator, SimulationConfig, SimulationOutcome};
