//! Core types for EcoSelect

pub mod candidate;
pub mod matrix;
pub mod profile;
pub mod selection;
