//! Selection module
pub mod policy;

pub use self::policy::{DiversitySelector, Selection, SelectionPolicy};
