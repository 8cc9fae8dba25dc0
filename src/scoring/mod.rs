pub mod allocation;
pub mod points;

pub use allocation::pick_least_allocated;
pub use points::{score, PredictionOutcome};
