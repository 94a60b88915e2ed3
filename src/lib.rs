//! studyplan - study-plan generator for exam candidates
//!
//! Flattens a curriculum (disciplines -> topics -> goals, organized into
//! cycles) into a day-by-day calendar bounded by a weekly time budget, and
//! re-injects spaced-repetition reviews as sessions are completed.

pub mod clock;
pub mod domain;
pub mod error;
pub mod id;
pub mod planner;
pub mod storage;

pub use error::{PlannerError, Result};
pub use planner::{GenerationMode, Planner};
