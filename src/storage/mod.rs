//! Storage layer for studyplan - plan documents, the routine and schedules.
//!
//! The planner never writes incrementally: callers load a snapshot, run the
//! engine, and persist the returned schedule back whole.

mod json;

pub use json::JsonStore;
