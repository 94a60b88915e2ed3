//! Domain types for studyplan
//!
//! - Plan: the authored curriculum (disciplines, topics, goals, cycles)
//! - UserRoutine: weekly minutes per weekday plus reading profile
//! - PlanningEntry: one scheduled session on the calendar

pub mod entry;
pub mod plan;
pub mod routine;

pub use entry::{EntryStatus, PlanningEntry};
pub use plan::{Cycle, CycleItem, CycleSystem, Discipline, Folder, Goal, GoalKind, Plan, ReviewConfig, SubGoal, Topic};
pub use routine::{Profile, UserRoutine};
