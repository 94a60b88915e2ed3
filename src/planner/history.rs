//! History-preserving regeneration.
//!
//! Existing entries are split into historic ones (completed work, reviews that
//! are done or still ahead) and everything else. The rest is discarded and the
//! future is rebuilt from scratch, so repeated calls never lose or duplicate
//! history and stale pending entries are always superseded.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::{debug, info};

use super::allocate::{Allocator, PlannerLimits};
use super::flatten::flatten;
use crate::domain::{Plan, PlanningEntry, UserRoutine};
use crate::id::IdProvider;

/// Ids of goals and lessons that already have a completed session
#[derive(Debug, Clone, Default)]
pub struct CompletedWork {
    goal_ids: HashSet<String>,
    sub_goal_ids: HashSet<String>,
}

impl CompletedWork {
    /// Collect from the completed, non-review entries of a schedule
    pub fn from_entries(entries: &[PlanningEntry]) -> Self {
        let mut done = Self::default();
        for entry in entries.iter().filter(|e| e.is_completed() && !e.is_review) {
            match &entry.sub_goal_id {
                Some(sub) => {
                    done.sub_goal_ids.insert(sub.clone());
                }
                None => {
                    done.goal_ids.insert(entry.goal_id.clone());
                }
            }
        }
        done
    }

    pub fn contains_goal(&self, goal_id: &str) -> bool {
        self.goal_ids.contains(goal_id)
    }

    pub fn contains_sub_goal(&self, sub_goal_id: &str) -> bool {
        self.sub_goal_ids.contains(sub_goal_id)
    }

    pub fn len(&self) -> usize {
        self.goal_ids.len() + self.sub_goal_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Historic entries in their original order, first occurrence of each id kept
pub fn historic_entries(existing: &[PlanningEntry], today: NaiveDate) -> Vec<PlanningEntry> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for entry in existing {
        if entry.is_historic(today) && seen.insert(entry.id.as_str()) {
            kept.push(entry.clone());
        }
    }
    kept
}

/// Inputs for one regeneration
pub struct Regeneration<'r> {
    pub plan: &'r Plan,
    pub routine: &'r UserRoutine,
    pub start: NaiveDate,
    pub today: NaiveDate,
    pub limits: &'r PlannerLimits,
    pub ids: &'r dyn IdProvider,
}

impl Regeneration<'_> {
    /// Keep history, rebuild the future, return everything sorted by date
    pub fn run(&self, existing: &[PlanningEntry]) -> Vec<PlanningEntry> {
        let historic = historic_entries(existing, self.today);
        let dropped = existing.len() - historic.len();
        let completed = CompletedWork::from_entries(&historic);

        let mut schedule = historic;
        if self.plan.cycles.is_empty() {
            info!("plan {} has no cycles, nothing to schedule", self.plan.id);
        } else if self.routine.is_paused {
            info!("routine is paused, keeping {} historic entries only", schedule.len());
        } else {
            let units = flatten(self.plan, &completed);
            let allocator = Allocator {
                scope: &self.plan.id,
                routine: self.routine,
                today: self.today,
                limits: self.limits,
                ids: self.ids,
            };
            let fresh = allocator.allocate(&units, self.start, &schedule);
            info!(
                "regenerated plan {}: kept {} historic, dropped {}, placed {} new entries",
                self.plan.id,
                schedule.len(),
                dropped,
                fresh.len()
            );
            schedule.extend(fresh);
        }

        debug!("{} completed work ids excluded", completed.len());
        // Stable: same-day entries keep historic-then-new creation order
        schedule.sort_by_key(|e| e.date);
        schedule
    }
}
