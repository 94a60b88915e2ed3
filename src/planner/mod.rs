//! Planning engine
//!
//! - duration: minutes needed per goal and reading profile
//! - flatten: curriculum -> ordered work units (continuous / rotating cycles)
//! - allocate: greedy day-by-day placement with carry-over
//! - history: regeneration that keeps completed work and placed reviews
//! - review: spaced-repetition chain advanced on completion
//! - summary: daily and calendar views
//!
//! Every call takes an immutable snapshot and returns a fresh schedule; the
//! planner holds no state between calls besides its id source and clock.

pub mod allocate;
pub mod duration;
pub mod flatten;
pub mod history;
pub mod review;
pub mod summary;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

pub use allocate::{Allocator, PlannerLimits};
pub use duration::{goal_minutes, minutes_per_page};
pub use flatten::{WorkUnit, flatten};
pub use history::{CompletedWork, Regeneration, historic_entries};
pub use review::{Completion, ReviewStep, ReviewSteps, complete_entry};
pub use summary::{DailySummary, daily_summary, format_minutes, group_by_date};

use crate::clock::{Clock, SystemClock};
use crate::domain::{Plan, PlanningEntry, UserRoutine};
use crate::error::Result;
use crate::id::{IdProvider, UuidIds};

/// Why a schedule is being generated.
///
/// Both modes rebuild the future identically; the distinction is kept at the
/// interface only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Plan was just selected
    #[default]
    New,
    /// Explicit replan or a completion event
    Replan,
}

/// Entry point of the engine, bundling the id source, clock and limits
pub struct Planner {
    ids: Box<dyn IdProvider>,
    clock: Box<dyn Clock>,
    limits: PlannerLimits,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(Box::new(UuidIds), Box::new(SystemClock))
    }
}

impl Planner {
    pub fn new(ids: Box<dyn IdProvider>, clock: Box<dyn Clock>) -> Self {
        Self {
            ids,
            clock,
            limits: PlannerLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: PlannerLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Rebuild the schedule of `plan` from `start_date` forward, keeping the
    /// historic part of `existing`. Returns the full schedule sorted by date.
    pub fn generate_schedule(
        &self,
        plan: &Plan,
        routine: &UserRoutine,
        start_date: NaiveDate,
        existing: &[PlanningEntry],
        mode: GenerationMode,
    ) -> Vec<PlanningEntry> {
        debug!("generate_schedule plan={} start={} mode={:?}", plan.id, start_date, mode);
        Regeneration {
            plan,
            routine,
            start: start_date,
            today: self.clock.today(),
            limits: &self.limits,
            ids: self.ids.as_ref(),
        }
        .run(existing)
    }

    /// Complete a session today and chain its next review
    pub fn complete(&self, schedule: &[PlanningEntry], entry_id: &str, time_spent: u32, plan: &Plan) -> Result<Completion> {
        complete_entry(schedule, entry_id, time_spent, plan, self.clock.today(), self.ids.as_ref())
    }

    /// Complete a session, then rebuild the future around the new history
    pub fn complete_and_replan(
        &self,
        schedule: &[PlanningEntry],
        entry_id: &str,
        time_spent: u32,
        plan: &Plan,
        routine: &UserRoutine,
    ) -> Result<Vec<PlanningEntry>> {
        let completion = self.complete(schedule, entry_id, time_spent, plan)?;
        let today = self.clock.today();
        Ok(self.generate_schedule(plan, routine, today, &completion.schedule, GenerationMode::Replan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::{EntryStatus, Profile};
    use crate::id::SequentialIds;
    use serde_json::json;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn planner() -> Planner {
        Planner::new(Box::new(SequentialIds::new("e")), Box::new(FixedClock(monday())))
    }

    fn plan() -> Plan {
        serde_json::from_value(json!({
            "id": "p", "name": "P",
            "disciplines": [{ "id": "d", "name": "D", "topics": [
                { "id": "t", "title": "T", "goals": [
                    { "id": "a", "type": "SUMMARY", "minutes": 30, "order": 1,
                      "reviewConfig": { "enabled": true, "intervals": [7], "repeatLast": false } },
                    { "id": "b", "type": "SUMMARY", "minutes": 30, "order": 2 }
                ]}
            ]}],
            "cycles": [{ "id": "c", "items": [{ "type": "DISCIPLINE", "id": "d" }] }]
        }))
        .unwrap()
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&GenerationMode::Replan).unwrap(), "\"replan\"");
        assert_eq!(GenerationMode::default(), GenerationMode::New);
    }

    #[test]
    fn test_modes_behave_identically() {
        let routine = UserRoutine::from_week([0, 60, 0, 0, 0, 0, 0], Profile::Beginner);
        let planner = planner();
        let new = planner.generate_schedule(&plan(), &routine, monday(), &[], GenerationMode::New);
        let replan = planner.generate_schedule(&plan(), &routine, monday(), &[], GenerationMode::Replan);
        assert_eq!(new, replan);
    }

    #[test]
    fn test_same_planner_twice_is_identical() {
        let planner = planner();
        let routine = UserRoutine::from_week([0, 40, 0, 0, 0, 0, 0], Profile::Beginner);
        let first = planner.generate_schedule(&plan(), &routine, monday(), &[], GenerationMode::New);
        let second = planner.generate_schedule(&plan(), &routine, monday(), &[], GenerationMode::New);
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_complete_and_replan_keeps_review_and_reflows() {
        let planner = planner();
        let plan = plan();
        let routine = UserRoutine::from_week([0, 60, 0, 0, 0, 0, 0], Profile::Beginner);
        let schedule = planner.generate_schedule(&plan, &routine, monday(), &[], GenerationMode::New);
        assert_eq!(schedule.len(), 2);

        let first = schedule[0].id.clone();
        let replanned = planner.complete_and_replan(&schedule, &first, 25, &plan, &routine).unwrap();

        let completed: Vec<_> = replanned.iter().filter(|e| e.status == EntryStatus::Completed).collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].goal_id, "a");

        let reviews: Vec<_> = replanned.iter().filter(|e| e.is_review).collect();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].date, monday() + chrono::Days::new(7));

        let pending_b: Vec<_> = replanned.iter().filter(|e| e.goal_id == "b" && !e.is_review).collect();
        assert_eq!(pending_b.len(), 1);
        assert_eq!(pending_b[0].date, monday());
    }
}
