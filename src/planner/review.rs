//! Spaced repetition driven by session completion.
//!
//! Completing a session moves its goal along the review chain:
//! `new -> completed(0) -> review(1) -> completed(1) -> review(2) -> ...`.
//! Each completion schedules at most one follow-up review, so the chain is
//! only ever advanced one step at a time by external completion events.

use chrono::{Days, NaiveDate};
use log::{debug, info, warn};

use crate::domain::{EntryStatus, Plan, PlanningEntry, ReviewConfig};
use crate::error::{PlannerError, Result};
use crate::id::IdProvider;

/// The next review in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStep {
    /// Step number carried by the review entry
    pub step: u32,
    /// Days after the completion the review falls on
    pub interval_days: u32,
}

/// Lazy walk along a review chain; endless when `repeat_last` is set
#[derive(Debug, Clone)]
pub struct ReviewSteps<'a> {
    config: &'a ReviewConfig,
    current: u32,
    finished: bool,
}

impl Iterator for ReviewSteps<'_> {
    type Item = ReviewStep;

    fn next(&mut self) -> Option<ReviewStep> {
        if self.finished {
            return None;
        }
        let intervals = &self.config.intervals;
        let len = intervals.len() as u32;

        let (interval_days, step) = if self.current < len {
            (intervals[self.current as usize], self.current + 1)
        } else if self.config.repeat_last && len > 0 {
            (intervals[intervals.len() - 1], len)
        } else {
            self.finished = true;
            return None;
        };

        self.current = step;
        Some(ReviewStep { step, interval_days })
    }
}

impl ReviewConfig {
    /// Reviews that follow completing a session at `step`
    pub fn steps_from(&self, step: u32) -> ReviewSteps<'_> {
        ReviewSteps {
            config: self,
            current: step,
            finished: !self.enabled,
        }
    }

    /// The single review that follows completing a session at `step`
    pub fn next_review(&self, step: u32) -> Option<ReviewStep> {
        self.steps_from(step).next()
    }
}

/// Result of completing one session
#[derive(Debug, Clone)]
pub struct Completion {
    /// The whole schedule with the entry completed and any review appended
    pub schedule: Vec<PlanningEntry>,
    /// The review that was scheduled, if the chain continues
    pub review: Option<PlanningEntry>,
}

/// Mark `entry_id` completed with `time_spent` minutes on `today` and schedule
/// the next review of its goal when the goal's review settings call for one.
///
/// The goal definition is re-read from `plan`; an entry whose goal no longer
/// exists is still completed, just without a review.
pub fn complete_entry(
    schedule: &[PlanningEntry],
    entry_id: &str,
    time_spent: u32,
    plan: &Plan,
    today: NaiveDate,
    ids: &dyn IdProvider,
) -> Result<Completion> {
    let index = schedule
        .iter()
        .position(|e| e.id == entry_id)
        .ok_or_else(|| PlannerError::EntryNotFound(entry_id.to_string()))?;
    if schedule[index].is_completed() {
        return Err(PlannerError::InvalidInput(format!("entry {} is already completed", entry_id)));
    }

    let mut updated = schedule.to_vec();
    let entry = &mut updated[index];
    entry.status = EntryStatus::Completed;
    entry.actual_time_spent = Some(time_spent);
    let entry = entry.clone();
    info!("completed entry {} (goal {}) in {} min", entry.id, entry.goal_id, time_spent);

    let Some(goal) = plan.find_goal(&entry.discipline_id, &entry.topic_id, &entry.goal_id) else {
        warn!(
            "goal {} no longer in plan {}, no review scheduled",
            entry.goal_id, plan.id
        );
        return Ok(Completion {
            schedule: updated,
            review: None,
        });
    };

    let current_step = entry.review_step.unwrap_or(0);
    let next = goal.active_review().and_then(|rc| rc.next_review(current_step));
    let Some(next) = next else {
        debug!("review chain for goal {} ends at step {}", goal.id, current_step);
        return Ok(Completion {
            schedule: updated,
            review: None,
        });
    };

    let date = today
        .checked_add_days(Days::new(next.interval_days as u64))
        .ok_or_else(|| PlannerError::InvalidInput(format!("review date out of range: {} + {}d", today, next.interval_days)))?;
    let review = PlanningEntry {
        id: ids.next_id(),
        goal_id: entry.goal_id.clone(),
        sub_goal_id: entry.sub_goal_id.clone(),
        topic_id: entry.topic_id.clone(),
        discipline_id: entry.discipline_id.clone(),
        date,
        duration_minutes: entry.duration_minutes,
        status: EntryStatus::Pending,
        is_review: true,
        review_step: Some(next.step),
        actual_time_spent: None,
    };
    info!(
        "review step {} for goal {} scheduled on {}",
        next.step, review.goal_id, review.date
    );
    updated.push(review.clone());

    Ok(Completion {
        schedule: updated,
        review: Some(review),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;
    use serde_json::json;

    fn config(intervals: &[u32], repeat_last: bool) -> ReviewConfig {
        ReviewConfig {
            enabled: true,
            intervals: intervals.to_vec(),
            repeat_last,
        }
    }

    fn plan(review: Option<ReviewConfig>) -> Plan {
        let mut plan: Plan = serde_json::from_value(json!({
            "id": "p", "name": "P",
            "disciplines": [{ "id": "d", "name": "D", "topics": [
                { "id": "t", "title": "T", "goals": [{ "id": "g", "type": "SUMMARY", "minutes": 40 }] }
            ]}],
            "cycles": [{ "id": "c", "items": [{ "type": "DISCIPLINE", "id": "d" }] }]
        }))
        .unwrap();
        plan.disciplines[0].topics[0].goals[0].review_config = review;
        plan
    }

    fn pending(id: &str) -> PlanningEntry {
        PlanningEntry {
            id: id.to_string(),
            goal_id: "g".to_string(),
            sub_goal_id: None,
            topic_id: "t".to_string(),
            discipline_id: "d".to_string(),
            date: day(1),
            duration_minutes: 40,
            status: EntryStatus::Pending,
            is_review: false,
            review_step: None,
            actual_time_spent: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_steps_repeat_last() {
        let rc = config(&[1, 7, 15, 30], true);
        let steps: Vec<(u32, u32)> = rc.steps_from(0).take(6).map(|s| (s.step, s.interval_days)).collect();
        assert_eq!(steps, vec![(1, 1), (2, 7), (3, 15), (4, 30), (4, 30), (4, 30)]);
    }

    #[test]
    fn test_steps_end_without_repeat() {
        let rc = config(&[2, 5], false);
        let steps: Vec<u32> = rc.steps_from(0).map(|s| s.interval_days).collect();
        assert_eq!(steps, vec![2, 5]);
        assert!(rc.next_review(2).is_none());
    }

    #[test]
    fn test_empty_intervals_never_chain() {
        assert!(config(&[], true).next_review(0).is_none());
        assert!(config(&[], false).next_review(0).is_none());
    }

    #[test]
    fn test_disabled_config_yields_nothing() {
        let mut rc = config(&[1, 2], true);
        rc.enabled = false;
        assert!(rc.next_review(0).is_none());
    }

    #[test]
    fn test_complete_schedules_first_review() {
        let ids = SequentialIds::new("r");
        let plan = plan(Some(ReviewConfig::standard()));
        let done = complete_entry(&[pending("e1")], "e1", 35, &plan, day(2), &ids).unwrap();

        assert_eq!(done.schedule.len(), 2);
        assert_eq!(done.schedule[0].status, EntryStatus::Completed);
        assert_eq!(done.schedule[0].actual_time_spent, Some(35));

        let review = done.review.unwrap();
        assert_eq!(review.id, "r-000001");
        assert!(review.is_review);
        assert_eq!(review.review_step, Some(1));
        assert_eq!(review.date, day(3));
        assert_eq!(review.duration_minutes, 40);
        assert_eq!(review.status, EntryStatus::Pending);
        assert_eq!(done.schedule[1], review);
    }

    #[test]
    fn test_complete_without_review_config() {
        let ids = SequentialIds::new("r");
        let done = complete_entry(&[pending("e1")], "e1", 10, &plan(None), day(2), &ids).unwrap();
        assert!(done.review.is_none());
        assert_eq!(done.schedule.len(), 1);
        assert!(done.schedule[0].is_completed());
    }

    #[test]
    fn test_complete_unknown_goal_still_completes() {
        let ids = SequentialIds::new("r");
        let mut entry = pending("e1");
        entry.goal_id = "gone".to_string();
        let done = complete_entry(&[entry], "e1", 10, &plan(Some(ReviewConfig::standard())), day(2), &ids).unwrap();
        assert!(done.review.is_none());
        assert!(done.schedule[0].is_completed());
    }

    #[test]
    fn test_complete_missing_entry() {
        let ids = SequentialIds::new("r");
        let err = complete_entry(&[pending("e1")], "nope", 10, &plan(None), day(2), &ids).unwrap_err();
        assert!(matches!(err, PlannerError::EntryNotFound(_)));
    }

    #[test]
    fn test_complete_twice_rejected() {
        let ids = SequentialIds::new("r");
        let plan = plan(None);
        let done = complete_entry(&[pending("e1")], "e1", 10, &plan, day(2), &ids).unwrap();
        let err = complete_entry(&done.schedule, "e1", 10, &plan, day(2), &ids).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput(_)));
    }

    #[test]
    fn test_chain_terminates() {
        let ids = SequentialIds::new("r");
        let plan = plan(Some(config(&[3], false)));
        let first = complete_entry(&[pending("e1")], "e1", 10, &plan, day(1), &ids).unwrap();
        let review = first.review.unwrap();
        assert_eq!(review.date, day(4));

        let second = complete_entry(&first.schedule, &review.id, 10, &plan, day(4), &ids).unwrap();
        assert!(second.review.is_none());
        assert_eq!(second.schedule.len(), 2);
    }
}
