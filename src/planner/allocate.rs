//! Capacity-constrained greedy allocation.
//!
//! Walks a cursor forward one calendar day at a time and fills each day's
//! spare minutes with the head of the work queue. A unit that does not fit is
//! split and its remainder carried to the next study day, except that a lesson
//! is never started partially when it would fit whole on a fresh day.
//!
//! Placement works in whole minutes: a unit's duration is rounded once when it
//! reaches the head of the queue, so sessions on a day never add up to more
//! than that day's capacity.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::flatten::WorkUnit;
use crate::domain::{EntryStatus, PlanningEntry, UserRoutine};
use crate::id::IdProvider;

/// Safety bounds for the allocation loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerLimits {
    /// Stop after this many generated entries
    pub max_entries: usize,
    /// Stop after this many consecutive days in which nothing was placed
    pub max_idle_days: u32,
}

impl Default for PlannerLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_idle_days: 3_660,
        }
    }
}

/// Everything the allocator needs besides the work queue
pub struct Allocator<'r> {
    /// Prefix of derived entry ids, normally the plan id
    pub scope: &'r str,
    pub routine: &'r UserRoutine,
    pub today: NaiveDate,
    pub limits: &'r PlannerLimits,
    pub ids: &'r dyn IdProvider,
}

impl Allocator<'_> {
    /// Place `units` on the calendar starting at `start`.
    ///
    /// `preserved` entries are not touched; their minutes count against the
    /// capacity of the day they sit on. Returns only the newly created entries,
    /// in creation order (which is chronological).
    pub fn allocate(&self, units: &[WorkUnit<'_>], start: NaiveDate, preserved: &[PlanningEntry]) -> Vec<PlanningEntry> {
        let mut booked: HashMap<NaiveDate, u32> = HashMap::new();
        for entry in preserved {
            let day = booked.entry(entry.date).or_insert(0);
            *day = day.saturating_add(entry.duration_minutes);
        }

        let profile = self.routine.profile;
        let mut out = Vec::new();
        let mut cursor = start;
        let mut index = 0;
        let mut piece = 0;
        let mut carry: Option<u32> = None;
        let mut idle_days = 0u32;

        while index < units.len() {
            if out.len() >= self.limits.max_entries {
                warn!(
                    "allocation stopped at {} entries, {} work units left unplaced",
                    out.len(),
                    units.len() - index
                );
                break;
            }
            if idle_days >= self.limits.max_idle_days {
                warn!(
                    "allocation stopped after {} days without placing anything, {} work units left unplaced",
                    idle_days,
                    units.len() - index
                );
                break;
            }

            let capacity = self.routine.capacity(cursor.weekday());
            let placed_before = out.len();
            let mut spent = booked.get(&cursor).copied().unwrap_or(0);

            while capacity > 0 && spent < capacity && index < units.len() {
                let unit = &units[index];
                let full = whole_minutes(unit.minutes(profile));
                if full == 0 {
                    index += 1;
                    carry = None;
                    continue;
                }

                let need = carry.unwrap_or(full);
                let remaining = capacity - spent;

                // Lesson that fits a whole day but not what is left of this one
                if unit.is_lesson() && carry.is_none() && full > remaining && full <= capacity {
                    debug!(
                        "deferring lesson {} ({} min) from {}: only {} min left",
                        unit.goal.id, full, cursor, remaining
                    );
                    break;
                }

                let session = need.min(remaining);
                out.push(self.entry(unit, index, piece, cursor, session));
                spent += session;

                let left = need - session;
                if left == 0 {
                    index += 1;
                    piece = 0;
                    carry = None;
                } else {
                    piece += 1;
                    carry = Some(left);
                }
            }

            if out.len() == placed_before {
                idle_days += 1;
            } else {
                idle_days = 0;
            }

            match cursor.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }

        debug!("allocated {} entries from {} work units", out.len(), units.len());
        out
    }

    /// Session `piece` of the unit at queue position `index`
    fn entry(&self, unit: &WorkUnit<'_>, index: usize, piece: u32, date: NaiveDate, minutes: u32) -> PlanningEntry {
        let status = if date < self.today {
            EntryStatus::Delayed
        } else {
            EntryStatus::Pending
        };
        PlanningEntry {
            id: self.ids.derived_id(&format!("{}:{}:{}:{}", self.scope, index, unit.work_id(), piece)),
            goal_id: unit.goal.id.clone(),
            sub_goal_id: unit.sub_goal.map(|s| s.id.clone()),
            topic_id: unit.topic_id.to_string(),
            discipline_id: unit.discipline_id.to_string(),
            date,
            duration_minutes: minutes,
            status,
            is_review: false,
            review_step: None,
            actual_time_spent: None,
        }
    }
}

/// Round to whole minutes; NaN and negatives become 0
fn whole_minutes(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
