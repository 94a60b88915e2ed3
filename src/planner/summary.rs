//! Read-side views over a schedule: one day's summary and the calendar.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::PlanningEntry;

/// What a single study day looks like
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary<'a> {
    pub date: NaiveDate,
    pub entries: Vec<&'a PlanningEntry>,
    pub completed: usize,
    pub planned_minutes: u32,
    /// Sum of actual time spent on completed sessions
    pub spent_minutes: u32,
}

impl DailySummary<'_> {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn is_done(&self) -> bool {
        !self.entries.is_empty() && self.completed == self.entries.len()
    }
}

pub fn daily_summary(schedule: &[PlanningEntry], date: NaiveDate) -> DailySummary<'_> {
    let entries: Vec<&PlanningEntry> = schedule.iter().filter(|e| e.date == date).collect();
    let completed: Vec<&&PlanningEntry> = entries.iter().filter(|e| e.is_completed()).collect();
    DailySummary {
        date,
        completed: completed.len(),
        planned_minutes: entries.iter().map(|e| e.duration_minutes).sum(),
        spent_minutes: completed.iter().filter_map(|e| e.actual_time_spent).sum(),
        entries,
    }
}

/// Entries grouped by day, days ascending
pub fn group_by_date(schedule: &[PlanningEntry]) -> BTreeMap<NaiveDate, Vec<&PlanningEntry>> {
    let mut days: BTreeMap<NaiveDate, Vec<&PlanningEntry>> = BTreeMap::new();
    for entry in schedule {
        days.entry(entry.date).or_default().push(entry);
    }
    days
}

/// `HH:MM` rendering of a minute count
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
