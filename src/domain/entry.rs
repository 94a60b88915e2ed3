//! Scheduled study sessions

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::calendar_day;

/// One scheduled session on the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningEntry {
    pub id: String,
    pub goal_id: String,
    /// Set for lesson sessions of a class goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_goal_id: Option<String>,
    pub topic_id: String,
    pub discipline_id: String,
    #[serde(deserialize_with = "deserialize_calendar_day")]
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub status: EntryStatus,
    #[serde(default)]
    pub is_review: bool,
    /// Position in the review chain, starting at 1; absent on first-pass sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time_spent: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    /// Pending but placed on a day already in the past
    Delayed,
    Completed,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "pending"),
            EntryStatus::Delayed => write!(f, "delayed"),
            EntryStatus::Completed => write!(f, "completed"),
        }
    }
}

impl PlanningEntry {
    pub fn is_completed(&self) -> bool {
        self.status == EntryStatus::Completed
    }

    /// Historic entries survive regeneration: completed work, and reviews that
    /// are either done or still ahead of `today`.
    pub fn is_historic(&self, today: NaiveDate) -> bool {
        self.is_completed() || (self.is_review && self.date >= today)
    }

    /// Id of the unit of work this session belongs to (sub-goal for lessons)
    pub fn work_id(&self) -> &str {
        self.sub_goal_id.as_deref().unwrap_or(&self.goal_id)
    }
}

/// Accept either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp,
/// truncated to its calendar day.
fn deserialize_calendar_day<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(day) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| calendar_day(&ts))
        .map_err(serde::de::Error::custom)
}
