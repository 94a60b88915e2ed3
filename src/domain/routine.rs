//! The user's weekly study routine

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Reading-speed profile; faster profiles need fewer minutes per page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profile {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Beginner => write!(f, "beginner"),
            Profile::Intermediate => write!(f, "intermediate"),
            Profile::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRoutine {
    /// Minutes available per weekday, 0 = Sunday .. 6 = Saturday
    pub days: BTreeMap<u8, u32>,
    pub profile: Profile,
    pub selected_plan_id: Option<String>,
    /// A paused routine keeps its history but gets no new work placed
    pub is_paused: bool,
}

impl UserRoutine {
    /// Build a routine from a Sunday-first list of daily minutes
    pub fn from_week(minutes: [u32; 7], profile: Profile) -> Self {
        Self {
            days: (0u8..).zip(minutes).collect(),
            profile,
            ..Self::default()
        }
    }

    /// Minutes available on a weekday (missing days count as 0)
    pub fn capacity(&self, weekday: Weekday) -> u32 {
        let index = weekday.num_days_from_sunday() as u8;
        self.days.get(&index).copied().unwrap_or(0)
    }

    pub fn weekly_total(&self) -> u32 {
        self.days.values().sum()
    }

    pub fn set_day(&mut self, weekday: u8, minutes: u32) -> Result<()> {
        if weekday > 6 {
            return Err(PlannerError::InvalidInput(format!(
                "weekday must be 0 (Sunday) to 6 (Saturday), got {}",
                weekday
            )));
        }
        self.days.insert(weekday, minutes);
        Ok(())
    }
}
