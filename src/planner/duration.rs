//! Minutes required per goal.
//!
//! - Class: sum of its lessons' minutes
//! - Summary: fixed minutes
//! - Material / Questions / Lei seca: pages x minutes-per-page for the profile,
//!   lei seca additionally x multiplier

use crate::domain::{Goal, GoalKind, Profile, SubGoal};

/// Minutes per page for a page-based kind and reading profile.
/// Non page-based kinds read at a flat 1 minute per page.
pub fn minutes_per_page(kind: GoalKind, profile: Profile) -> f64 {
    if !kind.is_page_based() {
        return 1.0;
    }
    let reading = match profile {
        Profile::Beginner => 5.0,
        Profile::Intermediate => 3.0,
        Profile::Advanced => 1.0,
    };
    // Questions take twice as long as reading
    if kind == GoalKind::Questions { reading * 2.0 } else { reading }
}

/// Total minutes needed to finish a goal
pub fn goal_minutes(goal: &Goal, profile: Profile) -> f64 {
    let minutes = match goal.kind {
        GoalKind::Class => goal.sub_goals.iter().map(sub_goal_minutes).sum::<f64>(),
        GoalKind::Summary => goal.minutes.unwrap_or(0.0),
        GoalKind::Material | GoalKind::Questions => {
            goal.pages.unwrap_or(0.0) * minutes_per_page(goal.kind, profile)
        }
        GoalKind::LeiSeca => {
            goal.pages.unwrap_or(0.0)
                * minutes_per_page(goal.kind, profile)
                * goal.multiplier.unwrap_or(1.0)
        }
    };
    // NaN or negative input never produces negative work
    if minutes.is_finite() { minutes.max(0.0) } else { 0.0 }
}

pub fn sub_goal_minutes(sub: &SubGoal) -> f64 {
    if sub.minutes.is_finite() { sub.minutes.max(0.0) } else { 0.0 }
}
