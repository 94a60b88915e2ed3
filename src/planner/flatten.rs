//! Curriculum flattening.
//!
//! Turns a plan's cycles into one deterministic sequence of work units. Two
//! traversal strategies exist:
//! - Continuous: each cycle's disciplines are finished end-to-end before the
//!   next cycle starts.
//! - Rotating: repeated rounds over all cycles, taking `topics_per_discipline`
//!   topics from each referenced discipline per round, until nothing is left.
//!
//! Class goals are expanded into one unit per lesson. Work already completed is
//! left out.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::duration::{goal_minutes, sub_goal_minutes};
use super::history::CompletedWork;
use crate::domain::{Cycle, CycleItem, CycleSystem, Goal, GoalKind, Plan, Profile, SubGoal};

/// A goal together with where it sits in the curriculum
#[derive(Debug, Clone, Copy)]
pub struct PlacedGoal<'a> {
    pub goal: &'a Goal,
    pub topic_id: &'a str,
    pub discipline_id: &'a str,
}

/// The atomic schedulable item: a goal, or one lesson of a class goal
#[derive(Debug, Clone, Copy)]
pub struct WorkUnit<'a> {
    pub goal: &'a Goal,
    pub sub_goal: Option<&'a SubGoal>,
    pub topic_id: &'a str,
    pub discipline_id: &'a str,
}

impl WorkUnit<'_> {
    /// Lessons are protected from fragmentation by the allocator
    pub fn is_lesson(&self) -> bool {
        self.sub_goal.is_some()
    }

    /// Sub-goal id for lessons, goal id otherwise
    pub fn work_id(&self) -> &str {
        self.sub_goal.map_or(self.goal.id.as_str(), |s| s.id.as_str())
    }

    pub fn minutes(&self, profile: Profile) -> f64 {
        match self.sub_goal {
            Some(sub) => sub_goal_minutes(sub),
            None => goal_minutes(self.goal, profile),
        }
    }
}

/// Consumed-topic count per discipline, threaded through rotating rounds
type TopicOffsets<'a> = HashMap<&'a str, usize>;

/// Discipline ids referenced by a cycle, folders expanded, duplicates removed
pub fn cycle_discipline_ids<'a>(plan: &'a Plan, cycle: &'a Cycle) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for item in &cycle.items {
        let expanded: Vec<&str> = match item {
            CycleItem::Discipline { id } => vec![id.as_str()],
            CycleItem::Folder { id } => plan.folder_disciplines(id).into_iter().map(|d| d.id.as_str()).collect(),
        };
        for id in expanded {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Goal order for the plan's cycle system
pub fn ordered_goals(plan: &Plan) -> Vec<PlacedGoal<'_>> {
    match plan.cycle_system {
        CycleSystem::Continuous => continuous_order(plan),
        CycleSystem::Rotating => rotating_order(plan),
    }
}

fn continuous_order(plan: &Plan) -> Vec<PlacedGoal<'_>> {
    let mut out = Vec::new();
    for cycle in plan.sorted_cycles() {
        for discipline_id in cycle_discipline_ids(plan, cycle) {
            let Some(discipline) = plan.discipline(discipline_id) else {
                continue;
            };
            for topic in discipline.sorted_topics() {
                for goal in topic.sorted_goals() {
                    out.push(PlacedGoal {
                        goal,
                        topic_id: &topic.id,
                        discipline_id: &discipline.id,
                    });
                }
            }
        }
    }
    out
}

fn rotating_order(plan: &Plan) -> Vec<PlacedGoal<'_>> {
    let cycles = plan.sorted_cycles();
    let mut out = Vec::new();
    let mut offsets = TopicOffsets::new();
    let mut rounds = 0;

    loop {
        let (batch, next, progressed) = rotating_round(plan, &cycles, offsets);
        if !progressed {
            break;
        }
        rounds += 1;
        out.extend(batch);
        offsets = next;
    }

    debug!("rotating traversal finished after {} rounds", rounds);
    out
}

/// One round over every cycle. Returns the emitted goals, the advanced offsets
/// and whether any discipline still had topics to give.
fn rotating_round<'a>(
    plan: &'a Plan,
    cycles: &[&'a Cycle],
    mut offsets: TopicOffsets<'a>,
) -> (Vec<PlacedGoal<'a>>, TopicOffsets<'a>, bool) {
    let mut batch = Vec::new();
    let mut progressed = false;

    for &cycle in cycles {
        let chunk = cycle.topics_per_discipline.max(1);
        for discipline_id in cycle_discipline_ids(plan, cycle) {
            let Some(discipline) = plan.discipline(discipline_id) else {
                continue;
            };
            let start = offsets.get(discipline.id.as_str()).copied().unwrap_or(0);
            let topics: Vec<_> = discipline.sorted_topics().into_iter().skip(start).take(chunk).collect();
            if topics.is_empty() {
                continue;
            }

            progressed = true;
            offsets.insert(discipline.id.as_str(), start + topics.len());
            for topic in topics {
                for goal in topic.sorted_goals() {
                    batch.push(PlacedGoal {
                        goal,
                        topic_id: &topic.id,
                        discipline_id: &discipline.id,
                    });
                }
            }
        }
    }

    (batch, offsets, progressed)
}

/// Expand class goals into lessons and drop completed work
pub fn expand_work_units<'a>(goals: &[PlacedGoal<'a>], completed: &CompletedWork) -> Vec<WorkUnit<'a>> {
    let mut units = Vec::new();
    for placed in goals {
        if placed.goal.kind == GoalKind::Class {
            for sub in placed.goal.sorted_sub_goals() {
                if completed.contains_sub_goal(&sub.id) {
                    continue;
                }
                units.push(WorkUnit {
                    goal: placed.goal,
                    sub_goal: Some(sub),
                    topic_id: placed.topic_id,
                    discipline_id: placed.discipline_id,
                });
            }
        } else if !completed.contains_goal(&placed.goal.id) {
            units.push(WorkUnit {
                goal: placed.goal,
                sub_goal: None,
                topic_id: placed.topic_id,
                discipline_id: placed.discipline_id,
            });
        }
    }
    units
}

/// Full flattening: ordered goals, lessons expanded, completed work removed
pub fn flatten<'a>(plan: &'a Plan, completed: &CompletedWork) -> Vec<WorkUnit<'a>> {
    let goals = ordered_goals(plan);
    let units = expand_work_units(&goals, completed);
    debug!(
        "flattened plan {}: {} goals -> {} work units",
        plan.id,
        goals.len(),
        units.len()
    );
    units
}
