//! Curriculum documents: plans, disciplines, topics, goals and cycles
//!
//! Plans are authored elsewhere and are read-only inputs to the planner.
//! Field names follow the camelCase document format the plans are stored in.

use serde::{Deserialize, Serialize};

/// A named curriculum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub cycles: Vec<Cycle>,
    #[serde(default)]
    pub cycle_system: CycleSystem,
}

/// How cycles are traversed when flattening the curriculum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleSystem {
    /// Finish each cycle's content before moving on to the next
    #[default]
    Continuous,
    /// Round-robin fixed-size topic chunks across cycles
    Rotating,
}

/// Pure grouping of disciplines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

/// The five kinds of required work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalKind {
    /// Recorded lessons, split into sub-goals
    Class,
    /// Material reading, page based
    Material,
    /// Practice questions, page based
    Questions,
    /// Statute reading, page based with a repetition multiplier
    LeiSeca,
    /// Summary writing, fixed minutes
    Summary,
}

impl GoalKind {
    pub fn is_page_based(&self) -> bool {
        matches!(self, GoalKind::Material | GoalKind::Questions | GoalKind::LeiSeca)
    }
}

impl std::fmt::Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalKind::Class => write!(f, "class"),
            GoalKind::Material => write!(f, "material"),
            GoalKind::Questions => write!(f, "questions"),
            GoalKind::LeiSeca => write!(f, "lei-seca"),
            GoalKind::Summary => write!(f, "summary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: i64,
    /// Page count for page-based kinds
    #[serde(default)]
    pub pages: Option<f64>,
    /// Fixed minutes for summaries
    #[serde(default)]
    pub minutes: Option<f64>,
    /// Repeated-reading factor, statute reading only
    #[serde(default)]
    pub multiplier: Option<f64>,
    /// Individual lessons, class goals only
    #[serde(default)]
    pub sub_goals: Vec<SubGoal>,
    #[serde(default)]
    pub review_config: Option<ReviewConfig>,
}

/// One lesson inside a class goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGoal {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub minutes: f64,
}

/// Spaced-repetition settings for a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Days between completion and the next review, by step
    #[serde(default)]
    pub intervals: Vec<u32>,
    /// Keep repeating the last interval once the list is exhausted
    #[serde(default)]
    pub repeat_last: bool,
}

impl ReviewConfig {
    /// The usual 1/7/15/30 day ladder, repeating monthly afterwards
    pub fn standard() -> Self {
        Self {
            enabled: true,
            intervals: vec![1, 7, 15, 30],
            repeat_last: true,
        }
    }

    /// Parse intervals typed by a user, e.g. `"1, 7, 15, 30"`.
    ///
    /// Anything that is not a positive whole number of days is dropped.
    pub fn parse_intervals(text: &str) -> Vec<u32> {
        text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter_map(|part| part.trim().parse::<u32>().ok())
            .filter(|days| *days > 0)
            .collect()
    }
}

/// Ordered curriculum block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub items: Vec<CycleItem>,
    /// Topics taken from each discipline per round (rotating only)
    #[serde(default = "default_topics_per_discipline")]
    pub topics_per_discipline: usize,
}

fn default_topics_per_discipline() -> usize {
    1
}

/// Reference from a cycle to a discipline or a whole folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleItem {
    Discipline { id: String },
    Folder { id: String },
}

impl Plan {
    pub fn discipline(&self, id: &str) -> Option<&Discipline> {
        self.disciplines.iter().find(|d| d.id == id)
    }

    /// Disciplines of a folder, by `order`
    pub fn folder_disciplines(&self, folder_id: &str) -> Vec<&Discipline> {
        let mut found: Vec<&Discipline> = self
            .disciplines
            .iter()
            .filter(|d| d.folder_id.as_deref() == Some(folder_id))
            .collect();
        found.sort_by_key(|d| d.order);
        found
    }

    /// Cycles by `order`
    pub fn sorted_cycles(&self) -> Vec<&Cycle> {
        let mut cycles: Vec<&Cycle> = self.cycles.iter().collect();
        cycles.sort_by_key(|c| c.order);
        cycles
    }

    /// Locate a goal through its discipline and topic, the way an entry references it
    pub fn find_goal(&self, discipline_id: &str, topic_id: &str, goal_id: &str) -> Option<&Goal> {
        self.discipline(discipline_id)?
            .topics
            .iter()
            .find(|t| t.id == topic_id)?
            .goals
            .iter()
            .find(|g| g.id == goal_id)
    }
}

impl Discipline {
    pub fn sorted_topics(&self) -> Vec<&Topic> {
        let mut topics: Vec<&Topic> = self.topics.iter().collect();
        topics.sort_by_key(|t| t.order);
        topics
    }
}

impl Topic {
    pub fn sorted_goals(&self) -> Vec<&Goal> {
        let mut goals: Vec<&Goal> = self.goals.iter().collect();
        goals.sort_by_key(|g| g.order);
        goals
    }
}

impl Goal {
    pub fn sorted_sub_goals(&self) -> Vec<&SubGoal> {
        let mut subs: Vec<&SubGoal> = self.sub_goals.iter().collect();
        subs.sort_by_key(|s| s.order);
        subs
    }

    /// Review settings, but only when reviews are switched on
    pub fn active_review(&self) -> Option<&ReviewConfig> {
        self.review_config.as_ref().filter(|rc| rc.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Tribunais",
            "cycleSystem": "ROTATING",
            "folders": [{ "id": "f1", "name": "Direito" }],
            "disciplines": [
                { "id": "d2", "name": "Penal", "order": 2, "folderId": "f1", "topics": [] },
                { "id": "d1", "name": "Civil", "order": 1, "folderId": "f1", "topics": [
                    { "id": "t2", "title": "Contratos", "order": 2, "goals": [] },
                    { "id": "t1", "title": "Pessoas", "order": 1, "goals": [
                        { "id": "g1", "type": "LEI_SECA", "pages": 12, "multiplier": 2, "order": 1 },
                        { "id": "g0", "type": "CLASS", "order": 0, "subGoals": [
                            { "id": "s2", "minutes": 20, "order": 2 },
                            { "id": "s1", "minutes": 50, "order": 1 }
                        ]}
                    ]}
                ]},
                { "id": "d3", "name": "Português", "order": 0 }
            ],
            "cycles": [
                { "id": "c1", "order": 1, "items": [
                    { "type": "FOLDER", "id": "f1" },
                    { "type": "DISCIPLINE", "id": "d3" }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_plan_document_parses() {
        let plan = sample_plan();
        assert_eq!(plan.cycle_system, CycleSystem::Rotating);
        assert_eq!(plan.cycles[0].topics_per_discipline, 1);
        assert_eq!(
            plan.cycles[0].items[0],
            CycleItem::Folder { id: "f1".to_string() }
        );
        let goal = plan.find_goal("d1", "t1", "g1").unwrap();
        assert_eq!(goal.kind, GoalKind::LeiSeca);
        assert_eq!(goal.multiplier, Some(2.0));
        assert!(goal.review_config.is_none());
    }

    #[test]
    fn test_folder_disciplines_sorted_by_order() {
        let plan = sample_plan();
        let ids: Vec<&str> = plan.folder_disciplines("f1").iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }

    #[test]
    fn test_sorted_children() {
        let plan = sample_plan();
        let civil = plan.discipline("d1").unwrap();
        let topics: Vec<&str> = civil.sorted_topics().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(topics, vec!["t1", "t2"]);

        let goals: Vec<&str> = civil.topics[1].sorted_goals().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(goals, vec!["g0", "g1"]);

        let class = plan.find_goal("d1", "t1", "g0").unwrap();
        let subs: Vec<&str> = class.sorted_sub_goals().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(subs, vec!["s1", "s2"]);
    }

    #[test]
    fn test_find_goal_missing() {
        let plan = sample_plan();
        assert!(plan.find_goal("d1", "t1", "nope").is_none());
        assert!(plan.find_goal("d9", "t1", "g1").is_none());
    }

    #[test]
    fn test_parse_intervals_filters_garbage() {
        assert_eq!(ReviewConfig::parse_intervals("1, 7, 15, 30"), vec![1, 7, 15, 30]);
        assert_eq!(ReviewConfig::parse_intervals("1,abc, 0,-3, 9"), vec![1, 9]);
        assert!(ReviewConfig::parse_intervals("  ,, ").is_empty());
    }

    #[test]
    fn test_active_review_requires_enabled() {
        let mut goal: Goal = serde_json::from_value(serde_json::json!({
            "id": "g", "type": "SUMMARY", "minutes": 30,
            "reviewConfig": { "enabled": false, "intervals": [1], "repeatLast": false }
        }))
        .unwrap();
        assert!(goal.active_review().is_none());

        goal.review_config = Some(ReviewConfig::standard());
        assert_eq!(goal.active_review().unwrap().intervals, vec![1, 7, 15, 30]);
    }

    #[test]
    fn test_page_based_kinds() {
        assert!(GoalKind::Material.is_page_based());
        assert!(GoalKind::LeiSeca.is_page_based());
        assert!(!GoalKind::Class.is_page_based());
        assert!(!GoalKind::Summary.is_page_based());
    }
}
