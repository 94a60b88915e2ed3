//! File-backed document store.
//!
//! Layout under the base directory:
//! - `plans/<plan_id>.yml` (or `.yaml` / `.json`): plan documents, read-only
//!   for the planner
//! - `routine.yml`: the user's routine
//! - `schedules/<plan_id>.json`: the plan's schedule, replaced wholesale on save

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::domain::{Plan, PlanningEntry, UserRoutine};
use crate::error::{PlannerError, Result};

const PLAN_EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];

#[derive(Debug, Clone)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open (creating if needed) a store at the given directory
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(base_path.join("plans"))?;
        fs::create_dir_all(base_path.join("schedules"))?;
        debug!("opened store at {}", base_path.display());
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn plan_path(&self, plan_id: &str, extension: &str) -> PathBuf {
        self.base_path.join("plans").join(format!("{}.{}", plan_id, extension))
    }

    fn schedule_path(&self, plan_id: &str) -> PathBuf {
        self.base_path.join("schedules").join(format!("{}.json", plan_id))
    }

    fn routine_path(&self) -> PathBuf {
        self.base_path.join("routine.yml")
    }

    /// Load a plan document, YAML or JSON
    pub fn load_plan(&self, plan_id: &str) -> Result<Plan> {
        for extension in PLAN_EXTENSIONS {
            let path = self.plan_path(plan_id, extension);
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            let plan: Plan = if extension == "json" {
                serde_json::from_str(&content)?
            } else {
                serde_yaml::from_str(&content)?
            };
            return Ok(plan);
        }
        Err(PlannerError::PlanNotFound(plan_id.to_string()))
    }

    /// Store a plan document as YAML under its own id
    pub fn save_plan(&self, plan: &Plan) -> Result<()> {
        if plan.id.is_empty() || plan.id.contains(['/', '\\']) {
            return Err(PlannerError::InvalidInput(format!("unusable plan id: {:?}", plan.id)));
        }
        let content = serde_yaml::to_string(plan)?;
        write_atomic(&self.plan_path(&plan.id, "yml"), content.as_bytes())?;
        info!("saved plan {}", plan.id);
        Ok(())
    }

    /// Ids of every stored plan, sorted
    pub fn list_plans(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for dir_entry in fs::read_dir(self.base_path.join("plans"))? {
            let path = dir_entry?.path();
            let known = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| PLAN_EXTENSIONS.contains(&e));
            if let (true, Some(stem)) = (known, path.file_stem().and_then(|s| s.to_str())) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// The stored routine, or an empty one when none was saved yet
    pub fn load_routine(&self) -> Result<UserRoutine> {
        let path = self.routine_path();
        if !path.exists() {
            return Ok(UserRoutine::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save_routine(&self, routine: &UserRoutine) -> Result<()> {
        let content = serde_yaml::to_string(routine)?;
        write_atomic(&self.routine_path(), content.as_bytes())
    }

    /// A plan's schedule; empty when none was generated yet
    pub fn load_schedule(&self, plan_id: &str) -> Result<Vec<PlanningEntry>> {
        let path = self.schedule_path(plan_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace a plan's schedule with `entries`
    pub fn save_schedule(&self, plan_id: &str, entries: &[PlanningEntry]) -> Result<()> {
        let content = serde_json::to_vec_pretty(entries)?;
        write_atomic(&self.schedule_path(plan_id), &content)?;
        debug!("saved {} entries for plan {}", entries.len(), plan_id);
        Ok(())
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(content)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path).map_err(|e| PlannerError::Storage(format!("replace {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryStatus, Profile};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn plan(id: &str) -> Plan {
        serde_json::from_value(serde_json::json!({ "id": id, "name": "Plan" })).unwrap()
    }

    fn entry(id: &str) -> PlanningEntry {
        PlanningEntry {
            id: id.to_string(),
            goal_id: "g".to_string(),
            sub_goal_id: None,
            topic_id: "t".to_string(),
            discipline_id: "d".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            duration_minutes: 60,
            status: EntryStatus::Pending,
            is_review: false,
            review_step: None,
            actual_time_spent: None,
        }
    }

    #[test]
    fn test_missing_plan() {
        let (store, _temp) = create_test_store();
        assert!(matches!(store.load_plan("nope"), Err(PlannerError::PlanNotFound(_))));
    }

    #[test]
    fn test_plan_save_and_load() {
        let (store, _temp) = create_test_store();
        store.save_plan(&plan("oab")).unwrap();
        assert_eq!(store.load_plan("oab").unwrap(), plan("oab"));
    }

    #[test]
    fn test_json_plan_document() {
        let (store, temp) = create_test_store();
        fs::write(temp.path().join("plans/tj.json"), r#"{ "id": "tj", "name": "TJ" }"#).unwrap();
        assert_eq!(store.load_plan("tj").unwrap().name, "TJ");
    }

    #[test]
    fn test_save_plan_rejects_path_ids() {
        let (store, _temp) = create_test_store();
        assert!(matches!(store.save_plan(&plan("../x")), Err(PlannerError::InvalidInput(_))));
    }

    #[test]
    fn test_list_plans() {
        let (store, temp) = create_test_store();
        store.save_plan(&plan("b")).unwrap();
        store.save_plan(&plan("a")).unwrap();
        fs::write(temp.path().join("plans/notes.txt"), "ignored").unwrap();
        assert_eq!(store.list_plans().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_routine_defaults_when_missing() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.load_routine().unwrap(), UserRoutine::default());
    }

    #[test]
    fn test_routine_roundtrip() {
        let (store, _temp) = create_test_store();
        let mut routine = UserRoutine::from_week([0, 60, 60, 60, 60, 60, 120], Profile::Intermediate);
        routine.selected_plan_id = Some("oab".to_string());
        store.save_routine(&routine).unwrap();
        assert_eq!(store.load_routine().unwrap(), routine);
    }

    #[test]
    fn test_schedule_replace_all() {
        let (store, _temp) = create_test_store();
        assert!(store.load_schedule("oab").unwrap().is_empty());

        store.save_schedule("oab", &[entry("1"), entry("2")]).unwrap();
        store.save_schedule("oab", &[entry("3")]).unwrap();

        let loaded = store.load_schedule("oab").unwrap();
        assert_eq!(loaded, vec![entry("3")]);
    }
}
