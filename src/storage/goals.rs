//! Goal repository backed by goals.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FintrackError;
use crate::models::{Goal, GoalId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    goals: Vec<Goal>,
}

pub struct GoalRepository {
    path: PathBuf,
    goals: RwLock<HashMap<GoalId, Goal>>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            goals: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: GoalData = read_json(&self.path)?;
        let mut goals = write_lock(&self.goals)?;

        goals.clear();
        for goal in file_data.goals {
            goals.insert(goal.id, goal);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        let goals = self.get_all()?;
        write_json_atomic(&self.path, &GoalData { goals })
    }

    pub fn get(&self, id: GoalId) -> Result<Option<Goal>, FintrackError> {
        Ok(read_lock(&self.goals)?.get(&id).cloned())
    }

    /// Open goals first, each group by nearest deadline
    pub fn get_all(&self) -> Result<Vec<Goal>, FintrackError> {
        let goals = read_lock(&self.goals)?;
        let mut list: Vec<_> = goals.values().cloned().collect();
        list.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then(a.deadline.cmp(&b.deadline))
                .then(a.name.cmp(&b.name))
        });
        Ok(list)
    }

    pub fn get_active(&self) -> Result<Vec<Goal>, FintrackError> {
        Ok(self.get_all()?.into_iter().filter(|g| !g.completed).collect())
    }

    /// Case-insensitive lookup
    pub fn get_by_name(&self, name: &str) -> Result<Option<Goal>, FintrackError> {
        let goals = read_lock(&self.goals)?;
        let wanted = name.trim().to_lowercase();
        Ok(goals
            .values()
            .find(|g| g.name.to_lowercase() == wanted)
            .cloned())
    }

    pub fn upsert(&self, goal: Goal) -> Result<(), FintrackError> {
        write_lock(&self.goals)?.insert(goal.id, goal);
        Ok(())
    }

    pub fn delete(&self, id: GoalId) -> Result<bool, FintrackError> {
        Ok(write_lock(&self.goals)?.remove(&id).is_some())
    }
}
