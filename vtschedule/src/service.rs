//! Lecture et remplacement de l'emploi du temps

use crate::schedule::Schedule;
use crate::{Error, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use vtstore::{JsonStore, Loaded};

/// Accès au document emploi du temps
#[derive(Debug, Clone)]
pub struct ScheduleService {
    store: JsonStore<Schedule>,
}

impl ScheduleService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }

    /// Document persisté, ou la journée type s'il est absent ou corrompu
    pub fn get(&self) -> Result<Schedule> {
        Ok(self.store.load_or_else(Schedule::default)?)
    }

    /// Persiste la journée type si aucun document n'existe encore
    pub fn ensure_default(&self) -> Result<Schedule> {
        let locked = self.store.lock();
        match locked.read()? {
            Loaded::Found(schedule) => Ok(schedule),
            Loaded::Missing | Loaded::Malformed(_) => {
                let schedule = Schedule::default();
                locked.save(&schedule)?;
                info!(path = %self.store.path().display(), "Default schedule written");
                Ok(schedule)
            }
        }
    }

    /// Remplace l'emploi du temps à partir d'un JSON brut
    pub fn apply_update(&self, payload: &Value) -> Result<Schedule> {
        let schedule: Schedule = serde_json::from_value(payload.clone())
            .map_err(|e| Error::InvalidSchedule(format!("Invalid schedule format: {}", e)))?;
        self.set(schedule)
    }

    /// Remplace l'emploi du temps après validation
    pub fn set(&self, schedule: Schedule) -> Result<Schedule> {
        schedule.validate()?;
        self.store.save(&schedule)?;
        info!(blocks = schedule.blocks.len(), "Schedule updated");
        Ok(schedule)
    }
}
