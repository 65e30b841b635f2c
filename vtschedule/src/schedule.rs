//! Modèle de l'emploi du temps et validation

use crate::{Error, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

const TIME_FORMAT: &str = "%H:%M";

/// Un créneau de la journée (cours, récréation, déjeuner...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "vtserver", derive(utoipa::ToSchema))]
pub struct ScheduleBlock {
    /// Heure de début `HH:MM`
    pub start_time: String,
    /// Heure de fin `HH:MM`
    pub end_time: String,
    pub name: String,
    /// Catégorie libre (`lesson`, `break`, `lunch`)
    #[serde(rename = "type")]
    pub kind: String,
}

impl ScheduleBlock {
    pub fn new(start: &str, end: &str, name: &str, kind: &str) -> Self {
        Self {
            start_time: start.to_string(),
            end_time: end.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Le document emploi du temps persisté
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "vtserver", derive(utoipa::ToSchema))]
pub struct Schedule {
    pub school_start: String,
    pub school_end: String,
    #[serde(default)]
    pub blocks: Vec<ScheduleBlock>,
}

impl Default for Schedule {
    /// Journée type : huit cours de 40 minutes
    fn default() -> Self {
        let blocks = [
            ("08:50", "09:30", "Ders 1", "lesson"),
            ("09:30", "09:40", "Teneffüs", "break"),
            ("09:40", "10:20", "Ders 2", "lesson"),
            ("10:20", "10:30", "Teneffüs", "break"),
            ("10:30", "11:10", "Ders 3", "lesson"),
            ("11:10", "11:20", "Teneffüs", "break"),
            ("11:20", "12:00", "Ders 4", "lesson"),
            ("12:00", "12:45", "Öğle Arası", "lunch"),
            ("12:45", "13:25", "Ders 5", "lesson"),
            ("13:25", "13:35", "Teneffüs", "break"),
            ("13:35", "14:15", "Ders 6", "lesson"),
            ("14:15", "14:25", "Teneffüs", "break"),
            ("14:25", "15:05", "Ders 7", "lesson"),
            ("15:05", "15:15", "Teneffüs", "break"),
            ("15:15", "15:55", "Ders 8", "lesson"),
        ]
        .into_iter()
        .map(|(start, end, name, kind)| ScheduleBlock::new(start, end, name, kind))
        .collect();

        Self {
            school_start: "08:50".to_string(),
            school_end: "15:55".to_string(),
            blocks,
        }
    }
}

impl Schedule {
    /// Vérifie le format des heures et l'ordre début < fin
    pub fn validate(&self) -> Result<()> {
        let start = parse_time("school_start", &self.school_start)?;
        let end = parse_time("school_end", &self.school_end)?;
        if start >= end {
            return Err(Error::InvalidSchedule(
                "school_start must be before school_end.".to_string(),
            ));
        }

        for (index, block) in self.blocks.iter().enumerate() {
            let at = |field: &str| format!("Block {} {}", index, field);
            let start = parse_time(&at("start_time"), &block.start_time)?;
            let end = parse_time(&at("end_time"), &block.end_time)?;
            if start >= end {
                return Err(Error::InvalidSchedule(format!(
                    "Block {} must start before it ends.",
                    index
                )));
            }
            if block.name.trim().is_empty() {
                return Err(Error::InvalidSchedule(format!(
                    "Block {} must have a name.",
                    index
                )));
            }
        }

        Ok(())
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    // chrono accepte "8:50" ; le format attendu est strictement HH:MM
    if value.len() != 5 {
        return Err(invalid_time(field, value));
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid_time(field, value))
}

fn invalid_time(field: &str, value: &str) -> Error {
    Error::InvalidSchedule(format!("{} has invalid time '{}'. Must be HH:MM.", field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_valid() {
        let schedule = Schedule::default();
        assert_eq!(schedule.blocks.len(), 15);
        schedule.validate().unwrap();
    }

    #[test]
    fn time_format_is_strict() {
        assert!(parse_time("t", "08:50").is_ok());
        assert!(parse_time("t", "8:50").is_err());
        assert!(parse_time("t", "24:00").is_err());
        assert!(parse_time("t", "08h50").is_err());
    }
}
