//! Extension de vtconfig pour l'emploi du temps

use std::path::PathBuf;

/// Trait d'extension pour vtconfig::Config
pub trait ScheduleConfigExt {
    /// Chemin du document emploi du temps (`data.schedule_file`)
    fn schedule_file(&self) -> anyhow::Result<PathBuf>;
}

impl ScheduleConfigExt for vtconfig::Config {
    fn schedule_file(&self) -> anyhow::Result<PathBuf> {
        self.get_data_file("schedule_file", "schedule.json")
    }
}
