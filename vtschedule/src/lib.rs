//! # vtschedule - Emploi du temps affiché par les écrans
//!
//! Document JSON unique décrivant la journée (`school_start`, `school_end`
//! et une liste de créneaux). La lecture retourne la journée type quand le
//! document est absent ; le remplacement vérifie le format `HH:MM` et
//! l'ordre des heures avant d'écrire.
//!
//! ```no_run
//! use vtschedule::ScheduleService;
//!
//! # fn main() -> vtschedule::Result<()> {
//! let service = ScheduleService::new("data/schedule.json");
//! let schedule = service.get()?;
//! println!("{} blocks", schedule.blocks.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod schedule;
mod service;

#[cfg(feature = "vtconfig")]
mod config_ext;

#[cfg(feature = "vtserver")]
pub mod api;
#[cfg(feature = "vtserver")]
mod openapi;
#[cfg(feature = "vtserver")]
mod server_ext;

pub use error::{Error, Result};
pub use schedule::{Schedule, ScheduleBlock};
pub use service::ScheduleService;

#[cfg(feature = "vtconfig")]
pub use config_ext::ScheduleConfigExt;

#[cfg(feature = "vtserver")]
pub use openapi::ApiDoc;
#[cfg(feature = "vtserver")]
pub use server_ext::ScheduleApiExt;
