use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{day::DayLedger, week::WeekArchive};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    CURRENT_SCHEMA_VERSION
}

/// The whole persisted journal document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub today: DayLedger,
    #[serde(rename = "weekHistory")]
    pub history: WeekArchive,
    /// Calendar date of the last successful save; the only rollover signal.
    #[serde(rename = "lastSavedDate")]
    pub last_persisted_date: NaiveDate,
}

impl AppState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            today: DayLedger::new(),
            history: WeekArchive::new(),
            last_persisted_date: today,
        }
    }
}
