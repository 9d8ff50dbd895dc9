use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::day::DayLedger;

/// Frozen snapshots of finished business days, keyed by calendar date.
///
/// Entries are only ever inserted or dropped wholesale; an archived day is
/// never edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeekArchive {
    days: BTreeMap<NaiveDate, DayLedger>,
}

impl WeekArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a copy of `day` under `date`. Returns `false` and keeps the
    /// existing snapshot when the date is already archived.
    pub fn archive(&mut self, date: NaiveDate, day: &DayLedger) -> bool {
        if self.days.contains_key(&date) {
            return false;
        }
        self.days.insert(date, day.clone());
        true
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayLedger> {
        self.days.get(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Archived days in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &DayLedger)> {
        self.days.iter().map(|(date, day)| (*date, day))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}
