use std::sync::{Arc, RwLock};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the local wall-clock time used for rollover and order stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock shared between clones; lets callers walk a journal across days.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Starts at 09:00 on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let opening = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
        Self::new(date.and_time(opening))
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.write() {
            *guard = now;
        }
    }

    pub fn set_date(&self, date: NaiveDate) {
        let time = self.now().time();
        self.set(date.and_time(time));
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}
