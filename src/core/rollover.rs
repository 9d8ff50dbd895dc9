//! Calendar policy deciding when "today" becomes history and when the week
//! archive is dropped.
//!
//! This is a weekday/weekend heuristic, not a business calendar: holidays,
//! timezone changes and clock adjustments are not modelled.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::AppState;

/// Idle days (strictly between the last save and today) tolerated on a
/// Monday before the archive is considered last week's.
pub const WEEKLY_RESET_IDLE_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The stored date is today; nothing happened.
    Unchanged,
    /// The finished business day was frozen into the archive.
    Archived(NaiveDate),
    /// The finished day fell on a weekend and was dropped.
    Discarded(NaiveDate),
    /// The archive already held this date; the newer ledger was dropped.
    AlreadyArchived(NaiveDate),
}

impl RolloverOutcome {
    pub fn rolled(self) -> bool {
        !matches!(self, RolloverOutcome::Unchanged)
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Moves the journal from `last_persisted_date` to `today` when they differ.
pub fn roll_over(state: &mut AppState, today: NaiveDate) -> RolloverOutcome {
    let previous = state.last_persisted_date;
    if previous == today {
        return RolloverOutcome::Unchanged;
    }

    let finished = std::mem::take(&mut state.today);
    let outcome = if !is_business_day(previous) {
        RolloverOutcome::Discarded(previous)
    } else if state.history.archive(previous, &finished) {
        RolloverOutcome::Archived(previous)
    } else {
        RolloverOutcome::AlreadyArchived(previous)
    };

    state.last_persisted_date = today;
    outcome
}

/// Calendar days strictly between the two dates (Friday to Monday is 2).
fn idle_days(last_saved: NaiveDate, today: NaiveDate) -> i64 {
    (today - last_saved).num_days() - 1
}

/// True on a Monday when the journal was last saved before the weekend that
/// just ended. A journal saved every Friday never trips it, so the archive
/// keeps growing across weeks until `reset` clears it.
pub fn weekly_reset_due(today: NaiveDate, last_saved: NaiveDate) -> bool {
    today.weekday() == Weekday::Mon
        && today != last_saved
        && idle_days(last_saved, today) > WEEKLY_RESET_IDLE_DAYS
}

/// Clears the week archive when the Monday rule fires. Returns whether it did.
pub fn apply_weekly_reset(state: &mut AppState, today: NaiveDate) -> bool {
    if weekly_reset_due(today, state.last_persisted_date) {
        state.history.clear();
        true
    } else {
        false
    }
}
