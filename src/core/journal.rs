//! The journal session: one in-memory state, one store, one clock.

use chrono::NaiveDate;

use crate::core::clock::Clock;
use crate::core::rollover::{apply_weekly_reset, roll_over, RolloverOutcome};
use crate::core::split::{compute_day_totals, DayTotals};
use crate::domain::{
    AppState, BonusPercent, DayLedger, Master, Order, OrderId, PaymentMethod, WeekArchive,
    CURRENT_SCHEMA_VERSION,
};
use crate::errors::{JournalError, Result};
use crate::storage::{BackupInfo, StateStore};

/// Facade that owns the journal state and keeps it in step with the calendar
/// and the store.
///
/// Every mutation is persisted immediately. When the store fails, the error
/// is returned but the in-memory change stays, so the next successful save
/// writes it out.
pub struct Journal {
    state: AppState,
    store: Box<dyn StateStore>,
    clock: Box<dyn Clock>,
}

impl Journal {
    /// Loads the stored document (or starts fresh), applies the Monday reset
    /// and the day rollover, then saves.
    pub fn open(store: Box<dyn StateStore>, clock: Box<dyn Clock>) -> Result<Self> {
        let today = clock.today();
        let state = match store.load()? {
            Some(state) => state,
            None => {
                tracing::info!(store = %store.describe(), "no stored journal, starting fresh");
                AppState::fresh(today)
            }
        };
        let mut journal = Self {
            state,
            store,
            clock,
        };
        journal.adopt(today)?;
        Ok(journal)
    }

    fn adopt(&mut self, today: NaiveDate) -> Result<()> {
        ensure_schema_support(&self.state)?;
        if apply_weekly_reset(&mut self.state, today) {
            tracing::info!(
                last_saved = %self.state.last_persisted_date,
                %today,
                "new week started, archive cleared"
            );
        }
        let outcome = roll_over(&mut self.state, today);
        log_rollover(outcome, today);
        self.persist()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn today(&self) -> &DayLedger {
        &self.state.today
    }

    pub fn history(&self) -> &WeekArchive {
        &self.state.history
    }

    /// The business date the current ledger belongs to.
    pub fn current_date(&self) -> NaiveDate {
        self.state.last_persisted_date
    }

    pub fn store_location(&self) -> String {
        self.store.describe()
    }

    pub fn add_order(
        &mut self,
        master: Master,
        amount: f64,
        payment: PaymentMethod,
        vehicle: Option<&str>,
    ) -> Result<OrderId> {
        let order = Order::new(amount, payment, vehicle, self.clock.now())?;
        self.roll_in_memory();
        let id = self.state.today.add_order(master, order);
        tracing::debug!(%master, amount, %payment, order = %id, "order added");
        self.persist()?;
        Ok(id)
    }

    /// Removes the order at zero-based `index` of the master's listing.
    pub fn remove_order(&mut self, master: Master, index: usize) -> Result<Order> {
        let rolled = self.roll_in_memory().rolled();
        let removed = match self.state.today.remove_order(master, index) {
            Ok(removed) => removed,
            Err(err) => {
                if rolled {
                    self.persist()?;
                }
                return Err(err);
            }
        };
        tracing::debug!(%master, index, order = %removed.id, "order removed");
        self.persist()?;
        Ok(removed)
    }

    pub fn set_bonus(&mut self, master: Master, percent: i64) -> Result<BonusPercent> {
        let bonus = BonusPercent::new(percent)?;
        self.roll_in_memory();
        self.state.today.set_bonus(master, bonus);
        tracing::debug!(%master, %bonus, "bonus updated");
        self.persist()?;
        Ok(bonus)
    }

    pub fn day_totals(&self) -> DayTotals {
        compute_day_totals(&self.state.today)
    }

    /// Totals of every archived day, oldest first.
    pub fn history_totals(&self) -> Vec<(NaiveDate, DayTotals)> {
        self.state
            .history
            .iter()
            .map(|(date, day)| (date, compute_day_totals(day)))
            .collect()
    }

    /// Rolls the journal over if the calendar date moved since the last save.
    pub fn sync(&mut self) -> Result<RolloverOutcome> {
        let outcome = self.roll_in_memory();
        if outcome.rolled() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Applies the rollover without saving; mutators save once afterwards so
    /// a failed write never drops the change that triggered it.
    fn roll_in_memory(&mut self) -> RolloverOutcome {
        let today = self.clock.today();
        let outcome = roll_over(&mut self.state, today);
        log_rollover(outcome, today);
        outcome
    }

    /// Wipes today and the archive after backing up the stored document.
    pub fn reset_all(&mut self) -> Result<Option<BackupInfo>> {
        let backup = self.store.backup(Some("before-reset"))?;
        self.state = AppState::fresh(self.clock.today());
        tracing::info!(
            backup = backup.as_ref().map(|info| info.name.as_str()).unwrap_or("none"),
            "journal reset"
        );
        self.persist()?;
        Ok(backup)
    }

    pub fn backups(&self) -> Result<Vec<BackupInfo>> {
        self.store.list_backups()
    }

    /// Replaces the session with a stored backup, then applies the same
    /// calendar policy as [`Journal::open`].
    pub fn restore_backup(&mut self, name: &str) -> Result<()> {
        let restored = self.store.restore_backup(name)?;
        tracing::info!(backup = name, date = %restored.last_persisted_date, "backup restored");
        self.state = restored;
        let today = self.clock.today();
        self.adopt(today)
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.state).map_err(|err| {
            tracing::warn!(store = %self.store.describe(), error = %err, "journal not saved");
            err
        })
    }
}

fn ensure_schema_support(state: &AppState) -> Result<()> {
    if state.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(JournalError::Persistence(format!(
            "journal schema {} is newer than supported {}",
            state.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}

fn log_rollover(outcome: RolloverOutcome, today: NaiveDate) {
    match outcome {
        RolloverOutcome::Unchanged => {}
        RolloverOutcome::Archived(date) => {
            tracing::info!(%date, %today, "day archived")
        }
        RolloverOutcome::Discarded(date) => {
            tracing::info!(%date, %today, "weekend day discarded")
        }
        RolloverOutcome::AlreadyArchived(date) => {
            tracing::warn!(%date, %today, "day already archived, keeping the earlier snapshot")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::storage::MemoryStateStore;
    use chrono::Duration;

    // 2024-05-20 is a Monday.
    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn open_at(date: NaiveDate) -> (Journal, MemoryStateStore, ManualClock) {
        let store = MemoryStateStore::new();
        let clock = ManualClock::at_date(date);
        let journal =
            Journal::open(Box::new(store.clone()), Box::new(clock.clone())).expect("journal opens");
        (journal, store, clock)
    }

    #[test]
    fn open_without_document_starts_fresh_and_saves() {
        let (journal, store, _clock) = open_at(may(22));
        assert_eq!(journal.current_date(), may(22));
        assert!(journal.today().is_empty());
        assert_eq!(store.snapshot().map(|s| s.last_persisted_date), Some(may(22)));
    }

    #[test]
    fn mutations_are_persisted() {
        let (mut journal, store, _clock) = open_at(may(22));
        journal
            .add_order(Master::Maksim, 1000.0, PaymentMethod::Cash, Some("Kia Rio"))
            .unwrap();
        journal
            .add_order(Master::Maksim, 500.0, PaymentMethod::Card, None)
            .unwrap();
        journal.set_bonus(Master::Maksim, 10).unwrap();

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.today.orders_of(Master::Maksim).len(), 2);
        assert_eq!(saved.today.bonus_of(Master::Maksim).value(), 10);

        let totals = journal.day_totals();
        assert_eq!(totals.master(Master::Maksim).master_share, 825.0);
        assert_eq!(totals.master(Master::Maksim).director_share, 675.0);
    }

    #[test]
    fn invalid_input_changes_nothing() {
        let (mut journal, store, _clock) = open_at(may(22));
        let writes = store.write_count();

        assert!(journal
            .add_order(Master::Andrey, -5.0, PaymentMethod::Cash, None)
            .is_err());
        assert!(journal.set_bonus(Master::Andrey, 25).is_err());
        assert!(matches!(
            journal.remove_order(Master::Andrey, 0),
            Err(JournalError::IndexOutOfRange { .. })
        ));

        assert!(journal.today().is_empty());
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn date_change_mid_session_rolls_over_before_mutation() {
        let (mut journal, store, clock) = open_at(may(22));
        journal
            .add_order(Master::Danila, 800.0, PaymentMethod::Card, None)
            .unwrap();

        clock.advance(Duration::days(1));
        journal
            .add_order(Master::Danila, 300.0, PaymentMethod::Cash, None)
            .unwrap();

        let archived = journal.history().get(may(22)).expect("wednesday archived");
        assert_eq!(archived.orders_of(Master::Danila).len(), 1);
        assert_eq!(journal.today().orders_of(Master::Danila).len(), 1);
        assert_eq!(journal.today().orders_of(Master::Danila)[0].amount, 300.0);
        assert_eq!(store.snapshot().unwrap().last_persisted_date, may(23));
    }

    #[test]
    fn friday_survives_into_monday() {
        let (mut journal, store, _clock) = open_at(may(24));
        journal
            .add_order(Master::Artyom, 2000.0, PaymentMethod::Cash, None)
            .unwrap();
        drop(journal);

        let monday = ManualClock::at_date(may(27));
        let journal = Journal::open(Box::new(store.clone()), Box::new(monday)).unwrap();
        assert!(journal.history().contains(may(24)));
        assert!(journal.today().is_empty());
        assert_eq!(journal.current_date(), may(27));
    }

    #[test]
    fn saturday_is_discarded_on_sunday() {
        let (mut journal, _store, clock) = open_at(may(25));
        journal
            .add_order(Master::VladimirA, 150.0, PaymentMethod::Cash, None)
            .unwrap();
        clock.set_date(may(26));

        assert_eq!(journal.sync().unwrap(), RolloverOutcome::Discarded(may(25)));
        assert!(journal.history().is_empty());
        assert!(journal.today().is_empty());
    }

    #[test]
    fn persistence_failure_keeps_the_mutation() {
        let (mut journal, store, _clock) = open_at(may(22));
        store.fail_writes(true);

        let err = journal
            .add_order(Master::VladimirCh, 400.0, PaymentMethod::Card, None)
            .expect_err("store refuses writes");
        assert!(matches!(err, JournalError::Persistence(_)));
        assert_eq!(journal.today().orders_of(Master::VladimirCh).len(), 1);

        store.fail_writes(false);
        journal.set_bonus(Master::VladimirCh, 4).unwrap();
        let saved = store.snapshot().unwrap();
        assert_eq!(saved.today.orders_of(Master::VladimirCh).len(), 1);
    }

    #[test]
    fn failed_save_after_midnight_keeps_rollover_and_order() {
        let (mut journal, store, clock) = open_at(may(22));
        journal
            .add_order(Master::Maksim, 600.0, PaymentMethod::Cash, None)
            .unwrap();
        store.fail_writes(true);
        clock.advance(Duration::days(1));

        let err = journal
            .add_order(Master::Maksim, 900.0, PaymentMethod::Card, None)
            .expect_err("store refuses writes");
        assert!(matches!(err, JournalError::Persistence(_)));
        assert!(journal.history().contains(may(22)));
        assert_eq!(journal.today().orders_of(Master::Maksim).len(), 1);
        assert_eq!(journal.today().orders_of(Master::Maksim)[0].amount, 900.0);

        assert!(journal.set_bonus(Master::Maksim, 6).is_err());
        assert_eq!(journal.today().bonus_of(Master::Maksim).value(), 6);

        store.fail_writes(false);
        journal.sync().unwrap();
        journal.remove_order(Master::Maksim, 0).unwrap();
        let saved = store.snapshot().unwrap();
        assert_eq!(saved.last_persisted_date, may(23));
        assert!(saved.today.orders_of(Master::Maksim).is_empty());
        assert!(saved.history.contains(may(22)));
    }

    #[test]
    fn failed_removal_after_midnight_still_saves_the_rollover() {
        let (mut journal, store, clock) = open_at(may(22));
        journal
            .add_order(Master::Andrey, 100.0, PaymentMethod::Cash, None)
            .unwrap();
        clock.advance(Duration::days(1));

        assert!(matches!(
            journal.remove_order(Master::Andrey, 0),
            Err(JournalError::IndexOutOfRange { .. })
        ));
        let saved = store.snapshot().unwrap();
        assert_eq!(saved.last_persisted_date, may(23));
        assert!(saved.history.contains(may(22)));
    }

    #[test]
    fn newer_schema_is_refused_on_open() {
        let mut state = AppState::fresh(may(22));
        state.schema_version = CURRENT_SCHEMA_VERSION + 1;
        let store = MemoryStateStore::with_state(state);
        let result = Journal::open(
            Box::new(store),
            Box::new(ManualClock::at_date(may(22))),
        );
        assert!(matches!(result, Err(JournalError::Persistence(_))));
    }

    #[test]
    fn reset_backs_up_and_restore_brings_it_back() {
        let (mut journal, _store, _clock) = open_at(may(22));
        journal
            .add_order(Master::Maksim, 700.0, PaymentMethod::Cash, None)
            .unwrap();

        let backup = journal.reset_all().unwrap().expect("memory store keeps backups");
        assert!(journal.today().is_empty());
        assert_eq!(journal.backups().unwrap().len(), 1);

        journal.restore_backup(&backup.name).unwrap();
        assert_eq!(journal.today().orders_of(Master::Maksim).len(), 1);
    }

    #[test]
    fn history_totals_follow_archive_order() {
        let (mut journal, _store, clock) = open_at(may(21));
        for amount in [100.0, 200.0, 300.0] {
            journal
                .add_order(Master::Andrey, amount, PaymentMethod::Cash, None)
                .unwrap();
            clock.advance(Duration::days(1));
        }
        journal.sync().unwrap();

        let totals: Vec<(NaiveDate, f64)> = journal
            .history_totals()
            .into_iter()
            .map(|(date, totals)| (date, totals.service.total))
            .collect();
        assert_eq!(
            totals,
            vec![(may(21), 100.0), (may(22), 200.0), (may(23), 300.0)]
        );
    }
}
