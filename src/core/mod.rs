pub mod clock;
pub mod journal;
pub mod rollover;
pub mod split;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use journal::Journal;
pub use rollover::RolloverOutcome;
pub use split::{compute_day_totals, compute_shares, DayTotals, MasterTotals, ServiceTotals, Shares};
