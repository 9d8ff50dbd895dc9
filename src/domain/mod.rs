pub mod common;
pub mod day;
pub mod master;
pub mod order;
pub mod state;
pub mod week;

pub use common::{Displayable, Identifiable};
pub use day::{BonusPercent, DayLedger};
pub use master::{Master, RosterMap, DIRECTOR_NAME};
pub use order::{Order, OrderId, PaymentMethod};
pub use state::{AppState, CURRENT_SCHEMA_VERSION};
pub use week::WeekArchive;
