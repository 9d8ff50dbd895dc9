#![doc(test(attr(deny(warnings))))]

//! Service Journal keeps the daily earnings of an auto-service shop: orders
//! per master, the director/master revenue split, a rolling archive of the
//! current week's business days, and CSV/PDF reports. An interactive shell
//! sits on top of the library.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod report;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{Journal, ManualClock, SystemClock};
pub use crate::errors::{JournalError, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Service journal tracing initialized.");
    });
}
