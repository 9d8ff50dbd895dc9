use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::master::{Master, RosterMap};
use crate::domain::order::{Order, OrderId};
use crate::errors::{JournalError, Result};

/// Per-master bonus shifting part of the director's half to the master.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "u8")]
pub struct BonusPercent(u8);

impl BonusPercent {
    pub const MAX: u8 = 20;
    pub const STEP: u8 = 2;
    pub const ZERO: BonusPercent = BonusPercent(0);

    pub fn new(percent: i64) -> Result<Self> {
        if !(0..=Self::MAX as i64).contains(&percent) {
            return Err(JournalError::validation(format!(
                "bonus must be between 0 and {}%, got {}",
                Self::MAX,
                percent
            )));
        }
        Ok(Self(percent as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for BonusPercent {
    type Error = JournalError;

    fn try_from(value: i64) -> Result<Self> {
        BonusPercent::new(value)
    }
}

impl From<BonusPercent> for u8 {
    fn from(value: BonusPercent) -> Self {
        value.0
    }
}

impl fmt::Display for BonusPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Orders and bonus settings of one working day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayLedger {
    pub orders: RosterMap<Vec<Order>>,
    pub bonuses: RosterMap<BonusPercent>,
}

impl DayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders_of(&self, master: Master) -> &[Order] {
        &self.orders[master]
    }

    pub fn bonus_of(&self, master: Master) -> BonusPercent {
        self.bonuses[master]
    }

    /// Appends an already validated order to the master's list.
    pub fn add_order(&mut self, master: Master, order: Order) -> OrderId {
        let id = order.id;
        self.orders[master].push(order);
        id
    }

    /// Removes the order at `index` in the master's current listing.
    pub fn remove_order(&mut self, master: Master, index: usize) -> Result<Order> {
        let orders = &mut self.orders[master];
        if index >= orders.len() {
            return Err(JournalError::IndexOutOfRange {
                master,
                index,
                len: orders.len(),
            });
        }
        Ok(orders.remove(index))
    }

    pub fn set_bonus(&mut self, master: Master, percent: BonusPercent) {
        self.bonuses[master] = percent;
    }

    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order_count() == 0 && self.bonuses.values().all(|bonus| *bonus == BonusPercent::ZERO)
    }
}
