//! Revenue split between the director and each master.
//!
//! Totals are always recomputed from the ledger; nothing here is cached.

use crate::domain::{BonusPercent, DayLedger, Master, PaymentMethod, RosterMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shares {
    pub master_share: f64,
    pub director_share: f64,
}

/// Splits `total` in half, then moves `bonus_percent` of the half from the
/// director to the master. Callers validate the inputs.
pub fn compute_shares(total: f64, bonus_percent: u8) -> Shares {
    let base_share = total / 2.0;
    let bonus_amount = base_share * f64::from(bonus_percent) / 100.0;
    Shares {
        master_share: base_share + bonus_amount,
        director_share: base_share - bonus_amount,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MasterTotals {
    pub total_amount: f64,
    pub master_share: f64,
    pub director_share: f64,
    pub bonus_percent: u8,
    pub cash: f64,
    pub card: f64,
    pub order_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServiceTotals {
    pub total: f64,
    pub director_total: f64,
    pub master_total: f64,
    pub cash: f64,
    pub card: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayTotals {
    pub masters: RosterMap<MasterTotals>,
    pub service: ServiceTotals,
}

impl DayTotals {
    pub fn master(&self, master: Master) -> &MasterTotals {
        &self.masters[master]
    }

    /// Masters that took at least one order, in roster order.
    pub fn active(&self) -> impl Iterator<Item = (Master, &MasterTotals)> {
        self.masters.iter().filter(|(_, totals)| totals.order_count > 0)
    }

    /// Masters with non-zero revenue, in roster order.
    pub fn with_revenue(&self) -> impl Iterator<Item = (Master, &MasterTotals)> {
        self.masters.iter().filter(|(_, totals)| totals.total_amount > 0.0)
    }
}

fn master_totals(ledger: &DayLedger, master: Master) -> MasterTotals {
    let orders = ledger.orders_of(master);
    let bonus: BonusPercent = ledger.bonus_of(master);
    let mut totals = MasterTotals {
        bonus_percent: bonus.value(),
        order_count: orders.len(),
        ..MasterTotals::default()
    };
    for order in orders {
        totals.total_amount += order.amount;
        match order.payment {
            PaymentMethod::Cash => totals.cash += order.amount,
            PaymentMethod::Card => totals.card += order.amount,
        }
    }
    let shares = compute_shares(totals.total_amount, totals.bonus_percent);
    totals.master_share = shares.master_share;
    totals.director_share = shares.director_share;
    totals
}

pub fn compute_day_totals(ledger: &DayLedger) -> DayTotals {
    let masters = RosterMap::from_fn(|master| master_totals(ledger, master));
    let service = masters
        .values()
        .fold(ServiceTotals::default(), |mut service, totals| {
            service.total += totals.total_amount;
            service.director_total += totals.director_share;
            service.master_total += totals.master_share;
            service.cash += totals.cash;
            service.card += totals.card;
            service
        });
    DayTotals { masters, service }
}
