use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::format_rubles;
use crate::domain::common::{Displayable, Identifiable};
use crate::errors::{JournalError, Result};

pub type OrderId = Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "нал.",
            PaymentMethod::Card => "карта",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("cash"),
            PaymentMethod::Card => f.write_str("card"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = JournalError;

    fn from_str(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "cash" | "нал" | "нал." | "наличные" => Ok(PaymentMethod::Cash),
            "card" | "карта" => Ok(PaymentMethod::Card),
            other => Err(JournalError::validation(format!(
                "payment method must be `cash` or `card`, got `{}`",
                other
            ))),
        }
    }
}

/// A single paid job recorded for a master. Orders are never edited, only removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "StoredOrder")]
pub struct Order {
    pub id: OrderId,
    pub amount: f64,
    pub payment: PaymentMethod,
    #[serde(rename = "car", default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Order {
    /// Builds a validated order; the amount must be a positive finite number.
    pub fn new(
        amount: f64,
        payment: PaymentMethod,
        vehicle: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Self> {
        check_amount(amount)?;
        let vehicle = vehicle
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string);
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            payment,
            vehicle,
            created_at,
        })
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(JournalError::validation(format!(
            "order amount must be greater than zero, got {}",
            amount
        )));
    }
    Ok(())
}

/// Order as read from disk, checked before it becomes an [`Order`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    id: OrderId,
    amount: f64,
    payment: PaymentMethod,
    #[serde(rename = "car", default)]
    vehicle: Option<String>,
    created_at: NaiveDateTime,
}

impl TryFrom<StoredOrder> for Order {
    type Error = JournalError;

    fn try_from(stored: StoredOrder) -> Result<Self> {
        check_amount(stored.amount)?;
        Ok(Self {
            id: stored.id,
            amount: stored.amount,
            payment: stored.payment,
            vehicle: stored.vehicle,
            created_at: stored.created_at,
        })
    }
}

impl Identifiable for Order {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Order {
    /// `14:05  1 500 ₽ (нал.)  Kia Rio`
    fn display_label(&self) -> String {
        let mut label = format!(
            "{}  {} ({})",
            self.created_at.format("%H:%M"),
            format_rubles(self.amount),
            self.payment.label()
        );
        if let Some(vehicle) = &self.vehicle {
            label.push_str("  ");
            label.push_str(vehicle);
        }
        label
    }
}
