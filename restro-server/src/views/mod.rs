//! Order view engine
//!
//! Read-only aggregation over the record store:
//!
//! - [`OrderViewPipeline`] joins order items with their food, order and table
//!   and groups them into [`OrderSummary`](shared::OrderSummary) values
//! - [`InvoiceViewBuilder`] merges an invoice with the summary of its order
//!
//! Both are stateless; every call reads the store afresh through a
//! [`QueryContext`](crate::db::QueryContext).

mod error;
mod invoice;
mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ViewError, ViewResult};
pub use invoice::{InvoiceViewBuilder, select_summary};
pub use pipeline::{OrderViewPipeline, group_rows, join_rows};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How an order item row's `amount` (and displayed quantity) is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    /// `amount = food.price`, quantity shown as 1
    #[default]
    UnitPrice,
    /// `amount = food.price * quantity`, quantity shown as stored
    Extended,
}

impl AmountPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnitPrice => "unit_price",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for AmountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit_price" => Ok(Self::UnitPrice),
            "extended" => Ok(Self::Extended),
            other => Err(format!("unknown amount policy: {other}")),
        }
    }
}

/// What an invoice view does when its order resolves to several groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// Use the first group and attach a diagnostic
    #[default]
    First,
    /// Fail with `AmbiguousGrouping`
    Reject,
}

impl GroupingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for GroupingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown grouping policy: {other}")),
        }
    }
}
