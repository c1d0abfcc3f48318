//! Projected bill and the share of each charge category.

use indexmap::IndexMap;
use pp_core::data_point::DataPoint;
use pp_core::error::{PowerPlotError, Result};
use pp_utils::calendar::month_name_of;
use pp_utils::format::humanize_key;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillShare {
    /// Key as sent by the server ("basic_service")
    pub category: String,
    /// "Basic Service"
    pub label: String,
    pub amount: f64,
    /// Percentage of the projected total
    pub percent: f64,
}

impl BillShare {
    /// "Basic Service, 21.3%"
    pub fn display(&self) -> String {
        format!("{}, {:.1}%", self.label, self.percent)
    }
}

/// Share of `total` taken by each category, in the server's order.
pub fn bill_shares(total: f64, breakdown: &IndexMap<String, f64>) -> Result<Vec<BillShare>> {
    if total == 0.0 {
        return Err(PowerPlotError::DivisionByZero);
    }
    breakdown
        .iter()
        .map(|(category, amount)| {
            if *amount < 0.0 {
                return Err(PowerPlotError::InvalidFormat(format!(
                    "negative amount {amount} for bill category {category}"
                )));
            }
            Ok(BillShare {
                category: category.clone(),
                label: humanize_key(category),
                amount: *amount,
                percent: amount / total * 100.0,
            })
        })
        .collect()
}

/// "Projected March bill is", named after the month of the last monthly
/// total (the one still in progress).
pub fn projected_bill_title(monthly: &[DataPoint]) -> Option<String> {
    monthly
        .last()
        .map(|p| format!("Projected {} bill is", month_name_of(&p.date)))
}
