//! Rate (charge) lines and their computed totals.

use serde::{Deserialize, Serialize};

use freightdesk_core::numeric::{decimal_or, fixed2, parse_decimal};

/// One charge line. Inputs are kept as typed; totals are two-decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLine {
    pub charge_name: String,
    pub currency: String,
    pub roe: String,
    pub unit: String,
    pub no_of_units: String,
    pub sell_per_unit: String,
    pub cost_per_unit: String,
    pub min_sell: String,
    pub total_sell: String,
    pub total_cost: String,
}

impl Default for RateLine {
    fn default() -> Self {
        Self {
            charge_name: String::new(),
            currency: String::new(),
            roe: "1".to_string(),
            unit: String::new(),
            no_of_units: String::new(),
            sell_per_unit: String::new(),
            cost_per_unit: String::new(),
            min_sell: String::new(),
            total_sell: fixed2(0.0),
            total_cost: fixed2(0.0),
        }
    }
}

/// Editable rate-line fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateField {
    ChargeName(String),
    Currency(String),
    Roe(String),
    Unit(String),
    NoOfUnits(String),
    SellPerUnit(String),
    CostPerUnit(String),
    MinSell(String),
}

/// Effective rate of exchange: unset or zero means 1.
pub fn effective_roe(roe: &str) -> f64 {
    parse_decimal(roe).filter(|r| *r != 0.0).unwrap_or(1.0)
}

/// `units × sell × roe`, two decimals.
pub fn total_sell(no_of_units: &str, sell_per_unit: &str, roe: &str) -> String {
    fixed2(decimal_or(no_of_units, 0.0) * decimal_or(sell_per_unit, 0.0) * effective_roe(roe))
}

/// `units × cost`, two decimals.
pub fn total_cost(no_of_units: &str, cost_per_unit: &str) -> String {
    fixed2(decimal_or(no_of_units, 0.0) * decimal_or(cost_per_unit, 0.0))
}

impl RateLine {
    /// Apply an edit, recomputing whichever total depends on the field.
    pub(crate) fn set(&mut self, field: RateField) {
        let (sell_dirty, cost_dirty) = match &field {
            RateField::NoOfUnits(_) => (true, true),
            RateField::SellPerUnit(_) | RateField::Roe(_) => (true, false),
            RateField::CostPerUnit(_) => (false, true),
            _ => (false, false),
        };

        match field {
            RateField::ChargeName(v) => self.charge_name = v,
            RateField::Currency(v) => self.currency = v,
            RateField::Roe(v) => self.roe = v,
            RateField::Unit(v) => self.unit = v,
            RateField::NoOfUnits(v) => self.no_of_units = v,
            RateField::SellPerUnit(v) => self.sell_per_unit = v,
            RateField::CostPerUnit(v) => self.cost_per_unit = v,
            RateField::MinSell(v) => self.min_sell = v,
        }

        if sell_dirty {
            self.total_sell = total_sell(&self.no_of_units, &self.sell_per_unit, &self.roe);
        }
        if cost_dirty {
            self.total_cost = total_cost(&self.no_of_units, &self.cost_per_unit);
        }
    }

    /// Whether the computed sell total undercuts the line's minimum sell.
    ///
    /// Informational; it does not block submission.
    pub fn below_min_sell(&self) -> bool {
        match (parse_decimal(&self.min_sell), parse_decimal(&self.total_sell)) {
            (Some(min), Some(total)) => total < min,
            _ => false,
        }
    }
}
