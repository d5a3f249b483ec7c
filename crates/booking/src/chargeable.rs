//! Chargeable weight/volume derivation.
//!
//! The billable measure is the greater of the actual and the volumetric
//! measure, and which pair applies depends on the service mode:
//!
//! - LCL: `chargeable_volume = max(gross_weight / 1000, volume)`
//! - AIR: `chargeable_weight = max(gross_weight, volume_weight)`
//! - FCL (or no service): neither is derived.
//!
//! An unset input counts as `0` inside `max`, but when both inputs relevant
//! to the mode are unset the result is `None`, never `0`.

use serde::{Deserialize, Serialize};

use crate::service::ServiceMode;

/// Kilograms per cubic metre used to turn LCL gross weight into volume.
pub const LCL_KG_PER_CBM: f64 = 1000.0;

/// Raw cargo measurements, `None` when the field is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub gross_weight: Option<f64>,
    pub volume_weight: Option<f64>,
    pub volume: Option<f64>,
}

/// Derived pair; at most one side is ever `Some`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Chargeable {
    pub chargeable_weight: Option<f64>,
    pub chargeable_volume: Option<f64>,
}

impl Chargeable {
    pub const NONE: Chargeable = Chargeable {
        chargeable_weight: None,
        chargeable_volume: None,
    };
}

/// Compute the chargeable pair for `service`.
pub fn compute(service: Option<ServiceMode>, m: &Measurements) -> Chargeable {
    match service {
        Some(ServiceMode::Lcl) => Chargeable {
            chargeable_weight: None,
            chargeable_volume: max_of_present(
                m.gross_weight.map(|gw| gw / LCL_KG_PER_CBM),
                m.volume,
            ),
        },
        Some(ServiceMode::Air) => Chargeable {
            chargeable_weight: max_of_present(m.gross_weight, m.volume_weight),
            chargeable_volume: None,
        },
        Some(ServiceMode::Fcl) | None => Chargeable::NONE,
    }
}

fn max_of_present(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    if a.is_none() && b.is_none() {
        return None;
    }
    Some(a.unwrap_or(0.0).max(b.unwrap_or(0.0)))
}
