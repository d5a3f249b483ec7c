//! Routing legs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point-to-point segment of the overall route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingLeg {
    pub move_type: String,
    pub from_location: String,
    pub to_location: String,
    pub etd: Option<NaiveDate>,
    pub eta: Option<NaiveDate>,
    pub carrier: String,
    /// Air legs only.
    pub flight_no: Option<String>,
    pub status: String,
}

/// Vessel/flight schedule picked for the booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierSchedule {
    pub schedule_id: Option<String>,
    pub carrier_code: String,
    pub carrier_name: String,
    pub vessel_name: String,
    pub voyage_number: String,
    pub etd: Option<NaiveDate>,
    pub eta: Option<NaiveDate>,
}
