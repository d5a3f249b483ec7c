//! Hydrating a draft from an existing booking record (edit mode).
//!
//! Records come back from the API in the payload shape, but not reliably
//! typed: decimals may be strings, optional text may be `null`, arrays may be
//! missing. Every read falls back to an empty value instead of failing, and
//! numbers are turned back into the text the form edits.

use serde_json::Value;

use freightdesk_core::dates::parse_loose_date;
use freightdesk_core::numeric::{fixed2, parse_decimal, plain};

use crate::cargo::CargoLine;
use crate::draft::{BookingDraft, BookingHeader, HaulageDetails};
use crate::parties::{PartyRole, PartySelection};
use crate::rates::RateLine;
use crate::routing::{CarrierSchedule, RoutingLeg};
use crate::service::{Freight, Routed, ServiceMode};

fn text(v: &Value, key: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn opt_text(v: &Value, key: &str) -> Option<String> {
    Some(text(v, key)).filter(|s| !s.is_empty())
}

fn number(v: &Value, key: &str) -> Option<f64> {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_decimal(s),
        _ => None,
    }
}

/// Numeric field back to form text; absent stays blank.
fn number_text(v: &Value, key: &str) -> String {
    number(v, key).map(plain).unwrap_or_default()
}

fn id(v: &Value, key: &str) -> Option<i64> {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(v: &Value, key: &str) -> bool {
    match v.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

fn date(v: &Value, key: &str) -> Option<chrono::NaiveDate> {
    v.get(key).and_then(Value::as_str).and_then(parse_loose_date)
}

fn rows<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn header(v: &Value) -> BookingHeader {
    BookingHeader {
        customer_code: text(v, "customer"),
        customer_name: text(v, "customer_name"),
        service: ServiceMode::parse(&text(v, "service")),
        booking_date: date(v, "date"),
        origin_code: text(v, "origin"),
        origin_name: text(v, "origin_name"),
        destination_code: text(v, "destination"),
        destination_name: text(v, "destination_name"),
        shipment_terms: text(v, "shipment_terms"),
        freight: Freight::parse(&text(v, "freight")),
        routed: Routed::parse(&text(v, "routed")),
        routed_by: text(v, "routed_by"),
        customer_service_name: text(v, "customer_service_name"),
        direct: flag(v, "direct"),
        coload: flag(v, "coload"),
    }
}

fn schedule(v: &Value) -> CarrierSchedule {
    CarrierSchedule {
        schedule_id: opt_text(v, "schedule_id"),
        carrier_code: text(v, "carrier"),
        carrier_name: text(v, "carrier_name"),
        vessel_name: text(v, "vessel_name"),
        voyage_number: text(v, "voyage_number"),
        etd: date(v, "etd"),
        eta: date(v, "eta"),
    }
}

fn routing_leg(v: &Value) -> RoutingLeg {
    RoutingLeg {
        move_type: text(v, "move_type"),
        from_location: text(v, "from_location"),
        to_location: text(v, "to_location"),
        etd: date(v, "etd"),
        eta: date(v, "eta"),
        carrier: text(v, "carrier"),
        flight_no: opt_text(v, "flight_no"),
        status: text(v, "status"),
    }
}

fn cargo_line(v: &Value) -> CargoLine {
    CargoLine {
        packages: number_text(v, "no_of_packages"),
        gross_weight: number_text(v, "gross_weight"),
        volume_weight: number_text(v, "volume_weight"),
        volume: number_text(v, "volume"),
        chargeable_weight: number(v, "chargeable_weight"),
        chargeable_volume: number(v, "chargeable_volume"),
        container_type: opt_text(v, "container_type"),
        container_count: number_text(v, "no_of_containers"),
    }
}

fn rate_line(v: &Value) -> RateLine {
    RateLine {
        charge_name: text(v, "charge_name"),
        currency: text(v, "currency"),
        roe: number(v, "roe").map(plain).unwrap_or_else(|| "1".to_string()),
        unit: text(v, "unit"),
        no_of_units: number_text(v, "no_of_units"),
        sell_per_unit: number_text(v, "sell_per_unit"),
        cost_per_unit: number_text(v, "cost_per_unit"),
        min_sell: number_text(v, "min_sell"),
        total_sell: fixed2(number(v, "total_sell").unwrap_or(0.0)),
        total_cost: fixed2(number(v, "total_cost").unwrap_or(0.0)),
    }
}

fn party(v: &Value, role: PartyRole) -> (PartyRole, PartySelection) {
    let key = role.key();
    (
        role,
        PartySelection {
            code: text(v, key),
            address_id: id(v, &format!("{key}_address")),
            email: text(v, &format!("{key}_email")),
            addresses: Vec::new(),
        },
    )
}

fn haulage(v: &Value, prefix: &str, port_key: &str) -> HaulageDetails {
    HaulageDetails {
        location: text(v, &format!("{prefix}_location")),
        port_code: text(v, port_key),
        address_id: id(v, &format!("{prefix}_address")),
        planned_date: date(v, &format!("{prefix}_date")),
        transporter_name: text(v, &format!("{prefix}_transporter_name")),
        transporter_email: text(v, &format!("{prefix}_transporter_email")),
    }
}

impl BookingDraft {
    /// Build an edit-mode draft from a stored booking record.
    ///
    /// Party address lists are not part of the record; the stored address ids
    /// are kept and the lists are resolved again when a party is re-selected.
    pub fn from_record(record: &Value, current_user: impl Into<String>) -> Self {
        BookingDraft::from_parts(
            id(record, "id"),
            current_user.into(),
            header(record),
            schedule(record),
            rows(record, "routing").iter().map(routing_leg).collect(),
            PartyRole::ALL.iter().map(|role| party(record, *role)).collect(),
            rows(record, "cargo_details").iter().map(cargo_line).collect(),
            haulage(record, "pickup", "pickup_from"),
            haulage(record, "delivery", "delivery_to"),
            rows(record, "charges").iter().map(rate_line).collect(),
            id(record, "quotation_id"),
        )
    }
}
