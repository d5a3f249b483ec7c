//! Submission assembler: booking draft → `customer-service-shipment/` payload.
//!
//! The transform is pure. Required fields are validated first; all other
//! fields pass through as empty strings or nulls. Dates become `YYYY-MM-DD`
//! (or `""`), and numeric text is coerced here rather than at input time:
//! decimals default to `0`, counts to `0`, the rate of exchange to `1`.

use serde::{Deserialize, Serialize};

use freightdesk_core::dates::format_wire_date;
use freightdesk_core::numeric::{decimal_or, integer_or, parse_integer};
use freightdesk_core::DomainResult;

use crate::cargo::CargoLine;
use crate::draft::{BookingDraft, HaulageDetails};
use crate::parties::{Parties, PartyRole};
use crate::rates::{RateLine, effective_roe};
use crate::routing::RoutingLeg;
use crate::service::ServiceMode;
use crate::validation::validate_required;

/// Booking endpoint, relative to the API base URL.
pub const BOOKING_ENDPOINT: &str = "customer-service-shipment/";

/// `service_type` sent with every booking from this wizard.
pub const EXPORT_SERVICE_TYPE: &str = "EXPORT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingLegPayload {
    pub move_type: String,
    pub from_location: String,
    pub to_location: String,
    pub etd: String,
    pub eta: String,
    pub carrier: String,
    pub flight_no: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoLinePayload {
    pub no_of_packages: i64,
    pub gross_weight: f64,
    pub volume_weight: f64,
    pub volume: f64,
    pub chargeable_weight: Option<f64>,
    pub chargeable_volume: Option<f64>,
    pub container_type: Option<String>,
    pub no_of_containers: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeLinePayload {
    pub charge_name: String,
    pub currency: String,
    pub roe: f64,
    pub unit: String,
    pub no_of_units: f64,
    pub sell_per_unit: f64,
    pub cost_per_unit: f64,
    pub min_sell: f64,
    pub total_sell: f64,
    pub total_cost: f64,
}

/// Wire shape of an export booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    /// Present on update only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub service_type: String,
    pub import_to_export: bool,

    pub customer: String,
    pub customer_name: String,
    pub service: String,
    pub date: String,
    pub origin: String,
    pub origin_name: String,
    pub destination: String,
    pub destination_name: String,
    pub shipment_terms: String,
    pub freight: String,
    pub routed: String,
    pub routed_by: String,
    pub customer_service_name: String,
    pub direct: bool,
    pub coload: bool,

    pub schedule_id: Option<String>,
    pub carrier: String,
    pub carrier_name: String,
    pub vessel_name: String,
    pub voyage_number: String,
    pub etd: String,
    pub eta: String,

    pub routing: Vec<RoutingLegPayload>,

    pub shipper: String,
    pub shipper_address: Option<i64>,
    pub shipper_email: String,
    pub consignee: String,
    pub consignee_address: Option<i64>,
    pub consignee_email: String,
    pub forwarder: String,
    pub forwarder_address: Option<i64>,
    pub forwarder_email: String,
    pub destination_agent: String,
    pub destination_agent_address: Option<i64>,
    pub destination_agent_email: String,
    pub billing_customer: String,
    pub billing_customer_address: Option<i64>,
    pub billing_customer_email: String,
    pub notify_customer: String,
    pub notify_customer_address: Option<i64>,
    pub notify_customer_email: String,
    pub cha: String,
    pub cha_address: Option<i64>,
    pub cha_email: String,

    pub cargo_details: Vec<CargoLinePayload>,

    pub pickup_location: String,
    pub pickup_from: String,
    pub pickup_address: Option<i64>,
    pub pickup_date: String,
    pub pickup_transporter_name: String,
    pub pickup_transporter_email: String,
    pub delivery_location: String,
    pub delivery_to: String,
    pub delivery_address: Option<i64>,
    pub delivery_date: String,
    pub delivery_transporter_name: String,
    pub delivery_transporter_email: String,

    pub charges: Vec<ChargeLinePayload>,
    pub quotation_id: Option<i64>,
}

fn routing_leg(leg: &RoutingLeg) -> RoutingLegPayload {
    RoutingLegPayload {
        move_type: leg.move_type.clone(),
        from_location: leg.from_location.clone(),
        to_location: leg.to_location.clone(),
        etd: format_wire_date(leg.etd),
        eta: format_wire_date(leg.eta),
        carrier: leg.carrier.clone(),
        flight_no: leg.flight_no.clone().filter(|f| !f.trim().is_empty()),
        status: leg.status.clone(),
    }
}

fn cargo_line(line: &CargoLine, service: Option<ServiceMode>) -> CargoLinePayload {
    let fcl = service == Some(ServiceMode::Fcl);
    CargoLinePayload {
        no_of_packages: integer_or(&line.packages, 0),
        gross_weight: decimal_or(&line.gross_weight, 0.0),
        volume_weight: decimal_or(&line.volume_weight, 0.0),
        volume: decimal_or(&line.volume, 0.0),
        chargeable_weight: line.chargeable_weight,
        chargeable_volume: line.chargeable_volume,
        container_type: line.container_type.clone().filter(|_| fcl),
        no_of_containers: parse_integer(&line.container_count).filter(|_| fcl),
    }
}

fn charge_line(line: &RateLine) -> ChargeLinePayload {
    ChargeLinePayload {
        charge_name: line.charge_name.clone(),
        currency: line.currency.clone(),
        roe: effective_roe(&line.roe),
        unit: line.unit.clone(),
        no_of_units: decimal_or(&line.no_of_units, 0.0),
        sell_per_unit: decimal_or(&line.sell_per_unit, 0.0),
        cost_per_unit: decimal_or(&line.cost_per_unit, 0.0),
        min_sell: decimal_or(&line.min_sell, 0.0),
        total_sell: decimal_or(&line.total_sell, 0.0),
        total_cost: decimal_or(&line.total_cost, 0.0),
    }
}

struct PartyWire {
    code: String,
    address: Option<i64>,
    email: String,
}

fn party(parties: &Parties, role: PartyRole) -> PartyWire {
    match parties.get(role) {
        Some(p) => PartyWire {
            code: p.code.clone(),
            address: p.address_id,
            email: p.email.clone(),
        },
        None => PartyWire {
            code: String::new(),
            address: None,
            email: String::new(),
        },
    }
}

/// Validate and assemble the payload for `draft`.
///
/// Fails with [`freightdesk_core::DomainError::Fields`] when a required field
/// is missing; nothing is assembled in that case.
pub fn assemble(draft: &BookingDraft) -> DomainResult<BookingPayload> {
    validate_required(draft).into_result()?;
    Ok(assemble_unchecked(draft))
}

/// Assemble without validation (previews, drafts shown to support staff).
pub fn assemble_unchecked(draft: &BookingDraft) -> BookingPayload {
    let h = draft.header();
    let s = draft.schedule();
    let parties = draft.parties();
    let pickup: &HaulageDetails = draft.pickup();
    let delivery: &HaulageDetails = draft.delivery();

    let shipper = party(parties, PartyRole::Shipper);
    let consignee = party(parties, PartyRole::Consignee);
    let forwarder = party(parties, PartyRole::Forwarder);
    let agent = party(parties, PartyRole::DestinationAgent);
    let billing = party(parties, PartyRole::BillingCustomer);
    let notify = party(parties, PartyRole::NotifyCustomer);
    let cha = party(parties, PartyRole::Cha);

    BookingPayload {
        id: draft.booking_id(),
        service_type: EXPORT_SERVICE_TYPE.to_string(),
        import_to_export: false,

        customer: h.customer_code.clone(),
        customer_name: h.customer_name.clone(),
        service: h.service.map(|v| v.as_str().to_string()).unwrap_or_default(),
        date: format_wire_date(h.booking_date),
        origin: h.origin_code.clone(),
        origin_name: h.origin_name.clone(),
        destination: h.destination_code.clone(),
        destination_name: h.destination_name.clone(),
        shipment_terms: h.shipment_terms.clone(),
        freight: h.freight.map(|v| v.as_str().to_string()).unwrap_or_default(),
        routed: h.routed.map(|v| v.as_str().to_string()).unwrap_or_default(),
        routed_by: h.routed_by.clone(),
        customer_service_name: h.customer_service_name.clone(),
        direct: h.direct,
        coload: h.coload,

        schedule_id: s.schedule_id.clone(),
        carrier: s.carrier_code.clone(),
        carrier_name: s.carrier_name.clone(),
        vessel_name: s.vessel_name.clone(),
        voyage_number: s.voyage_number.clone(),
        etd: format_wire_date(s.etd),
        eta: format_wire_date(s.eta),

        routing: draft.routing().iter().map(routing_leg).collect(),

        shipper: shipper.code,
        shipper_address: shipper.address,
        shipper_email: shipper.email,
        consignee: consignee.code,
        consignee_address: consignee.address,
        consignee_email: consignee.email,
        forwarder: forwarder.code,
        forwarder_address: forwarder.address,
        forwarder_email: forwarder.email,
        destination_agent: agent.code,
        destination_agent_address: agent.address,
        destination_agent_email: agent.email,
        billing_customer: billing.code,
        billing_customer_address: billing.address,
        billing_customer_email: billing.email,
        notify_customer: notify.code,
        notify_customer_address: notify.address,
        notify_customer_email: notify.email,
        cha: cha.code,
        cha_address: cha.address,
        cha_email: cha.email,

        cargo_details: draft
            .cargo()
            .iter()
            .map(|line| cargo_line(line, h.service))
            .collect(),

        pickup_location: pickup.location.clone(),
        pickup_from: pickup.port_code.clone(),
        pickup_address: pickup.address_id,
        pickup_date: format_wire_date(pickup.planned_date),
        pickup_transporter_name: pickup.transporter_name.clone(),
        pickup_transporter_email: pickup.transporter_email.clone(),
        delivery_location: delivery.location.clone(),
        delivery_to: delivery.port_code.clone(),
        delivery_address: delivery.address_id,
        delivery_date: format_wire_date(delivery.planned_date),
        delivery_transporter_name: delivery.transporter_name.clone(),
        delivery_transporter_email: delivery.transporter_email.clone(),

        charges: draft.rates().iter().map(charge_line).collect(),
        quotation_id: draft.quotation_id(),
    }
}
