//! Required-field validation run before the booking can leave step 0 and
//! before submission. Every other field is optional.

use freightdesk_core::FieldErrors;

use crate::draft::BookingDraft;

/// Field names reported in [`FieldErrors`], in form order.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "customer",
    "service",
    "date",
    "origin",
    "destination",
    "shipment_terms",
    "freight",
    "routed",
    "routed_by",
    "customer_service_name",
];

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check the required header fields of `draft`.
pub fn validate_required(draft: &BookingDraft) -> FieldErrors {
    let h = draft.header();
    let mut errors = FieldErrors::new();

    if blank(&h.customer_code) {
        errors.push("customer", "Customer is required");
    }
    if h.service.is_none() {
        errors.push("service", "Service is required");
    }
    if h.booking_date.is_none() {
        errors.push("date", "Date is required");
    }
    if blank(&h.origin_code) {
        errors.push("origin", "Origin is required");
    }
    if blank(&h.destination_code) {
        errors.push("destination", "Destination is required");
    }
    if blank(&h.shipment_terms) {
        errors.push("shipment_terms", "Shipment terms are required");
    }
    if h.freight.is_none() {
        errors.push("freight", "Freight is required");
    }
    if h.routed.is_none() {
        errors.push("routed", "Routed is required");
    }
    if blank(&h.routed_by) {
        errors.push("routed_by", "Routed by is required");
    }
    if blank(&h.customer_service_name) {
        errors.push("customer_service_name", "Customer service name is required");
    }

    errors
}
