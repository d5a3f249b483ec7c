//! Export shipment booking draft and its reducer.
//!
//! The draft is the single owner of wizard form state. Every edit is a
//! [`DraftAction`] passed through [`Reducer::reduce`], which also enforces the
//! cross-field rules:
//!
//! - switching service nulls the derived field of the other mode, and LCL/AIR
//!   keep only cargo line 0 (FCL-only fields are dropped when leaving FCL);
//! - switching routing to `Agent` clears `routed_by` and
//!   `customer_service_name`; switching to `Self` fills an empty `routed_by`
//!   with the current user's name;
//! - routing legs, cargo lines and rate lines never drop below one row.
//!
//! Chargeable values are *not* recomputed on measurement edits; callers
//! debounce and then dispatch [`DraftAction::RecalculateChargeable`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use freightdesk_core::{DomainError, DomainResult, Reducer};

use crate::cargo::{CargoField, CargoLine};
use crate::chargeable::{self, Chargeable};
use crate::parties::{Parties, PartyAddress, PartyRole, PartySelection};
use crate::rates::{RateField, RateLine};
use crate::routing::{CarrierSchedule, RoutingLeg};
use crate::service::{Freight, Routed, ServiceMode};

/// Step-0 header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingHeader {
    pub customer_code: String,
    pub customer_name: String,
    pub service: Option<ServiceMode>,
    pub booking_date: Option<NaiveDate>,
    pub origin_code: String,
    pub origin_name: String,
    pub destination_code: String,
    pub destination_name: String,
    pub shipment_terms: String,
    pub freight: Option<Freight>,
    pub routed: Option<Routed>,
    pub routed_by: String,
    pub customer_service_name: String,
    pub direct: bool,
    pub coload: bool,
}

/// Pickup or delivery haulage details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaulageDetails {
    pub location: String,
    /// Port the haulage starts from (pickup) or ends at (delivery).
    pub port_code: String,
    pub address_id: Option<i64>,
    pub planned_date: Option<NaiveDate>,
    pub transporter_name: String,
    pub transporter_email: String,
}

/// In-memory booking aggregate built across the five wizard steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Set when editing an existing booking.
    booking_id: Option<i64>,
    current_user: String,
    header: BookingHeader,
    schedule: CarrierSchedule,
    routing: Vec<RoutingLeg>,
    parties: Parties,
    cargo: Vec<CargoLine>,
    pickup: HaulageDetails,
    delivery: HaulageDetails,
    rates: Vec<RateLine>,
    quotation_id: Option<i64>,
}

/// One edit to the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DraftAction {
    SetCustomer { code: String, name: String },
    SetService(Option<ServiceMode>),
    SetBookingDate(Option<NaiveDate>),
    SetOrigin { code: String, name: String },
    SetDestination { code: String, name: String },
    SetShipmentTerms(String),
    SetFreight(Option<Freight>),
    SetRouted(Option<Routed>),
    SetRoutedBy(String),
    SetCustomerServiceName(String),
    SetDirect(bool),
    SetCoload(bool),
    SetSchedule(CarrierSchedule),

    AddRoutingLeg,
    RemoveRoutingLeg(usize),
    UpdateRoutingLeg(usize, RoutingLeg),

    /// Party chosen, with the address list resolved for its code.
    SelectParty {
        role: PartyRole,
        code: String,
        addresses: Vec<PartyAddress>,
    },
    SelectPartyAddress { role: PartyRole, address_id: Option<i64> },
    SetPartyEmail { role: PartyRole, email: String },

    AddCargoLine,
    RemoveCargoLine(usize),
    UpdateCargoLine(usize, CargoField),
    /// Recompute line 0's chargeable pair from current inputs.
    RecalculateChargeable,

    SetPickup(HaulageDetails),
    SetDelivery(HaulageDetails),

    AddRateLine,
    RemoveRateLine(usize),
    UpdateRateLine(usize, RateField),

    SetQuotation(Option<i64>),
}

impl DraftAction {
    /// Whether this edit should (re)start the chargeable debounce.
    pub fn triggers_recalculation(&self) -> bool {
        match self {
            DraftAction::SetService(_) => true,
            DraftAction::UpdateCargoLine(0, field) => field.affects_chargeable(),
            _ => false,
        }
    }
}

impl BookingDraft {
    /// Fresh draft for `current_user` with one empty row in every list.
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            booking_id: None,
            current_user: current_user.into(),
            header: BookingHeader::default(),
            schedule: CarrierSchedule::default(),
            routing: vec![RoutingLeg::default()],
            parties: Parties::default(),
            cargo: vec![CargoLine::default()],
            pickup: HaulageDetails::default(),
            delivery: HaulageDetails::default(),
            rates: vec![RateLine::default()],
            quotation_id: None,
        }
    }

    pub fn booking_id(&self) -> Option<i64> {
        self.booking_id
    }

    pub fn is_edit(&self) -> bool {
        self.booking_id.is_some()
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn header(&self) -> &BookingHeader {
        &self.header
    }

    pub fn schedule(&self) -> &CarrierSchedule {
        &self.schedule
    }

    pub fn routing(&self) -> &[RoutingLeg] {
        &self.routing
    }

    pub fn parties(&self) -> &Parties {
        &self.parties
    }

    pub fn cargo(&self) -> &[CargoLine] {
        &self.cargo
    }

    pub fn pickup(&self) -> &HaulageDetails {
        &self.pickup
    }

    pub fn delivery(&self) -> &HaulageDetails {
        &self.delivery
    }

    pub fn rates(&self) -> &[RateLine] {
        &self.rates
    }

    pub fn quotation_id(&self) -> Option<i64> {
        self.quotation_id
    }

    /// Chargeable pair line 0 should hold for the current inputs.
    pub fn expected_chargeable(&self) -> Chargeable {
        let measurements = self
            .cargo
            .first()
            .map(CargoLine::measurements)
            .unwrap_or_default();
        chargeable::compute(self.header.service, &measurements)
    }

    /// Whether line 0 is out of date with respect to its inputs.
    pub fn chargeable_is_stale(&self) -> bool {
        self.cargo
            .first()
            .is_some_and(|line| line.chargeable() != self.expected_chargeable())
    }

    /// Assemble a draft from already-normalised parts (used by hydration).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        booking_id: Option<i64>,
        current_user: String,
        header: BookingHeader,
        schedule: CarrierSchedule,
        routing: Vec<RoutingLeg>,
        parties: Vec<(PartyRole, PartySelection)>,
        cargo: Vec<CargoLine>,
        pickup: HaulageDetails,
        delivery: HaulageDetails,
        rates: Vec<RateLine>,
        quotation_id: Option<i64>,
    ) -> Self {
        let mut draft = Self::new(current_user);
        draft.booking_id = booking_id;
        draft.header = header;
        draft.schedule = schedule;
        if !routing.is_empty() {
            draft.routing = routing;
        }
        for (role, selection) in parties {
            draft.parties.restore(role, selection);
        }
        if !cargo.is_empty() {
            draft.cargo = cargo;
        }
        if !draft.allows_multiple_cargo_lines() {
            draft.cargo.truncate(1);
        }
        draft.pickup = pickup;
        draft.delivery = delivery;
        if !rates.is_empty() {
            draft.rates = rates;
        }
        draft.quotation_id = quotation_id;
        draft.fill_routed_by();
        draft
    }

    fn allows_multiple_cargo_lines(&self) -> bool {
        self.header
            .service
            .is_some_and(|s| s.allows_multiple_cargo_lines())
    }

    fn set_service(&mut self, service: Option<ServiceMode>) {
        self.header.service = service;

        if !self.allows_multiple_cargo_lines() {
            self.cargo.truncate(1);
        }

        if let Some(line) = self.cargo.first_mut() {
            if service != Some(ServiceMode::Lcl) {
                line.chargeable_volume = None;
            }
            if service != Some(ServiceMode::Air) {
                line.chargeable_weight = None;
            }
            if service != Some(ServiceMode::Fcl) {
                line.clear_container();
            }
        }
    }

    fn set_routed(&mut self, routed: Option<Routed>) {
        self.header.routed = routed;
        if routed == Some(Routed::Agent) {
            self.header.routed_by.clear();
            self.header.customer_service_name.clear();
        }
    }

    /// A `Self`-routed booking never has an empty `routed_by`.
    fn fill_routed_by(&mut self) {
        if self.header.routed == Some(Routed::Own) && self.header.routed_by.trim().is_empty() {
            self.header.routed_by = self.current_user.clone();
        }
    }

    /// Write line 0's chargeable pair only when it differs.
    fn recalculate_chargeable(&mut self) -> bool {
        let expected = self.expected_chargeable();
        match self.cargo.first_mut() {
            Some(line) if line.chargeable() != expected => {
                line.chargeable_weight = expected.chargeable_weight;
                line.chargeable_volume = expected.chargeable_volume;
                true
            }
            _ => false,
        }
    }
}

fn row_mut<'a, T>(rows: &'a mut [T], index: usize, what: &str) -> DomainResult<&'a mut T> {
    let len = rows.len();
    rows.get_mut(index)
        .ok_or_else(|| DomainError::not_found(format!("{what} row {index} (have {len})")))
}

fn remove_row<T>(rows: &mut Vec<T>, index: usize, what: &str) -> DomainResult<()> {
    if index >= rows.len() {
        return Err(DomainError::not_found(format!("{what} row {index}")));
    }
    if rows.len() == 1 {
        return Err(DomainError::invariant(format!(
            "at least one {what} row is required"
        )));
    }
    rows.remove(index);
    Ok(())
}

impl Reducer for BookingDraft {
    type Action = DraftAction;
    type Error = DomainError;

    fn reduce(&self, action: &DraftAction) -> DomainResult<Self> {
        let mut next = self.clone();

        match action.clone() {
            DraftAction::SetCustomer { code, name } => {
                next.header.customer_code = code;
                next.header.customer_name = name;
            }
            DraftAction::SetService(service) => next.set_service(service),
            DraftAction::SetBookingDate(date) => next.header.booking_date = date,
            DraftAction::SetOrigin { code, name } => {
                next.header.origin_code = code;
                next.header.origin_name = name;
            }
            DraftAction::SetDestination { code, name } => {
                next.header.destination_code = code;
                next.header.destination_name = name;
            }
            DraftAction::SetShipmentTerms(terms) => next.header.shipment_terms = terms,
            DraftAction::SetFreight(freight) => next.header.freight = freight,
            DraftAction::SetRouted(routed) => next.set_routed(routed),
            DraftAction::SetRoutedBy(name) => next.header.routed_by = name,
            DraftAction::SetCustomerServiceName(name) => next.header.customer_service_name = name,
            DraftAction::SetDirect(v) => next.header.direct = v,
            DraftAction::SetCoload(v) => next.header.coload = v,
            DraftAction::SetSchedule(schedule) => next.schedule = schedule,

            DraftAction::AddRoutingLeg => next.routing.push(RoutingLeg::default()),
            DraftAction::RemoveRoutingLeg(i) => remove_row(&mut next.routing, i, "routing leg")?,
            DraftAction::UpdateRoutingLeg(i, leg) => *row_mut(&mut next.routing, i, "routing leg")? = leg,

            DraftAction::SelectParty { role, code, addresses } => {
                next.parties.select(role, code, addresses)
            }
            DraftAction::SelectPartyAddress { role, address_id } => {
                next.parties.select_address(role, address_id)?
            }
            DraftAction::SetPartyEmail { role, email } => next.parties.set_email(role, email),

            DraftAction::AddCargoLine => {
                if !next.allows_multiple_cargo_lines() {
                    return Err(DomainError::invariant(
                        "only FCL bookings can have more than one cargo line",
                    ));
                }
                next.cargo.push(CargoLine::default());
            }
            DraftAction::RemoveCargoLine(i) => remove_row(&mut next.cargo, i, "cargo line")?,
            DraftAction::UpdateCargoLine(i, field) => {
                if matches!(field, CargoField::ContainerType(_) | CargoField::ContainerCount(_))
                    && next.header.service != Some(ServiceMode::Fcl)
                {
                    return Err(DomainError::validation(
                        "container details apply to FCL bookings only",
                    ));
                }
                row_mut(&mut next.cargo, i, "cargo line")?.set(field);
            }
            DraftAction::RecalculateChargeable => {
                next.recalculate_chargeable();
            }

            DraftAction::SetPickup(details) => next.pickup = details,
            DraftAction::SetDelivery(details) => next.delivery = details,

            DraftAction::AddRateLine => next.rates.push(RateLine::default()),
            DraftAction::RemoveRateLine(i) => remove_row(&mut next.rates, i, "rate line")?,
            DraftAction::UpdateRateLine(i, field) => row_mut(&mut next.rates, i, "rate line")?.set(field),

            DraftAction::SetQuotation(id) => next.quotation_id = id,
        }

        next.fill_routed_by();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookingDraft {
        BookingDraft::new("Priya Nair")
    }

    fn apply(draft: &BookingDraft, actions: &[DraftAction]) -> BookingDraft {
        draft.reduce_all(actions).unwrap()
    }

    fn cargo(i: usize, field: CargoField) -> DraftAction {
        DraftAction::UpdateCargoLine(i, field)
    }

    #[test]
    fn new_draft_has_one_row_per_list() {
        let d = draft();
        assert_eq!(d.routing().len(), 1);
        assert_eq!(d.cargo().len(), 1);
        assert_eq!(d.rates().len(), 1);
        assert!(!d.is_edit());
    }

    #[test]
    fn lcl_booking_derives_chargeable_volume() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetService(Some(ServiceMode::Lcl)),
                cargo(0, CargoField::GrossWeight("1200".into())),
                cargo(0, CargoField::Volume("1.5".into())),
                DraftAction::RecalculateChargeable,
            ],
        );
        assert_eq!(d.cargo()[0].chargeable_volume, Some(1.5));
        assert_eq!(d.cargo()[0].chargeable_weight, None);
    }

    #[test]
    fn air_booking_derives_chargeable_weight() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetService(Some(ServiceMode::Air)),
                cargo(0, CargoField::GrossWeight("80".into())),
                cargo(0, CargoField::VolumeWeight("95".into())),
                DraftAction::RecalculateChargeable,
            ],
        );
        assert_eq!(d.cargo()[0].chargeable_weight, Some(95.0));
        assert_eq!(d.cargo()[0].chargeable_volume, None);
    }

    #[test]
    fn measurement_edit_leaves_chargeable_stale_until_recalculated() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetService(Some(ServiceMode::Air)),
                cargo(0, CargoField::GrossWeight("80".into())),
            ],
        );
        assert!(d.chargeable_is_stale());
        let d = d.reduce(&DraftAction::RecalculateChargeable).unwrap();
        assert!(!d.chargeable_is_stale());
    }

    #[test]
    fn recalculation_is_idempotent() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetService(Some(ServiceMode::Lcl)),
                cargo(0, CargoField::Volume("2".into())),
                DraftAction::RecalculateChargeable,
            ],
        );
        let again = d.reduce(&DraftAction::RecalculateChargeable).unwrap();
        assert_eq!(again, d);
    }

    #[test]
    fn service_switch_nulls_other_derived_field_immediately() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetService(Some(ServiceMode::Lcl)),
                cargo(0, CargoField::GrossWeight("1200".into())),
                cargo(0, CargoField::VolumeWeight("95".into())),
                DraftAction::RecalculateChargeable,
                DraftAction::SetService(Some(ServiceMode::Air)),
            ],
        );
        assert_eq!(d.cargo()[0].chargeable_volume, None);
        assert_eq!(d.cargo()[0].chargeable_weight, None);

        let d = d.reduce(&DraftAction::RecalculateChargeable).unwrap();
        assert_eq!(d.cargo()[0].chargeable_weight, Some(1200.0));
    }

    #[test]
    fn only_fcl_keeps_multiple_cargo_lines() {
        let d = draft();
        assert!(d.reduce(&DraftAction::AddCargoLine).is_err());

        let d = apply(
            &d,
            &[
                DraftAction::SetService(Some(ServiceMode::Fcl)),
                DraftAction::AddCargoLine,
                DraftAction::AddCargoLine,
                cargo(0, CargoField::ContainerType(Some("40HC".into()))),
                cargo(0, CargoField::ContainerCount("2".into())),
            ],
        );
        assert_eq!(d.cargo().len(), 3);

        let d = d.reduce(&DraftAction::SetService(Some(ServiceMode::Lcl))).unwrap();
        assert_eq!(d.cargo().len(), 1);
        assert_eq!(d.cargo()[0].container_type, None);
        assert_eq!(d.cargo()[0].container_count, "");
    }

    #[test]
    fn container_fields_rejected_outside_fcl() {
        let d = apply(&draft(), &[DraftAction::SetService(Some(ServiceMode::Air))]);
        assert!(d.reduce(&cargo(0, CargoField::ContainerCount("1".into()))).is_err());
    }

    #[test]
    fn switching_to_agent_clears_routing_owner_fields() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetRoutedBy("Ravi".into()),
                DraftAction::SetCustomerServiceName("Meena".into()),
                DraftAction::SetRouted(Some(Routed::Agent)),
            ],
        );
        assert_eq!(d.header().routed_by, "");
        assert_eq!(d.header().customer_service_name, "");
    }

    #[test]
    fn switching_to_self_fills_empty_routed_by_with_current_user() {
        let d = apply(&draft(), &[DraftAction::SetRouted(Some(Routed::Own))]);
        assert_eq!(d.header().routed_by, "Priya Nair");

        let d = apply(
            &draft(),
            &[
                DraftAction::SetRoutedBy("Ravi".into()),
                DraftAction::SetRouted(Some(Routed::Own)),
            ],
        );
        assert_eq!(d.header().routed_by, "Ravi");
    }

    #[test]
    fn clearing_routed_by_on_self_booking_restores_current_user() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetRouted(Some(Routed::Own)),
                DraftAction::SetRoutedBy("Ravi".into()),
                DraftAction::SetRoutedBy(String::new()),
            ],
        );
        assert_eq!(d.header().routed_by, "Priya Nair");

        let d = apply(&d, &[DraftAction::SetRoutedBy("   ".into())]);
        assert_eq!(d.header().routed_by, "Priya Nair");
    }

    #[test]
    fn routed_by_stays_empty_when_not_self_routed() {
        let d = apply(
            &draft(),
            &[
                DraftAction::SetRouted(Some(Routed::Agent)),
                DraftAction::SetRoutedBy(String::new()),
            ],
        );
        assert_eq!(d.header().routed_by, "");
        assert_eq!(draft().header().routed_by, "");
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let d = draft();
        for action in [
            DraftAction::RemoveRoutingLeg(0),
            DraftAction::RemoveCargoLine(0),
            DraftAction::RemoveRateLine(0),
        ] {
            match d.reduce(&action) {
                Err(DomainError::InvariantViolation(msg)) => assert!(msg.contains("at least one")),
                other => panic!("expected invariant violation, got {other:?}"),
            }
        }

        let d = apply(&d, &[DraftAction::AddRoutingLeg, DraftAction::RemoveRoutingLeg(0)]);
        assert_eq!(d.routing().len(), 1);
    }

    #[test]
    fn out_of_range_rows_are_not_found() {
        let err = draft()
            .reduce(&DraftAction::UpdateRateLine(3, RateField::Unit("KG".into())))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn rate_line_totals_follow_edits() {
        let d = apply(
            &draft(),
            &[
                DraftAction::UpdateRateLine(0, RateField::NoOfUnits("3".into())),
                DraftAction::UpdateRateLine(0, RateField::SellPerUnit("150.5".into())),
                DraftAction::UpdateRateLine(0, RateField::Roe("1.2".into())),
            ],
        );
        assert_eq!(d.rates()[0].total_sell, "541.80");
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let d = draft();
        let before = d.clone();
        assert!(d.reduce(&DraftAction::RemoveCargoLine(0)).is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn recalculation_triggers() {
        assert!(DraftAction::SetService(None).triggers_recalculation());
        assert!(cargo(0, CargoField::GrossWeight("1".into())).triggers_recalculation());
        assert!(!cargo(1, CargoField::GrossWeight("1".into())).triggers_recalculation());
        assert!(!cargo(0, CargoField::Packages("1".into())).triggers_recalculation());
        assert!(!DraftAction::SetDirect(true).triggers_recalculation());
    }
}
