//! Export booking domain module.
//!
//! Business rules for the export shipment wizard, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage): the draft and its
//! reducer, chargeable weight/volume derivation, rate totals, party address
//! resolution, step navigation, validation and payload assembly.

pub mod cargo;
pub mod chargeable;
pub mod draft;
pub mod parties;
pub mod payload;
pub mod rates;
pub mod record;
pub mod routing;
pub mod service;
pub mod stepper;
pub mod validation;

pub use cargo::{CargoField, CargoLine};
pub use chargeable::{Chargeable, Measurements};
pub use draft::{BookingDraft, BookingHeader, DraftAction, HaulageDetails};
pub use parties::{PartyAddress, PartyDirectoryEntry, PartyRole, PartySelection};
pub use payload::{BookingPayload, BOOKING_ENDPOINT, assemble};
pub use rates::{RateField, RateLine};
pub use routing::{CarrierSchedule, RoutingLeg};
pub use service::{Freight, Routed, ServiceMode};
pub use stepper::{StepMove, Stepper, WizardStep};
pub use validation::validate_required;
