//! Wizard step navigation.

use serde::{Deserialize, Serialize};

use freightdesk_core::DomainResult;

use crate::draft::BookingDraft;
use crate::validation::validate_required;

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Booking = 0,
    Parties = 1,
    Cargo = 2,
    PickupDelivery = 3,
    Rates = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Booking,
        WizardStep::Parties,
        WizardStep::Cargo,
        WizardStep::PickupDelivery,
        WizardStep::Rates,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Booking => "Booking",
            WizardStep::Parties => "Parties",
            WizardStep::Cargo => "Cargo",
            WizardStep::PickupDelivery => "Pickup / Delivery",
            WizardStep::Rates => "Rates",
        }
    }

    pub fn is_last(self) -> bool {
        self == WizardStep::Rates
    }
}

/// Outcome of pressing "Next".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMove {
    /// Moved to the given step.
    Advanced(WizardStep),
    /// Already on the last step; the caller should submit.
    Submit,
}

/// Tracks the active step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stepper {
    current: WizardStep,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    /// Advance, gated on the required booking fields when leaving step 0.
    ///
    /// On the last step nothing moves and [`StepMove::Submit`] is returned;
    /// the step stays active while submission runs.
    pub fn next(&mut self, draft: &BookingDraft) -> DomainResult<StepMove> {
        if self.current == WizardStep::Booking {
            validate_required(draft).into_result()?;
        }
        match WizardStep::from_index(self.current.index() + 1) {
            Some(step) => {
                self.current = step;
                Ok(StepMove::Advanced(step))
            }
            None => Ok(StepMove::Submit),
        }
    }

    /// Go back one step; returns `false` when already on the first step.
    pub fn previous(&mut self) -> bool {
        match self.current.index().checked_sub(1).and_then(WizardStep::from_index) {
            Some(step) => {
                self.current = step;
                true
            }
            None => false,
        }
    }

    /// Jump to any step (step header click). Not validated.
    pub fn goto(&mut self, step: WizardStep) {
        self.current = step;
    }
}
