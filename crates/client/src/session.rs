//! Async controller for one booking wizard.
//!
//! Owns the draft (behind a tokio mutex so the debounced recalculation can
//! write to it), the stepper, the debouncer and the submitter. Methods take
//! `&self`, so a session can be shared across tasks; a second submit while
//! one is in flight is rejected with [`SubmitError::Busy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::Mutex;

use freightdesk_booking::{BookingDraft, DraftAction, PartyRole, StepMove, Stepper, WizardStep};
use freightdesk_core::{DomainResult, FieldErrors, Reducer};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::error::{ApiError, ClientError};
use crate::reference::{PartyDirectory, ReferenceCache};
use crate::submit::{BookingSubmitter, Saved, SubmitError};

/// Result of [`WizardSession::next`].
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Moved(WizardStep),
    Submitted(Saved),
}

pub struct WizardSession {
    draft: Arc<Mutex<BookingDraft>>,
    stepper: StdMutex<Stepper>,
    field_errors: StdMutex<FieldErrors>,
    debouncer: Debouncer,
    references: ReferenceCache,
    submitter: BookingSubmitter,
    submitting: AtomicBool,
}

impl WizardSession {
    pub fn new(
        draft: BookingDraft,
        references: ReferenceCache,
        submitter: BookingSubmitter,
        debouncer: Debouncer,
    ) -> Self {
        Self {
            draft: Arc::new(Mutex::new(draft)),
            stepper: StdMutex::new(Stepper::new()),
            field_errors: StdMutex::new(FieldErrors::new()),
            debouncer,
            references,
            submitter,
            submitting: AtomicBool::new(false),
        }
    }

    /// Session for a new booking wired from `config`.
    pub fn from_config(config: &ClientConfig, current_user: impl Into<String>) -> Result<Self, ApiError> {
        Self::for_draft(config, BookingDraft::new(current_user))
    }

    /// Session editing `draft` (e.g. one hydrated from a stored record).
    pub fn for_draft(config: &ClientConfig, draft: BookingDraft) -> Result<Self, ApiError> {
        let api = ApiClient::new(config)?;
        Ok(Self::new(
            draft,
            ReferenceCache::new(api.clone(), config.reference_ttl),
            BookingSubmitter::new(api),
            Debouncer::new(config.debounce),
        ))
    }

    /// Copy of the current draft.
    pub async fn snapshot(&self) -> BookingDraft {
        self.draft.lock().await.clone()
    }

    pub fn current_step(&self) -> WizardStep {
        self.stepper.lock().unwrap_or_else(PoisonError::into_inner).current()
    }

    /// Inline errors from the last blocked step or submit.
    pub fn field_errors(&self) -> FieldErrors {
        self.field_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn recalculation_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply `action`; a rejected action leaves the draft unchanged.
    ///
    /// Service and line-0 measurement edits (re)start the chargeable debounce.
    pub async fn dispatch(&self, action: DraftAction) -> DomainResult<()> {
        {
            let mut draft = self.draft.lock().await;
            *draft = draft.reduce(&action)?;
        }
        if action.triggers_recalculation() {
            let draft = Arc::clone(&self.draft);
            self.debouncer.schedule(async move {
                recalculate(&draft).await;
            });
        }
        Ok(())
    }

    /// Resolve `code`'s addresses for `role`, then select the party.
    ///
    /// An empty code clears the selection without a lookup.
    pub async fn select_party(&self, role: PartyRole, code: &str) -> Result<(), ClientError> {
        let addresses = if code.trim().is_empty() {
            Vec::new()
        } else {
            self.references
                .addresses_for(PartyDirectory::for_role(role), code)
                .await?
        };
        self.dispatch(DraftAction::SelectParty {
            role,
            code: code.to_string(),
            addresses,
        })
        .await?;
        Ok(())
    }

    /// Advance one step, or submit from the last step.
    pub async fn next(&self) -> Result<Progress, SubmitError> {
        let draft = self.snapshot().await;
        let step = {
            let mut stepper = self.stepper.lock().unwrap_or_else(PoisonError::into_inner);
            stepper.next(&draft)
        };
        match step {
            Ok(StepMove::Advanced(step)) => {
                tracing::debug!(step = step.title(), "wizard step advanced");
                self.set_field_errors(FieldErrors::new());
                Ok(Progress::Moved(step))
            }
            Ok(StepMove::Submit) => self.submit().await.map(Progress::Submitted),
            Err(err) => {
                let err = SubmitError::from(err);
                if let Some(errors) = err.field_errors() {
                    self.set_field_errors(errors.clone());
                }
                Err(err)
            }
        }
    }

    /// Go back one step; `false` on the first step.
    pub fn previous(&self) -> bool {
        self.stepper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .previous()
    }

    /// Jump straight to `step` (no validation).
    pub fn goto(&self, step: WizardStep) {
        self.stepper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .goto(step);
    }

    /// Submit the draft. A pending recalculation is applied first.
    pub async fn submit(&self) -> Result<Saved, SubmitError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("duplicate submit ignored");
            return Err(SubmitError::Busy);
        }
        // Cleared on every exit, including when this future is dropped.
        let _in_flight = InFlight(&self.submitting);

        if self.debouncer.cancel() {
            recalculate(&self.draft).await;
        }
        let draft = self.snapshot().await;
        let result = self.submitter.submit(&draft).await;

        match &result {
            Err(err) => {
                if let Some(errors) = err.field_errors() {
                    self.set_field_errors(errors.clone());
                }
            }
            Ok(_) => self.set_field_errors(FieldErrors::new()),
        }
        result
    }

    fn set_field_errors(&self, errors: FieldErrors) {
        *self.field_errors.lock().unwrap_or_else(PoisonError::into_inner) = errors;
    }
}

/// Resets the in-flight submit flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

async fn recalculate(draft: &Mutex<BookingDraft>) {
    let mut draft = draft.lock().await;
    match draft.reduce(&DraftAction::RecalculateChargeable) {
        Ok(next) if next != *draft => {
            let chargeable = next.expected_chargeable();
            tracing::debug!(
                chargeable_weight = ?chargeable.chargeable_weight,
                chargeable_volume = ?chargeable.chargeable_volume,
                "chargeable values updated"
            );
            *draft = next;
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "chargeable recalculation rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightdesk_booking::{CargoField, ServiceMode};
    use freightdesk_core::DomainError;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_at(url: &str) -> WizardSession {
        let api = ApiClient::new(&ClientConfig::new(url)).unwrap();
        WizardSession::new(
            BookingDraft::new("Priya Nair"),
            ReferenceCache::new(api.clone(), Duration::from_secs(60)),
            BookingSubmitter::new(api),
            Debouncer::new(Duration::from_millis(300)),
        )
    }

    fn offline_session() -> WizardSession {
        session_at("http://127.0.0.1:9/")
    }

    #[tokio::test(start_paused = true)]
    async fn measurement_edits_settle_into_one_recalculation() {
        let session = offline_session();
        session.dispatch(DraftAction::SetService(Some(ServiceMode::Lcl))).await.unwrap();
        session
            .dispatch(DraftAction::UpdateCargoLine(0, CargoField::GrossWeight("1200".into())))
            .await
            .unwrap();
        session
            .dispatch(DraftAction::UpdateCargoLine(0, CargoField::Volume("1.5".into())))
            .await
            .unwrap();

        assert!(session.recalculation_pending());
        assert_eq!(session.snapshot().await.cargo()[0].chargeable_volume, None);

        tokio::time::sleep(Duration::from_millis(350)).await;
        let line = session.snapshot().await.cargo()[0].clone();
        assert_eq!(line.chargeable_volume, Some(1.5));
        assert_eq!(line.chargeable_weight, None);
    }

    #[tokio::test(start_paused = true)]
    async fn non_measurement_edits_do_not_schedule() {
        let session = offline_session();
        session
            .dispatch(DraftAction::UpdateCargoLine(0, CargoField::Packages("4".into())))
            .await
            .unwrap();
        assert!(!session.recalculation_pending());
    }

    #[tokio::test]
    async fn rejected_action_leaves_draft_untouched() {
        let session = offline_session();
        let before = session.snapshot().await;
        let err = session.dispatch(DraftAction::RemoveCargoLine(0)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(session.snapshot().await, before);
    }

    #[tokio::test]
    async fn blocked_next_records_inline_errors() {
        let session = offline_session();
        let err = session.next().await.unwrap_err();
        assert!(err.notice().is_error());
        assert!(session.field_errors().contains("customer"));
        assert_eq!(session.current_step(), WizardStep::Booking);

        session.goto(WizardStep::Rates);
        assert_eq!(session.current_step(), WizardStep::Rates);
        assert!(session.previous());
        assert_eq!(session.current_step(), WizardStep::PickupDelivery);
    }

    #[tokio::test]
    async fn party_selection_resolves_addresses_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/consignees/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"code": "CON9", "name": "Gulf Traders", "addresses_data": [{"id": 5, "address": "Plot 12"}]}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_at(&server.uri());
        session.select_party(PartyRole::Consignee, "CON9").await.unwrap();

        let draft = session.snapshot().await;
        let consignee = draft.parties().get(PartyRole::Consignee).unwrap();
        assert_eq!(consignee.addresses.len(), 1);
        assert_eq!(consignee.address_id, Some(5));

        let err = session.select_party(PartyRole::Consignee, "NOPE").await.unwrap_err();
        assert!(matches!(err, ClientError::Domain(DomainError::NotFound(_))));
        assert_eq!(session.snapshot().await.parties().code(PartyRole::Consignee), "CON9");
    }
}
