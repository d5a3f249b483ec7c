//! Booking submission and sequential batch posting.
//!
//! A booking is assembled and validated locally first; a validation failure
//! never reaches the network. Create is a POST, edit a PUT, both to the
//! booking endpoint. Failures are reported once as a [`Notice`] and are not
//! retried.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use freightdesk_booking::{BOOKING_ENDPOINT, BookingDraft, assemble};
use freightdesk_core::{DomainError, FieldErrors};

use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Required fields missing; per-field messages for inline display.
    #[error("Please fill in all required fields")]
    Invalid(FieldErrors),
    /// Domain rule other than field presence.
    #[error("Booking rejected: {0}")]
    Rejected(DomainError),
    #[error("Error submitting booking: {0}")]
    Api(#[from] ApiError),
    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    Busy,
}

impl SubmitError {
    /// The single summary notification for this failure.
    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<DomainError> for SubmitError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Fields(errors) => SubmitError::Invalid(errors),
            other => SubmitError::Rejected(other),
        }
    }
}

/// Successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    /// Id from the response, or the edited booking's id.
    pub booking_id: Option<i64>,
    pub response: Value,
    pub notice: Notice,
}

#[derive(Debug, Clone)]
pub struct BookingSubmitter {
    api: ApiClient,
}

impl BookingSubmitter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate, assemble and send `draft`.
    pub async fn submit(&self, draft: &BookingDraft) -> Result<Saved, SubmitError> {
        let payload = match assemble(draft) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::info!(error = %err, "booking submission blocked by validation");
                return Err(err.into());
            }
        };

        let editing = draft.is_edit();
        let result = if editing {
            self.api.put(BOOKING_ENDPOINT, &payload).await
        } else {
            self.api.post(BOOKING_ENDPOINT, &payload).await
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, booking_id = ?draft.booking_id(), "booking submission failed");
                return Err(err.into());
            }
        };

        let booking_id = response
            .get("id")
            .and_then(Value::as_i64)
            .or(draft.booking_id());
        tracing::info!(?booking_id, editing, "booking saved");

        let notice = if editing {
            Notice::success("Booking updated successfully")
        } else {
            Notice::success("Booking created successfully")
        };
        Ok(Saved {
            booking_id,
            response,
            notice,
        })
    }
}

/// One POST in a sequential batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRequest {
    pub path: String,
    pub body: Value,
}

impl BatchRequest {
    pub fn new(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            body,
        }
    }
}

/// Outcome of [`submit_sequence`].
#[derive(Debug)]
pub struct BatchReport {
    /// Requests that succeeded, in order. They stay persisted on failure.
    pub persisted: usize,
    pub total: usize,
    /// Index and error of the request that stopped the batch.
    pub failure: Option<(usize, ApiError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn notice(&self) -> Notice {
        match &self.failure {
            None => Notice::success(format!("Saved {} records", self.persisted)),
            Some((_, err)) => Notice::error(format!(
                "Saved {} of {} records before an error: {err}",
                self.persisted, self.total
            )),
        }
    }
}

/// POST each request in order, stopping at the first failure.
///
/// There is no rollback: requests before the failure remain persisted.
pub async fn submit_sequence(api: &ApiClient, requests: &[BatchRequest]) -> BatchReport {
    let total = requests.len();
    for (index, request) in requests.iter().enumerate() {
        if let Err(err) = api.post(&request.path, &request.body).await {
            tracing::warn!(index, total, path = %request.path, error = %err, "batch submission stopped");
            return BatchReport {
                persisted: index,
                total,
                failure: Some((index, err)),
            };
        }
    }
    tracing::info!(total, "batch submission complete");
    BatchReport {
        persisted: total,
        total,
        failure: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use freightdesk_booking::{DraftAction, ServiceMode};
    use freightdesk_core::Reducer;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submitter_for(server: &MockServer) -> BookingSubmitter {
        BookingSubmitter::new(ApiClient::new(&ClientConfig::new(server.uri())).unwrap())
    }

    fn complete_draft() -> BookingDraft {
        use freightdesk_booking::{Freight, Routed};
        BookingDraft::new("Priya Nair")
            .reduce_all(&[
                DraftAction::SetCustomer { code: "CUST01".into(), name: "Acme Exports".into() },
                DraftAction::SetService(Some(ServiceMode::Lcl)),
                DraftAction::SetBookingDate(chrono::NaiveDate::from_ymd_opt(2024, 3, 5)),
                DraftAction::SetOrigin { code: "INNSA".into(), name: "Nhava Sheva".into() },
                DraftAction::SetDestination { code: "AEJEA".into(), name: "Jebel Ali".into() },
                DraftAction::SetShipmentTerms("FOB".into()),
                DraftAction::SetFreight(Some(Freight::Prepaid)),
                DraftAction::SetRouted(Some(Routed::Own)),
                DraftAction::SetCustomerServiceName("Meena".into()),
            ])
            .unwrap()
    }

    #[tokio::test]
    async fn new_booking_is_posted_with_export_markers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customer-service-shipment/"))
            .and(body_partial_json(json!({
                "service_type": "EXPORT",
                "import_to_export": false,
                "customer": "CUST01",
                "date": "2024-03-05",
                "routed_by": "Priya Nair"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 88})))
            .expect(1)
            .mount(&server)
            .await;

        let saved = submitter_for(&server).submit(&complete_draft()).await.unwrap();
        assert_eq!(saved.booking_id, Some(88));
        assert_eq!(saved.notice, Notice::success("Booking created successfully"));
    }

    #[tokio::test]
    async fn edited_booking_is_put_with_its_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/customer-service-shipment/"))
            .and(body_partial_json(json!({"id": 314})))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(1)
            .mount(&server)
            .await;

        let record = serde_json::to_value(assemble(&complete_draft()).unwrap()).unwrap();
        let mut record = record.as_object().unwrap().clone();
        record.insert("id".into(), json!(314));
        let draft = BookingDraft::from_record(&Value::Object(record), "Priya Nair");

        let saved = submitter_for(&server).submit(&draft).await.unwrap();
        assert_eq!(saved.booking_id, Some(314));
        assert_eq!(saved.notice.message, "Booking updated successfully");
    }

    #[tokio::test]
    async fn missing_required_fields_never_reach_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let draft = complete_draft()
            .reduce(&DraftAction::SetCustomer { code: String::new(), name: String::new() })
            .unwrap();
        let err = submitter_for(&server).submit(&draft).await.unwrap_err();

        assert!(err.notice().is_error());
        assert!(err.field_errors().unwrap().contains("customer"));
    }

    #[tokio::test]
    async fn api_failure_interpolates_raw_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let err = submitter_for(&server).submit(&complete_draft()).await.unwrap_err();
        let notice = err.notice();
        assert!(notice.is_error());
        assert!(notice.message.contains("database unavailable"));
    }

    #[tokio::test]
    async fn sequence_stops_at_first_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/profiling/"))
            .and(body_partial_json(json!({"seq": 2})))
            .respond_with(ResponseTemplate::new(400).set_body_string("duplicate"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/profiling/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/pipeline/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
        let requests = vec![
            BatchRequest::new("profiling/", json!({"seq": 0})),
            BatchRequest::new("profiling/", json!({"seq": 1})),
            BatchRequest::new("profiling/", json!({"seq": 2})),
            BatchRequest::new("pipeline/", json!({"seq": 3})),
        ];
        let report = submit_sequence(&api, &requests).await;

        assert_eq!(report.persisted, 2);
        assert!(!report.is_complete());
        assert!(matches!(report.failure, Some((2, ApiError::Api(400, _)))));
        assert!(report.notice().message.starts_with("Saved 2 of 4"));
    }

    #[tokio::test]
    async fn complete_sequence_reports_every_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
        let requests = vec![
            BatchRequest::new("profiling/", json!({})),
            BatchRequest::new("pipeline/", json!({})),
        ];
        let report = submit_sequence(&api, &requests).await;
        assert!(report.is_complete());
        assert_eq!(report.notice(), Notice::success("Saved 2 records"));
    }
}
