//! Record Service Client
//!
//! Thin HTTP wrapper over the backend REST API. One method per endpoint;
//! every method returns an `ApiResponse` and never an error. Each call is a
//! fresh request: no retries, no timeout policy, no caching.
//!
//! | Operation       | Method & Path                          |
//! |-----------------|----------------------------------------|
//! | Login           | POST /auth/login                       |
//! | Create record   | POST /ehr/create                       |
//! | Get one record  | GET /ehr/record/{patientId}            |
//! | List records    | GET /ehr/queryAll                      |
//! | Update record   | PUT /ehr/update                        |
//! | Add doctor      | POST /ehr/doctor/add                   |
//! | List doctors    | GET /ehr/doctor/all                    |
//! | Delete doctor   | DELETE /ehr/doctor/delete/{doctorId}   |
//! | Delete patient  | DELETE /ehr/patient/delete/{patientId} |

use crate::error::{PortalError, Result};
use crate::response::{from_error_body, from_success_body, ApiResponse};
use crate::storage::{SessionStorage, SESSION_KEY};
use ehr_core::{Credentials, Doctor, EhrRecord, Identity, NewDoctor, RecordUpdate};
use log::{debug, warn};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub struct RecordServiceClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
}

impl RecordServiceClient {
    /// Create a client for `api_url` (e.g. `http://localhost:3000/api`).
    ///
    /// The bearer token is read from `storage` on every request, so a
    /// login or logout takes effect on the very next call.
    pub fn new(api_url: &str, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let invalid = |reason: String| PortalError::InvalidUrl {
            url: api_url.to_string(),
            reason,
        };

        let base_url = Url::parse(api_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }

        Ok(RecordServiceClient {
            http: reqwest::Client::new(),
            base_url,
            storage,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// `POST /auth/login`; the only call sent without a bearer token
    pub async fn login(&self, credentials: &Credentials) -> ApiResponse<Identity> {
        let request = self
            .request(Method::POST, &["auth", "login"], false)
            .json(credentials);
        self.execute("login", request).await
    }

    // =========================================================================
    // EHR records
    // =========================================================================

    /// Mutations return the raw acknowledgement; backends may echo the
    /// stored record or reply with a bare `{message}`.
    pub async fn create_record(&self, record: &EhrRecord) -> ApiResponse<Value> {
        if record.patient_id.trim().is_empty() {
            return ApiResponse::failure("Patient ID is required");
        }
        let request = self.request(Method::POST, &["ehr", "create"], true).json(record);
        self.execute("create record", request).await
    }

    pub async fn get_record(&self, patient_id: &str) -> ApiResponse<EhrRecord> {
        if patient_id.trim().is_empty() {
            return ApiResponse::failure("Patient ID is required");
        }
        let request = self.request(Method::GET, &["ehr", "record", patient_id], true);
        self.execute("get record", request).await
    }

    pub async fn list_records(&self) -> ApiResponse<Vec<EhrRecord>> {
        let request = self.request(Method::GET, &["ehr", "queryAll"], true);
        self.execute("list records", request).await
    }

    pub async fn update_record(&self, update: &RecordUpdate) -> ApiResponse<Value> {
        if let Err(e) = update.validate() {
            return ApiResponse::failure(e.message);
        }
        let request = self.request(Method::PUT, &["ehr", "update"], true).json(update);
        self.execute("update record", request).await
    }

    // =========================================================================
    // Doctors and patients (admin)
    // =========================================================================

    pub async fn add_doctor(&self, doctor: &NewDoctor) -> ApiResponse<Value> {
        let request = self.request(Method::POST, &["ehr", "doctor", "add"], true).json(doctor);
        self.execute("add doctor", request).await
    }

    pub async fn list_doctors(&self) -> ApiResponse<Vec<Doctor>> {
        let request = self.request(Method::GET, &["ehr", "doctor", "all"], true);
        self.execute("list doctors", request).await
    }

    pub async fn delete_doctor(&self, doctor_id: &str) -> ApiResponse<Value> {
        if doctor_id.trim().is_empty() {
            return ApiResponse::failure("Doctor ID is required");
        }
        let request = self.request(Method::DELETE, &["ehr", "doctor", "delete", doctor_id], true);
        self.execute("delete doctor", request).await
    }

    pub async fn delete_patient(&self, patient_id: &str) -> ApiResponse<Value> {
        if patient_id.trim().is_empty() {
            return ApiResponse::failure("Patient ID is required");
        }
        let request = self.request(
            Method::DELETE,
            &["ehr", "patient", "delete", patient_id],
            true,
        );
        self.execute("delete patient", request).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Base URL plus percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], authorized: bool) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!("{} {}", method, url);

        let request = self.http.request(method, url);
        if !authorized {
            return request;
        }
        match self.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Token of the persisted identity, if any
    fn bearer_token(&self) -> Option<String> {
        let raw = match self.storage.get_item(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                debug!("session storage unreadable, sending request without token: {}", e);
                return None;
            }
        };
        serde_json::from_str::<Identity>(&raw).ok()?.token
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> ApiResponse<T> {
        match dispatch(request).await {
            Ok(response) => {
                if !response.success {
                    warn!("{} rejected: {}", operation, response.message_or("no message"));
                }
                response
            }
            Err(e) => {
                warn!("{} failed: {}", operation, e);
                ApiResponse::failure(e.to_string())
            }
        }
    }
}

async fn dispatch<T: DeserializeOwned>(request: RequestBuilder) -> Result<ApiResponse<T>> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        Ok(from_success_body(&body))
    } else {
        Ok(from_error_body(status.as_u16(), status.canonical_reason(), &body))
    }
}
