//! In-process mock of the EHR backend
//!
//! Serves the REST API on an ephemeral port with in-memory records and
//! doctors. Every request is counted and its Authorization header captured,
//! so tests can assert on what the portal sent (or did not send).
//! Mutations echo what they stored unless the backend is switched to
//! acknowledgement-only replies.
//!
//! Seed data:
//! - admin `admin` / `admin123`
//! - doctor `D1` Dr. Meredith Grey, `grey@hospital.test` / `grey1234`
//! - patient record `P100` Jane Doe, attended by `D1`

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use ehr_core::{Credentials, Doctor, EhrRecord, Identity, NewDoctor, RecordUpdate, Role};
use ehr_portal::{FileStorage, Portal, PortalConfig};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const DOCTOR_EMAIL: &str = "grey@hospital.test";
pub const DOCTOR_PASSWORD: &str = "grey1234";
pub const PATIENT_ID: &str = "P100";
pub const PATIENT_NAME: &str = "Jane Doe";
pub const PATIENT_DIAGNOSIS: &str = "Type 2 diabetes mellitus without complications";

// ============================================================================
// Backend state
// ============================================================================

#[derive(Default)]
pub struct MockState {
    records: Mutex<Vec<EhrRecord>>,
    doctors: Mutex<Vec<Doctor>>,
    passwords: Mutex<HashMap<String, String>>,
    sessions: Mutex<HashMap<String, Identity>>,
    requests: AtomicUsize,
    ack_only: AtomicBool,
    auth_headers: Mutex<Vec<(String, Option<String>)>>,
}

impl MockState {
    fn seeded() -> Self {
        let state = MockState::default();
        state.doctors.lock().unwrap().push(Doctor {
            id: Some("doc-1".to_string()),
            doctor_id: "D1".to_string(),
            name: "Dr. Meredith Grey".to_string(),
            email: DOCTOR_EMAIL.to_string(),
            phone_number: "555-0101".to_string(),
            department: "Surgery".to_string(),
            specialization: "General Surgery".to_string(),
            experience: "12 years".to_string(),
        });
        state
            .passwords
            .lock()
            .unwrap()
            .insert(DOCTOR_EMAIL.to_string(), DOCTOR_PASSWORD.to_string());
        state.records.lock().unwrap().push(patient_record(PATIENT_ID, PATIENT_NAME, "D1"));
        state
    }

    /// Total requests received, login included
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// `(path, Authorization header)` for every request, in order
    pub fn auth_headers(&self) -> Vec<(String, Option<String>)> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<EhrRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn doctors(&self) -> Vec<Doctor> {
        self.doctors.lock().unwrap().clone()
    }

    /// Reply to create, update and add-doctor with a bare `{message}`
    /// instead of echoing what was stored
    pub fn acknowledge_only(&self) {
        self.ack_only.store(true, Ordering::SeqCst);
    }

    fn ack(&self, message: &str) -> Option<Response> {
        self.ack_only
            .load(Ordering::SeqCst)
            .then(|| Json(json!({ "message": message })).into_response())
    }

    pub fn insert_record(&self, record: EhrRecord) {
        self.records.lock().unwrap().push(record);
    }

    fn hit(&self, path: &str, headers: &HeaderMap) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push((path.to_string(), auth));
    }

    fn caller(&self, headers: &HeaderMap) -> Result<Identity, Response> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        token
            .and_then(|t| self.sessions.lock().unwrap().get(t).cloned())
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }

    fn issue(&self, identity: Identity) -> Identity {
        let token = format!("token-{}-{}", identity.role, identity.id);
        let identity = identity.with_token(token.clone());
        self.sessions.lock().unwrap().insert(token, identity.clone());
        identity
    }
}

pub fn patient_record(patient_id: &str, name: &str, doctor_id: &str) -> EhrRecord {
    EhrRecord {
        patient_id: patient_id.to_string(),
        name: name.to_string(),
        age: 42,
        gender: "Female".to_string(),
        email: format!("{}@mail.test", patient_id.to_lowercase()),
        phone_number: "555-0199".to_string(),
        diagnosis: PATIENT_DIAGNOSIS.to_string(),
        treatment_plan: "Metformin 500mg twice daily".to_string(),
        doctor_name: "Dr. Meredith Grey".to_string(),
        doctor_id: doctor_id.to_string(),
        ..Default::default()
    }
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

type Shared = Arc<MockState>;

// ============================================================================
// Handlers
// ============================================================================

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Response {
    state.hit("/auth/login", &headers);

    let identity = match credentials {
        Credentials::Admin { username, password } => {
            if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
                return fail(StatusCode::UNAUTHORIZED, "Invalid username or password");
            }
            Identity::new("admin-1", "Administrator", Role::Admin)
        }
        Credentials::Doctor { email, password } => {
            let known = state.passwords.lock().unwrap().get(&email) == Some(&password);
            let doctor = state
                .doctors
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.email == email)
                .cloned();
            match doctor {
                Some(doctor) if known => Identity::new(doctor.doctor_id, doctor.name, Role::Doctor),
                _ => return fail(StatusCode::UNAUTHORIZED, "Invalid email or password"),
            }
        }
        Credentials::Patient { patient_id, name } => {
            let found = state
                .records
                .lock()
                .unwrap()
                .iter()
                .any(|r| r.patient_id == patient_id && r.name == name);
            if !found {
                return fail(StatusCode::NOT_FOUND, "Patient not found");
            }
            Identity::new(patient_id.clone(), name, Role::Patient).with_patient_id(patient_id)
        }
    };

    Json(state.issue(identity)).into_response()
}

async fn create_record(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(record): Json<EhrRecord>,
) -> Response {
    state.hit("/ehr/create", &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }

    let mut records = state.records.lock().unwrap();
    if records.iter().any(|r| r.patient_id == record.patient_id) {
        return fail(StatusCode::CONFLICT, "Record already exists");
    }
    records.push(record.clone());
    if let Some(ack) = state.ack("Record created successfully") {
        return ack;
    }

    // enveloped, unlike the list endpoints
    (StatusCode::CREATED, Json(json!({ "success": true, "data": record }))).into_response()
}

async fn get_record(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(patient_id): Path<String>,
) -> Response {
    state.hit(&format!("/ehr/record/{}", patient_id), &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }
    if patient_id == "boom" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let found = state.records().into_iter().find(|r| r.patient_id == patient_id);
    match found {
        Some(record) => Json(record).into_response(),
        None => fail(StatusCode::NOT_FOUND, "Record not found"),
    }
}

async fn list_records(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.hit("/ehr/queryAll", &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }
    Json(state.records()).into_response()
}

async fn update_record(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(update): Json<RecordUpdate>,
) -> Response {
    state.hit("/ehr/update", &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }

    let mut records = state.records.lock().unwrap();
    let record = match records.iter_mut().find(|r| r.patient_id == update.patient_id) {
        Some(record) => record,
        None => return fail(StatusCode::NOT_FOUND, "Record not found"),
    };

    let merge = |slot: &mut String, value: Option<String>| {
        if let Some(value) = value {
            *slot = value;
        }
    };
    merge(&mut record.name, update.name);
    merge(&mut record.gender, update.gender);
    merge(&mut record.email, update.email);
    merge(&mut record.phone_number, update.phone_number);
    merge(&mut record.diagnosis, update.diagnosis);
    merge(&mut record.treatment_plan, update.treatment_plan);
    merge(&mut record.symptoms, update.symptoms);
    merge(&mut record.medications, update.medications);
    merge(&mut record.allergies, update.allergies);
    merge(&mut record.doctor_name, update.doctor_name);
    merge(&mut record.doctor_id, update.doctor_id);
    if let Some(age) = update.age {
        record.age = age;
    }
    record.updated_at = Some("2026-10-16T09:00:00Z".to_string());
    if let Some(ack) = state.ack("Record updated successfully") {
        return ack;
    }

    Json(record.clone()).into_response()
}

async fn add_doctor(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewDoctor>,
) -> Response {
    state.hit("/ehr/doctor/add", &headers);
    match state.caller(&headers) {
        Ok(caller) if caller.role == Role::Admin => {}
        Ok(_) => return fail(StatusCode::FORBIDDEN, "Admins only"),
        Err(denied) => return denied,
    }

    let mut doctors = state.doctors.lock().unwrap();
    if doctors.iter().any(|d| d.doctor_id == new.doctor_id) {
        return fail(StatusCode::CONFLICT, "Doctor ID already in use");
    }
    let doctor = Doctor {
        id: Some(format!("doc-{}", doctors.len() + 1)),
        doctor_id: new.doctor_id,
        name: new.name,
        email: new.email.clone(),
        phone_number: new.phone_number,
        department: new.department,
        specialization: new.specialization,
        experience: new.experience,
    };
    doctors.push(doctor.clone());
    state.passwords.lock().unwrap().insert(new.email, new.password);
    if let Some(ack) = state.ack("Doctor added successfully") {
        return ack;
    }

    Json(doctor).into_response()
}

async fn list_doctors(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.hit("/ehr/doctor/all", &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }
    Json(state.doctors()).into_response()
}

async fn delete_doctor(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(doctor_id): Path<String>,
) -> Response {
    state.hit(&format!("/ehr/doctor/delete/{}", doctor_id), &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }

    let mut doctors = state.doctors.lock().unwrap();
    let before = doctors.len();
    doctors.retain(|d| d.doctor_id != doctor_id);
    if doctors.len() == before {
        return fail(StatusCode::NOT_FOUND, "Doctor not found");
    }
    Json(json!({ "message": "Doctor deleted" })).into_response()
}

async fn delete_patient(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(patient_id): Path<String>,
) -> Response {
    state.hit(&format!("/ehr/patient/delete/{}", patient_id), &headers);
    if let Err(denied) = state.caller(&headers) {
        return denied;
    }

    let mut records = state.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| r.patient_id != patient_id);
    if records.len() == before {
        return fail(StatusCode::NOT_FOUND, "Patient not found");
    }
    // empty 204 body
    StatusCode::NO_CONTENT.into_response()
}

// ============================================================================
// Server
// ============================================================================

pub struct MockBackend {
    pub url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start() -> MockBackend {
        let state: Shared = Arc::new(MockState::seeded());

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/ehr/create", post(create_record))
            .route("/api/ehr/record/:patient_id", get(get_record))
            .route("/api/ehr/queryAll", get(list_records))
            .route("/api/ehr/update", put(update_record))
            .route("/api/ehr/doctor/add", post(add_doctor))
            .route("/api/ehr/doctor/all", get(list_doctors))
            .route("/api/ehr/doctor/delete/:doctor_id", delete(delete_doctor))
            .route("/api/ehr/patient/delete/:patient_id", delete(delete_patient))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });

        MockBackend {
            url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn requests(&self) -> usize {
        self.state.requests()
    }

    /// Portal against this backend, persisting its session under `dir`
    pub fn portal(&self, dir: &FsPath) -> Portal {
        let config = PortalConfig::default()
            .with_api_url(self.url.clone())
            .with_storage_dir(dir);
        Portal::with_storage(config, Arc::new(FileStorage::new(dir))).unwrap()
    }
}

/// Base URL where nothing listens
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}
