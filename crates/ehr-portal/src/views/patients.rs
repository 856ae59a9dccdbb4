//! Admin patient list
//!
//! Patients are the records themselves; deleting a patient removes their
//! record on the backend.

use super::{
    admit, status_for, write_access_denied, write_alert, ViewStatus, ACCESS_DENIED_MESSAGE,
};
use crate::client::RecordServiceClient;
use ehr_core::search::filter_patients;
use ehr_core::{EhrRecord, Identity, Role};
use log::debug;
use std::fmt;

#[derive(Debug)]
pub struct PatientsView {
    admin: Option<Identity>,
    status: ViewStatus,
    patients: Vec<EhrRecord>,
    error: Option<String>,
    search: String,
}

impl PatientsView {
    pub fn new(identity: Option<&Identity>) -> Self {
        let admin = admit(identity, Role::Admin);
        PatientsView {
            status: status_for(&admin),
            admin,
            patients: Vec::new(),
            error: None,
            search: String::new(),
        }
    }

    pub async fn mount(identity: Option<&Identity>, client: &RecordServiceClient) -> Self {
        let mut view = PatientsView::new(identity);
        view.refresh(client).await;
        view
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn patients(&self) -> &[EhrRecord] {
        &self.patients
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Patients matching by name, email, diagnosis or patient id
    pub fn visible(&self) -> Vec<&EhrRecord> {
        filter_patients(&self.patients, &self.search)
    }

    pub async fn refresh(&mut self, client: &RecordServiceClient) {
        if self.admin.is_none() {
            debug!("patients page: access denied, skipping fetch");
            return;
        }

        self.error = None;
        match client.list_records().await.into_result("Failed to fetch patients") {
            Ok(patients) => self.patients = patients,
            Err(message) => self.error = Some(message),
        }
        self.status = ViewStatus::Ready;
    }

    pub async fn delete(&mut self, client: &RecordServiceClient, patient_id: &str) -> bool {
        if self.admin.is_none() {
            self.error = Some(ACCESS_DENIED_MESSAGE.to_string());
            return false;
        }

        let response = client.delete_patient(patient_id).await;
        if !response.success {
            self.error = Some(response.message_or("Failed to delete patient").to_string());
            return false;
        }

        self.refresh(client).await;
        true
    }
}

impl fmt::Display for PatientsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == ViewStatus::AccessDenied {
            return write_access_denied(f);
        }

        writeln!(f, "Patients")?;
        write_alert(f, "error", self.error())?;

        let visible = self.visible();
        if visible.is_empty() {
            return writeln!(f, "No patients found");
        }

        writeln!(
            f,
            "{:<12} {:<24} {:<28} {:<20} {:<20}",
            "PATIENT ID", "NAME", "EMAIL", "DOCTOR", "DIAGNOSIS"
        )?;
        for patient in visible {
            writeln!(
                f,
                "{:<12} {:<24} {:<28} {:<20} {:<20}",
                patient.patient_id,
                patient.name,
                patient.email,
                patient.doctor_name,
                super::truncate(&patient.diagnosis, 20)
            )?;
        }
        Ok(())
    }
}
