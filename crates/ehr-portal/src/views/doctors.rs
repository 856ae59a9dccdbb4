//! Admin doctor management page

use super::{
    admit, status_for, write_access_denied, write_alert, ViewStatus, ACCESS_DENIED_MESSAGE,
};
use crate::client::RecordServiceClient;
use ehr_core::search::filter_doctors;
use ehr_core::{Doctor, Identity, NewDoctor, Role};
use log::debug;
use std::fmt;

#[derive(Debug)]
pub struct DoctorsView {
    admin: Option<Identity>,
    status: ViewStatus,
    doctors: Vec<Doctor>,
    error: Option<String>,
    form_error: Option<String>,
    search: String,
}

impl DoctorsView {
    pub fn new(identity: Option<&Identity>) -> Self {
        let admin = admit(identity, Role::Admin);
        DoctorsView {
            status: status_for(&admin),
            admin,
            doctors: Vec::new(),
            error: None,
            form_error: None,
            search: String::new(),
        }
    }

    pub async fn mount(identity: Option<&Identity>, client: &RecordServiceClient) -> Self {
        let mut view = DoctorsView::new(identity);
        view.refresh(client).await;
        view
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn visible(&self) -> Vec<&Doctor> {
        filter_doctors(&self.doctors, &self.search)
    }

    pub async fn refresh(&mut self, client: &RecordServiceClient) {
        if self.admin.is_none() {
            debug!("doctors page: access denied, skipping fetch");
            return;
        }

        self.error = None;
        match client.list_doctors().await.into_result("Failed to fetch doctors") {
            Ok(doctors) => self.doctors = doctors,
            Err(message) => self.error = Some(message),
        }
        self.status = ViewStatus::Ready;
    }

    /// Register a doctor account; on success the list is re-fetched
    pub async fn add(&mut self, client: &RecordServiceClient, doctor: &NewDoctor) -> bool {
        if self.admin.is_none() {
            self.form_error = Some(ACCESS_DENIED_MESSAGE.to_string());
            return false;
        }

        self.form_error = None;
        if let Err(e) = doctor.validate() {
            self.form_error = Some(e.message);
            return false;
        }

        let response = client.add_doctor(doctor).await;
        if !response.success {
            self.form_error = Some(response.message_or("Failed to add doctor").to_string());
            return false;
        }

        self.refresh(client).await;
        true
    }

    pub async fn delete(&mut self, client: &RecordServiceClient, doctor_id: &str) -> bool {
        if self.admin.is_none() {
            self.error = Some(ACCESS_DENIED_MESSAGE.to_string());
            return false;
        }

        let response = client.delete_doctor(doctor_id).await;
        if !response.success {
            self.error = Some(response.message_or("Failed to delete doctor").to_string());
            return false;
        }

        self.refresh(client).await;
        true
    }
}

impl fmt::Display for DoctorsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == ViewStatus::AccessDenied {
            return write_access_denied(f);
        }

        writeln!(f, "Doctors")?;
        write_alert(f, "error", self.error())?;
        write_alert(f, "form", self.form_error())?;

        let visible = self.visible();
        if visible.is_empty() {
            return writeln!(f, "No doctors found");
        }

        writeln!(
            f,
            "{:<10} {:<24} {:<28} {:<16} {:<16}",
            "ID", "NAME", "EMAIL", "DEPARTMENT", "SPECIALIZATION"
        )?;
        for doctor in visible {
            writeln!(
                f,
                "{:<10} {:<24} {:<28} {:<16} {:<16}",
                doctor.doctor_id,
                doctor.name,
                doctor.email,
                doctor.department,
                doctor.specialization
            )?;
        }
        Ok(())
    }
}
