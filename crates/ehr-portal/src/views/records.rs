//! Doctor's patient-records page
//!
//! Lists every record (not only the doctor's own patients), and creates or
//! edits records stamped with the signed-in doctor.

use super::{
    admit, status_for, write_access_denied, write_alert, ViewStatus, ACCESS_DENIED_MESSAGE,
};
use crate::client::RecordServiceClient;
use ehr_core::search::filter_records;
use ehr_core::{EhrRecord, Identity, RecordForm, RecordUpdate, Role};
use log::debug;
use std::fmt;

#[derive(Debug)]
pub struct RecordsView {
    doctor: Option<Identity>,
    status: ViewStatus,
    records: Vec<EhrRecord>,
    error: Option<String>,
    form_error: Option<String>,
    search: String,
}

impl RecordsView {
    /// Page state before the first fetch
    pub fn new(identity: Option<&Identity>) -> Self {
        let doctor = admit(identity, Role::Doctor);
        RecordsView {
            status: status_for(&doctor),
            doctor,
            records: Vec::new(),
            error: None,
            form_error: None,
            search: String::new(),
        }
    }

    /// Build the page and fetch the records if the viewer is a doctor
    pub async fn mount(identity: Option<&Identity>, client: &RecordServiceClient) -> Self {
        let mut view = RecordsView::new(identity);
        view.refresh(client).await;
        view
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn records(&self) -> &[EhrRecord] {
        &self.records
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

    /// Records matching the search term by name, patient id or diagnosis
    pub fn visible(&self) -> Vec<&EhrRecord> {
        filter_records(&self.records, &self.search)
    }

    pub fn find(&self, patient_id: &str) -> Option<&EhrRecord> {
        self.records.iter().find(|r| r.patient_id == patient_id)
    }

    /// Blank create form attributed to the doctor
    pub fn new_form(&self) -> Option<RecordForm> {
        self.doctor.as_ref().map(RecordForm::for_doctor)
    }

    /// Edit form for an existing record
    pub fn edit_form(&self, patient_id: &str) -> Option<RecordForm> {
        let doctor = self.doctor.as_ref()?;
        self.find(patient_id).map(|r| RecordForm::from_record(r, doctor))
    }

    pub async fn refresh(&mut self, client: &RecordServiceClient) {
        if self.doctor.is_none() {
            debug!("records page: access denied, skipping fetch");
            return;
        }

        self.error = None;
        match client.list_records().await.into_result("Failed to fetch records") {
            Ok(records) => self.records = records,
            Err(message) => self.error = Some(message),
        }
        self.status = ViewStatus::Ready;
    }

    /// Submit a new record; the list is re-fetched on success
    pub async fn create(&mut self, client: &RecordServiceClient, form: &RecordForm) -> bool {
        let doctor = match &self.doctor {
            Some(doctor) => doctor,
            None => return self.deny(),
        };

        // The record is always attributed to whoever is submitting it
        let mut form = form.clone();
        form.doctor_name = doctor.name.clone();
        form.doctor_id = doctor.id.clone();

        self.form_error = None;
        let record = match form.validate() {
            Ok(record) => record,
            Err(e) => {
                self.form_error = Some(e.message);
                return false;
            }
        };

        let response = client.create_record(&record).await;
        if response.success {
            self.refresh(client).await;
            true
        } else {
            self.form_error = Some(response.message_or("Failed to create record").to_string());
            false
        }
    }

    /// Save edits to the record `patient_id`; the key itself cannot change
    pub async fn update(
        &mut self,
        client: &RecordServiceClient,
        patient_id: &str,
        form: &RecordForm,
    ) -> bool {
        let doctor = match &self.doctor {
            Some(doctor) => doctor,
            None => return self.deny(),
        };

        let mut form = form.clone();
        form.patient_id = patient_id.to_string();
        form.doctor_name = doctor.name.clone();
        form.doctor_id = doctor.id.clone();

        self.form_error = None;
        let update = match form.validate() {
            Ok(record) => RecordUpdate::from(record),
            Err(e) => {
                self.form_error = Some(e.message);
                return false;
            }
        };

        let response = client.update_record(&update).await;
        if response.success {
            self.refresh(client).await;
            true
        } else {
            self.form_error = Some(response.message_or("Failed to update record").to_string());
            false
        }
    }

    fn deny(&mut self) -> bool {
        self.form_error = Some(ACCESS_DENIED_MESSAGE.to_string());
        false
    }
}

impl fmt::Display for RecordsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == ViewStatus::AccessDenied {
            return write_access_denied(f);
        }

        writeln!(f, "Patient Records")?;
        write_alert(f, "error", self.error())?;
        write_alert(f, "form", self.form_error())?;

        let visible = self.visible();
        if visible.is_empty() {
            return writeln!(f, "No records found");
        }

        writeln!(
            f,
            "{:<12} {:<24} {:>4} {:<8} {:<30}",
            "PATIENT ID", "NAME", "AGE", "GENDER", "DIAGNOSIS"
        )?;
        for record in visible {
            writeln!(
                f,
                "{:<12} {:<24} {:>4} {:<8} {:<30}",
                record.patient_id,
                record.name,
                record.age,
                record.gender,
                super::truncate(&record.diagnosis, 30)
            )?;
        }
        Ok(())
    }
}
