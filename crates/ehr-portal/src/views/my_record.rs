//! Patient's own record, read-only

use super::{admit, status_for, write_access_denied, write_alert, ViewStatus};
use crate::client::RecordServiceClient;
use ehr_core::{EhrRecord, Identity, Role};
use log::{debug, warn};
use std::fmt;

const FETCH_FAILED: &str = "Failed to fetch your medical record";

#[derive(Debug)]
pub struct MyRecordView {
    patient: Option<Identity>,
    status: ViewStatus,
    record: Option<EhrRecord>,
    error: Option<String>,
}

impl MyRecordView {
    pub fn new(identity: Option<&Identity>) -> Self {
        let patient = admit(identity, Role::Patient);
        MyRecordView {
            status: status_for(&patient),
            patient,
            record: None,
            error: None,
        }
    }

    pub async fn mount(identity: Option<&Identity>, client: &RecordServiceClient) -> Self {
        let mut view = MyRecordView::new(identity);
        view.refresh(client).await;
        view
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn record(&self) -> Option<&EhrRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the record keyed by the patient's own id
    pub async fn refresh(&mut self, client: &RecordServiceClient) {
        let key = match &self.patient {
            Some(patient) => patient.record_key().map(str::to_string),
            None => {
                debug!("my-record page: access denied, skipping fetch");
                return;
            }
        };

        self.error = None;
        self.status = ViewStatus::Ready;

        let key = match key {
            Some(key) => key,
            None => {
                warn!("patient identity carries no record key");
                self.error = Some(FETCH_FAILED.to_string());
                return;
            }
        };

        match client.get_record(&key).await.into_result(FETCH_FAILED) {
            Ok(record) => self.record = Some(record),
            Err(message) => self.error = Some(message),
        }
    }
}

impl fmt::Display for MyRecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == ViewStatus::AccessDenied {
            return write_access_denied(f);
        }

        writeln!(f, "My Medical Record")?;
        write_alert(f, "error", self.error())?;

        let record = match &self.record {
            Some(record) => record,
            None => return writeln!(f, "No medical record found"),
        };

        write!(f, "{}", RecordDetails(record))
    }
}

/// Full field listing of one record
pub struct RecordDetails<'a>(pub &'a EhrRecord);

impl fmt::Display for RecordDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let optional = |value: &str| if value.is_empty() { "None" } else { value }.to_string();
        let rows = [
            ("Patient ID", record.patient_id.clone()),
            ("Name", record.name.clone()),
            ("Age", record.age.to_string()),
            ("Gender", record.gender.clone()),
            ("Email", record.email.clone()),
            ("Phone", record.phone_number.clone()),
            ("Diagnosis", record.diagnosis.clone()),
            ("Treatment Plan", record.treatment_plan.clone()),
            ("Symptoms", optional(&record.symptoms)),
            ("Medications", optional(&record.medications)),
            ("Allergies", optional(&record.allergies)),
            ("Attending Doctor", optional(&record.doctor_name)),
        ];
        for (label, value) in rows {
            writeln!(f, "{:<18} {}", format!("{}:", label), value)?;
        }
        if let Some(updated) = &record.updated_at {
            writeln!(f, "{:<18} {}", "Last Updated:", updated)?;
        }
        Ok(())
    }
}
