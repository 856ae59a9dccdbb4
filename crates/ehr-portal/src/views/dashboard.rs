//! Landing page for every signed-in role
//!
//! - admin: doctor, patient and record counts plus recent records
//! - doctor: own-patient and record counts plus recent records
//! - patient: a pointer to the My Record page, nothing fetched

use super::{truncate, write_alert, ViewStatus};
use crate::client::RecordServiceClient;
use crate::gate::Route;
use ehr_core::{EhrRecord, Identity, Role};
use log::warn;
use std::fmt;

/// How many records the "Recent Patient Records" panel shows
pub const RECENT_LIMIT: usize = 5;
const DIAGNOSIS_PREVIEW: usize = 30;
const LOAD_FAILED: &str = "Failed to load dashboard data";

/// Stat cards shown for a role
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardStats {
    Admin {
        total_doctors: usize,
        total_patients: usize,
        total_records: usize,
        active_treatments: usize,
    },
    Doctor {
        my_patients: usize,
        total_records: usize,
    },
    Patient,
}

impl DashboardStats {
    /// Derive the cards from whatever was fetched
    pub fn compute(identity: &Identity, records: &[EhrRecord], doctors: usize) -> Self {
        match identity.role {
            // every record is one patient under treatment
            Role::Admin => DashboardStats::Admin {
                total_doctors: doctors,
                total_patients: records.len(),
                total_records: records.len(),
                active_treatments: records.len(),
            },
            Role::Doctor => DashboardStats::Doctor {
                my_patients: records.iter().filter(|r| r.doctor_id == identity.id).count(),
                total_records: records.len(),
            },
            Role::Patient => DashboardStats::Patient,
        }
    }

    fn cards(&self) -> Vec<(&'static str, usize)> {
        match *self {
            DashboardStats::Admin {
                total_doctors,
                total_patients,
                total_records,
                active_treatments,
            } => vec![
                ("Total Doctors", total_doctors),
                ("Total Patients", total_patients),
                ("Total Records", total_records),
                ("Active Treatments", active_treatments),
            ],
            DashboardStats::Doctor {
                my_patients,
                total_records,
            } => vec![("My Patients", my_patients), ("Total Records", total_records)],
            DashboardStats::Patient => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct DashboardView {
    identity: Identity,
    status: ViewStatus,
    records: Vec<EhrRecord>,
    doctor_count: usize,
    error: Option<String>,
}

impl DashboardView {
    pub fn new(identity: &Identity) -> Self {
        DashboardView {
            identity: identity.clone(),
            status: ViewStatus::Idle,
            records: Vec::new(),
            doctor_count: 0,
            error: None,
        }
    }

    pub async fn mount(identity: &Identity, client: &RecordServiceClient) -> Self {
        let mut view = DashboardView::new(identity);
        view.refresh(client).await;
        view
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.identity, &self.records, self.doctor_count)
    }

    /// First records as returned by the backend
    pub fn recent(&self) -> &[EhrRecord] {
        &self.records[..self.records.len().min(RECENT_LIMIT)]
    }

    /// Where "View all records" points, when there are more to see
    pub fn view_all(&self) -> Option<Route> {
        if self.records.len() <= RECENT_LIMIT {
            return None;
        }
        match self.identity.role {
            Role::Admin => Some(Route::Patients),
            Role::Doctor => Some(Route::Records),
            Role::Patient => None,
        }
    }

    pub async fn refresh(&mut self, client: &RecordServiceClient) {
        self.error = None;
        let mut failed = false;

        if matches!(self.identity.role, Role::Admin | Role::Doctor) {
            match client.list_records().await.into_result(LOAD_FAILED) {
                Ok(records) => self.records = records,
                Err(message) => {
                    warn!("dashboard records unavailable: {}", message);
                    failed = true;
                }
            }
        }

        if self.identity.role == Role::Admin {
            match client.list_doctors().await.into_result(LOAD_FAILED) {
                Ok(doctors) => self.doctor_count = doctors.len(),
                Err(message) => {
                    warn!("dashboard doctors unavailable: {}", message);
                    failed = true;
                }
            }
        }

        if failed {
            self.error = Some(LOAD_FAILED.to_string());
        }
        self.status = ViewStatus::Ready;
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard")?;
        writeln!(f, "Welcome back, {}", self.identity.name)?;
        write_alert(f, "error", self.error())?;

        let stats = self.stats();
        if stats == DashboardStats::Patient {
            writeln!(f)?;
            writeln!(f, "My Medical Record")?;
            return writeln!(f, "View your medical record at {}", Route::MyRecord);
        }

        for (label, value) in stats.cards() {
            writeln!(f, "{:<18} {}", label, value)?;
        }

        writeln!(f)?;
        writeln!(f, "Recent Patient Records")?;
        if self.records.is_empty() {
            return writeln!(f, "No records found");
        }
        for record in self.recent() {
            writeln!(
                f,
                "{:<12} {:<24} {}",
                record.patient_id,
                record.name,
                truncate(&record.diagnosis, DIAGNOSIS_PREVIEW)
            )?;
        }
        if let Some(route) = self.view_all() {
            writeln!(f, "View all records: {}", route)?;
        }
        Ok(())
    }
}
