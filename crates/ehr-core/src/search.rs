//! Case-insensitive list filters used by the list pages

use crate::doctor::Doctor;
use crate::record::EhrRecord;

fn matches(term: &str, fields: &[&str]) -> bool {
    let needle = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Doctor records page: name, patient id, diagnosis
pub fn filter_records<'a>(records: &'a [EhrRecord], term: &str) -> Vec<&'a EhrRecord> {
    records
        .iter()
        .filter(|r| {
            matches(
                term,
                &[r.name.as_str(), r.patient_id.as_str(), r.diagnosis.as_str()],
            )
        })
        .collect()
}

/// Admin patients page: name, email, diagnosis, patient id
pub fn filter_patients<'a>(records: &'a [EhrRecord], term: &str) -> Vec<&'a EhrRecord> {
    records
        .iter()
        .filter(|r| {
            matches(
                term,
                &[
                    r.name.as_str(),
                    r.email.as_str(),
                    r.diagnosis.as_str(),
                    r.patient_id.as_str(),
                ],
            )
        })
        .collect()
}

/// Admin doctors page: name, email, department, specialization
pub fn filter_doctors<'a>(doctors: &'a [Doctor], term: &str) -> Vec<&'a Doctor> {
    doctors
        .iter()
        .filter(|d| {
            matches(
                term,
                &[
                    d.name.as_str(),
                    d.email.as_str(),
                    d.department.as_str(),
                    d.specialization.as_str(),
                ],
            )
        })
        .collect()
}
