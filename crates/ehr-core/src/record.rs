//! Patient EHR records
//!
//! `patient_id` is the unique key correlating a patient identity with
//! exactly one record. Nothing in this module builds a record or an update
//! with a blank `patient_id`.

use crate::identity::Identity;
use crate::validation::{
    validate_email, validate_required, ValidationError, ValidationErrorCode, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Electronic health record for one patient
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EhrRecord {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub diagnosis: String,
    pub treatment_plan: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub medications: String,
    #[serde(default)]
    pub allergies: String,
    /// Attending doctor
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Gender options offered by the record form
pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];

/// Record create/edit form
///
/// Attending-doctor fields are stamped from the signed-in doctor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordForm {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub diagnosis: String,
    pub treatment_plan: String,
    pub symptoms: String,
    pub medications: String,
    pub allergies: String,
    pub doctor_name: String,
    pub doctor_id: String,
}

impl RecordForm {
    /// Empty form attributed to `doctor`
    pub fn for_doctor(doctor: &Identity) -> Self {
        RecordForm {
            doctor_name: doctor.name.clone(),
            doctor_id: doctor.id.clone(),
            ..Default::default()
        }
    }

    /// Form pre-filled from an existing record, re-attributed to `doctor`
    pub fn from_record(record: &EhrRecord, doctor: &Identity) -> Self {
        RecordForm {
            patient_id: record.patient_id.clone(),
            name: record.name.clone(),
            age: record.age,
            gender: record.gender.clone(),
            email: record.email.clone(),
            phone_number: record.phone_number.clone(),
            diagnosis: record.diagnosis.clone(),
            treatment_plan: record.treatment_plan.clone(),
            symptoms: record.symptoms.clone(),
            medications: record.medications.clone(),
            allergies: record.allergies.clone(),
            doctor_name: doctor.name.clone(),
            doctor_id: doctor.id.clone(),
        }
    }

    /// Check required fields and email shape
    pub fn check(&self) -> ValidationResult {
        let age = if self.age == 0 { "" } else { "set" };
        let mut result = validate_required(
            &[
                ("patientId", self.patient_id.as_str()),
                ("name", self.name.as_str()),
                ("age", age),
                ("gender", self.gender.as_str()),
                ("email", self.email.as_str()),
                ("phoneNumber", self.phone_number.as_str()),
                ("diagnosis", self.diagnosis.as_str()),
                ("treatmentPlan", self.treatment_plan.as_str()),
            ],
            "All required fields must be filled",
        );

        if result.is_valid() && !GENDER_OPTIONS.contains(&self.gender.as_str()) {
            result.add_error(
                "gender",
                "Please select a valid gender",
                ValidationErrorCode::InvalidFormat,
            );
        }

        if result.is_valid() {
            result.merge(validate_email(&self.email, "email"));
        }

        result
    }

    /// Validate and build the record to submit
    pub fn validate(&self) -> Result<EhrRecord, ValidationError> {
        self.check().into_result()?;

        Ok(EhrRecord {
            patient_id: self.patient_id.clone(),
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            diagnosis: self.diagnosis.clone(),
            treatment_plan: self.treatment_plan.clone(),
            symptoms: self.symptoms.clone(),
            medications: self.medications.clone(),
            allergies: self.allergies.clone(),
            doctor_name: self.doctor_name.clone(),
            doctor_id: self.doctor_id.clone(),
            created_at: None,
            updated_at: None,
        })
    }
}

/// Partial record sent to `PUT /ehr/update`
///
/// Only `patient_id` is mandatory; absent fields are left out of the JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
}

impl RecordUpdate {
    pub fn new(patient_id: impl Into<String>) -> Self {
        RecordUpdate {
            patient_id: patient_id.into(),
            ..Default::default()
        }
    }

    /// An update must name the record it targets
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_id.trim().is_empty() {
            return Err(ValidationError::new(
                "patientId",
                "Patient ID is required",
                ValidationErrorCode::Required,
            ));
        }
        Ok(())
    }
}

impl From<EhrRecord> for RecordUpdate {
    fn from(record: EhrRecord) -> Self {
        RecordUpdate {
            patient_id: record.patient_id,
            name: Some(record.name),
            age: Some(record.age),
            gender: Some(record.gender),
            email: Some(record.email),
            phone_number: Some(record.phone_number),
            diagnosis: Some(record.diagnosis),
            treatment_plan: Some(record.treatment_plan),
            symptoms: Some(record.symptoms),
            medications: Some(record.medications),
            allergies: Some(record.allergies),
            doctor_name: Some(record.doctor_name),
            doctor_id: Some(record.doctor_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn doctor() -> Identity {
        Identity::new("D-01", "Gregory House", Role::Doctor)
    }

    fn filled_form() -> RecordForm {
        RecordForm {
            patient_id: "P100".to_string(),
            name: "Jane Doe".to_string(),
            age: 42,
            gender: "Female".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: "+1-555-0100".to_string(),
            diagnosis: "Type 2 diabetes".to_string(),
            treatment_plan: "Metformin, diet".to_string(),
            ..RecordForm::for_doctor(&doctor())
        }
    }

    #[test]
    fn test_form_stamps_doctor() {
        let form = RecordForm::for_doctor(&doctor());
        assert_eq!(form.doctor_id, "D-01");
        assert_eq!(form.doctor_name, "Gregory House");
    }

    #[test]
    fn test_valid_form_builds_record() {
        let record = filled_form().validate().unwrap();
        assert_eq!(record.patient_id, "P100");
        assert_eq!(record.doctor_id, "D-01");
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_blank_patient_id_rejected() {
        let mut form = filled_form();
        form.patient_id = "  ".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "patientId");
        assert_eq!(err.message, "All required fields must be filled");
    }

    #[test]
    fn test_zero_age_rejected() {
        let mut form = filled_form();
        form.age = 0;
        assert_eq!(form.validate().unwrap_err().field, "age");
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let mut form = filled_form();
        form.symptoms.clear();
        form.medications.clear();
        form.allergies.clear();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_gender_must_be_an_offered_option() {
        let mut form = filled_form();
        form.gender = "female".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "gender");
        assert_eq!(err.code, ValidationErrorCode::InvalidFormat);

        for option in GENDER_OPTIONS {
            form.gender = option.to_string();
            assert!(form.validate().is_ok());
        }
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut form = filled_form();
        form.email = "jane-at-example".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.message, "Please enter a valid email address");
    }

    #[test]
    fn test_record_wire_format() {
        let record = filled_form().validate().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["patientId"], "P100");
        assert_eq!(json["treatmentPlan"], "Metformin, diet");
        assert_eq!(json["phoneNumber"], "+1-555-0100");
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_record_accepts_missing_optional_fields() {
        let json = r#"{
            "patientId": "P1", "name": "A", "age": 30, "gender": "Male",
            "email": "a@b.co", "phoneNumber": "1", "diagnosis": "Flu",
            "treatmentPlan": "Rest", "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let record: EhrRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.symptoms, "");
        assert_eq!(record.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let mut update = RecordUpdate::new("P100");
        update.diagnosis = Some("Resolved".to_string());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"patientId": "P100", "diagnosis": "Resolved"})
        );
    }

    #[test]
    fn test_update_requires_patient_id() {
        assert!(RecordUpdate::new("").validate().is_err());
        assert!(RecordUpdate::new("P1").validate().is_ok());
    }

    #[test]
    fn test_edit_form_reattributes_doctor() {
        let mut record = filled_form().validate().unwrap();
        record.doctor_id = "D-99".to_string();
        let other = Identity::new("D-02", "Lisa Cuddy", Role::Doctor);
        let form = RecordForm::from_record(&record, &other);
        assert_eq!(form.doctor_id, "D-02");
        assert_eq!(form.diagnosis, record.diagnosis);
    }
}
