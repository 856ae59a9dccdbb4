//! Doctor profiles
//!
//! Doctors are added and removed by admins; a doctor never edits their own
//! profile through the portal.

use crate::validation::{
    validate_email, validate_required, ValidationError, ValidationErrorCode, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Minimum length of a new doctor's password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Doctor profile as returned by the backend
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Identity id, when the backend includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub doctor_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub department: String,
    pub specialization: String,
    #[serde(default)]
    pub experience: String,
}

/// Payload for `POST /ehr/doctor/add`
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub doctor_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub department: String,
    pub specialization: String,
    pub experience: String,
    pub password: String,
}

impl std::fmt::Debug for NewDoctor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewDoctor")
            .field("doctor_id", &self.doctor_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("department", &self.department)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl NewDoctor {
    /// Every field except experience is required
    pub fn check(&self) -> ValidationResult {
        let mut result = validate_required(
            &[
                ("doctorId", self.doctor_id.as_str()),
                ("name", self.name.as_str()),
                ("email", self.email.as_str()),
                ("phoneNumber", self.phone_number.as_str()),
                ("department", self.department.as_str()),
                ("specialization", self.specialization.as_str()),
                ("password", self.password.as_str()),
            ],
            "All fields are required",
        );
        if !result.is_valid() {
            return result;
        }

        result.merge(validate_email(&self.email, "email"));
        if !result.is_valid() {
            return result;
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            result.add_error(
                "password",
                "Password must be at least 6 characters long",
                ValidationErrorCode::TooShort,
            );
        }

        result
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check().into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_doctor() -> NewDoctor {
        NewDoctor {
            doctor_id: "D-01".to_string(),
            name: "Gregory House".to_string(),
            email: "house@ppth.org".to_string(),
            phone_number: "555-0101".to_string(),
            department: "Diagnostics".to_string(),
            specialization: "Nephrology".to_string(),
            experience: String::new(),
            password: "vicodin".to_string(),
        }
    }

    #[test]
    fn test_valid_doctor() {
        assert!(new_doctor().validate().is_ok());
    }

    #[test]
    fn test_missing_field() {
        let mut doctor = new_doctor();
        doctor.department = " ".to_string();
        let err = doctor.validate().unwrap_err();
        assert_eq!(err.field, "department");
        assert_eq!(err.message, "All fields are required");
    }

    #[test]
    fn test_bad_email() {
        let mut doctor = new_doctor();
        doctor.email = "house".to_string();
        assert_eq!(
            doctor.validate().unwrap_err().message,
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_short_password() {
        let mut doctor = new_doctor();
        doctor.password = "abc12".to_string();
        let err = doctor.validate().unwrap_err();
        assert_eq!(err.code, ValidationErrorCode::TooShort);
        assert_eq!(err.message, "Password must be at least 6 characters long");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(new_doctor()).unwrap();
        assert_eq!(json["doctorId"], "D-01");
        assert_eq!(json["phoneNumber"], "555-0101");
        assert_eq!(json["password"], "vicodin");
    }

    #[test]
    fn test_doctor_without_experience_or_id() {
        let doctor: Doctor = serde_json::from_str(
            r#"{"doctorId":"D-2","name":"Cuddy","email":"c@ppth.org",
                "phoneNumber":"1","department":"Admin","specialization":"Endo"}"#,
        )
        .unwrap();
        assert_eq!(doctor.experience, "");
        assert!(doctor.id.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        assert!(!format!("{:?}", new_doctor()).contains("vicodin"));
    }
}
