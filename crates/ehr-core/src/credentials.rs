//! Credential collection
//!
//! `LoginForm` holds whatever the user typed for every role; `validate`
//! turns it into a role-tagged `Credentials` payload once the fields the
//! selected role needs are present.

use crate::role::Role;
use crate::validation::{ValidationError, ValidationErrorCode};
use serde::{Deserialize, Serialize};

/// Login payload sent to `POST /auth/login`
///
/// Serialized as `{"role": "<role>", ...role fields}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Credentials {
    Admin {
        username: String,
        password: String,
    },
    Doctor {
        email: String,
        password: String,
    },
    Patient {
        #[serde(rename = "patientId")]
        patient_id: String,
        name: String,
    },
}

impl Credentials {
    pub fn role(&self) -> Role {
        match self {
            Credentials::Admin { .. } => Role::Admin,
            Credentials::Doctor { .. } => Role::Doctor,
            Credentials::Patient { .. } => Role::Patient,
        }
    }

    /// Login name for log lines; never includes a password
    pub fn principal(&self) -> &str {
        match self {
            Credentials::Admin { username, .. } => username,
            Credentials::Doctor { email, .. } => email,
            Credentials::Patient { patient_id, .. } => patient_id,
        }
    }
}

// Passwords must not leak through `{:?}` in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Admin { username, .. } => f
                .debug_struct("Admin")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Doctor { email, .. } => f
                .debug_struct("Doctor")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Patient { patient_id, name } => f
                .debug_struct("Patient")
                .field("patient_id", patient_id)
                .field("name", name)
                .finish(),
        }
    }
}

/// Raw login form input for every role
#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    role: Option<Role>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub patient_id: String,
    pub name: String,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(role: Role) -> Self {
        LoginForm {
            role: Some(role),
            ..Default::default()
        }
    }

    /// Selected role; the login screen starts on patient
    pub fn role(&self) -> Role {
        self.role.unwrap_or(Role::Patient)
    }

    /// Switch role and clear any previous form error
    pub fn select_role(&mut self, role: Role) {
        self.role = Some(role);
        self.error = None;
    }

    /// Last validation message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check the selected role's fields and build its credentials.
    ///
    /// The failure message is also kept on the form for display.
    pub fn validate(&mut self) -> Result<Credentials, ValidationError> {
        self.error = None;

        let result = match self.role() {
            Role::Admin => {
                if blank(&self.username) || blank(&self.password) {
                    Err(ValidationError::new(
                        if blank(&self.username) { "username" } else { "password" },
                        "Username and password are required",
                        ValidationErrorCode::Required,
                    ))
                } else {
                    Ok(Credentials::Admin {
                        username: self.username.clone(),
                        password: self.password.clone(),
                    })
                }
            }
            Role::Doctor => {
                if blank(&self.email) || blank(&self.password) {
                    Err(ValidationError::new(
                        if blank(&self.email) { "email" } else { "password" },
                        "Email and password are required",
                        ValidationErrorCode::Required,
                    ))
                } else {
                    Ok(Credentials::Doctor {
                        email: self.email.clone(),
                        password: self.password.clone(),
                    })
                }
            }
            Role::Patient => {
                if blank(&self.patient_id) || blank(&self.name) {
                    Err(ValidationError::new(
                        if blank(&self.patient_id) { "patientId" } else { "name" },
                        "Patient ID and name are required",
                        ValidationErrorCode::Required,
                    ))
                } else {
                    Ok(Credentials::Patient {
                        patient_id: self.patient_id.clone(),
                        name: self.name.clone(),
                    })
                }
            }
        };

        if let Err(err) = &result {
            self.error = Some(err.message.clone());
        }
        result
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(role: Role) -> LoginForm {
        let mut form = LoginForm::new(role);
        form.username = "admin".to_string();
        form.email = "house@ppth.org".to_string();
        form.password = "admin123".to_string();
        form.patient_id = "P100".to_string();
        form.name = "Jane Doe".to_string();
        form
    }

    #[test]
    fn test_default_role_is_patient() {
        assert_eq!(LoginForm::default().role(), Role::Patient);
    }

    #[test]
    fn test_admin_payload() {
        let creds = filled(Role::Admin).validate().unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "admin", "username": "admin", "password": "admin123"})
        );
    }

    #[test]
    fn test_doctor_payload() {
        let creds = filled(Role::Doctor).validate().unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["role"], "doctor");
        assert_eq!(json["email"], "house@ppth.org");
        assert!(json.get("username").is_none());
    }

    #[test]
    fn test_patient_payload_uses_camel_case() {
        let creds = filled(Role::Patient).validate().unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "patient", "patientId": "P100", "name": "Jane Doe"})
        );
    }

    #[test]
    fn test_blank_fields_rejected_per_role() {
        let cases = [
            (Role::Admin, "Username and password are required"),
            (Role::Doctor, "Email and password are required"),
            (Role::Patient, "Patient ID and name are required"),
        ];

        for (role, message) in cases {
            let mut form = LoginForm::new(role);
            form.password = "   ".to_string();
            let err = form.validate().unwrap_err();
            assert_eq!(err.message, message);
            assert_eq!(form.error(), Some(message));
        }
    }

    #[test]
    fn test_only_selected_role_fields_matter() {
        let mut form = LoginForm::new(Role::Patient);
        form.patient_id = "P1".to_string();
        form.name = "Ann".to_string();
        assert!(form.validate().is_ok());

        form.select_role(Role::Admin);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_select_role_clears_error() {
        let mut form = LoginForm::new(Role::Doctor);
        assert!(form.validate().is_err());
        assert!(form.error().is_some());

        form.select_role(Role::Patient);
        assert!(form.error().is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = filled(Role::Admin).validate().unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("admin123"));
        assert!(debug.contains("redacted"));
    }
}
