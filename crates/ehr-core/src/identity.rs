//! Authenticated identity
//!
//! The one piece of state kept across navigations. It is issued by the
//! backend's login endpoint and persisted verbatim by the session store.

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Role-tagged profile of the signed-in user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Bearer token for subsequent requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Key of the patient's own EHR record (patient identities only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Identity {
            id: id.into(),
            name: name.into(),
            role,
            token: None,
            patient_id: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Record key for a patient identity.
    ///
    /// Falls back to `id` when the backend did not send `patientId`.
    /// Always `None` for admins and doctors, and for blank keys.
    pub fn record_key(&self) -> Option<&str> {
        match self.role {
            Role::Patient => {
                let key = self.patient_id.as_deref().unwrap_or(&self.id);
                if key.trim().is_empty() {
                    None
                } else {
                    Some(key)
                }
            }
            Role::Admin | Role::Doctor => None,
        }
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}
