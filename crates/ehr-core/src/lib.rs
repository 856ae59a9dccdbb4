//! EHR Core - Domain Types for the EHR Portal
//!
//! Pure Rust types shared by every layer of the portal. Nothing in this
//! crate performs I/O; it only describes what travels over the wire and
//! what a well-formed input looks like.
//!
//! # Contents
//!
//! - `Role` - closed set of portal roles (admin, doctor, patient)
//! - `Identity` - the authenticated user's role-tagged profile
//! - `LoginForm` / `Credentials` - credential collection and presence checks
//! - `EhrRecord` / `RecordForm` / `RecordUpdate` - patient EHR records
//! - `Doctor` / `NewDoctor` - doctor profiles managed by admins
//! - Search filters used by the list pages
//!
//! # Example
//!
//! ```rust
//! use ehr_core::{LoginForm, Role, Credentials};
//!
//! let mut form = LoginForm::new(Role::Patient);
//! form.patient_id = "P100".to_string();
//! form.name = "Jane Doe".to_string();
//!
//! let credentials = form.validate().unwrap();
//! assert_eq!(credentials.role(), Role::Patient);
//! ```

pub mod role;
pub mod identity;
pub mod credentials;
pub mod record;
pub mod doctor;
pub mod search;
pub mod validation;

// Re-export commonly used types for convenience
pub use role::{ParseRoleError, Role};
pub use identity::Identity;
pub use credentials::{Credentials, LoginForm};
pub use record::{EhrRecord, RecordForm, RecordUpdate};
pub use doctor::{Doctor, NewDoctor};
pub use validation::{ValidationError, ValidationErrorCode, ValidationResult};
