//! Page view-models
//!
//! Each page owns its own data, error and form-error state and talks to
//! the backend only through `RecordServiceClient`. Role-restricted pages
//! check the identity before their first fetch: a mismatch puts the page in
//! the access-denied state and no request is ever issued.
//!
//! Pages render to plain text through `Display`.

pub mod dashboard;
pub mod doctors;
pub mod my_record;
pub mod patients;
pub mod records;

pub use dashboard::{DashboardStats, DashboardView};
pub use doctors::DoctorsView;
pub use my_record::{MyRecordView, RecordDetails};
pub use patients::PatientsView;
pub use records::RecordsView;

use ehr_core::{Identity, Role};
use std::fmt;

pub const ACCESS_DENIED_TITLE: &str = "Access Denied";
pub const ACCESS_DENIED_MESSAGE: &str = "You don't have permission to access this page.";

/// Lifecycle of a page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewStatus {
    /// Permitted, nothing fetched yet
    Idle,
    /// Last fetch finished (successfully or with `error` set)
    Ready,
    /// Identity lacks the page's role; the page never fetches
    AccessDenied,
}

/// Identity clone if it holds `role`
fn admit(identity: Option<&Identity>, role: Role) -> Option<Identity> {
    identity.filter(|i| i.is(role)).cloned()
}

fn status_for(viewer: &Option<Identity>) -> ViewStatus {
    match viewer {
        Some(_) => ViewStatus::Idle,
        None => ViewStatus::AccessDenied,
    }
}

fn write_access_denied(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", ACCESS_DENIED_TITLE)?;
    writeln!(f, "{}", ACCESS_DENIED_MESSAGE)
}

fn write_alert(f: &mut fmt::Formatter<'_>, label: &str, message: Option<&str>) -> fmt::Result {
    match message {
        Some(message) => writeln!(f, "[{}] {}", label, message),
        None => Ok(()),
    }
}

/// Shorten `text` to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
