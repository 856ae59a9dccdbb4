//! EHR Portal
//!
//! Headless rendition of a role-gated electronic health record portal:
//!
//! - **Session Store** (`session`): the signed-in identity, mirrored to
//!   persistent client storage (`storage`)
//! - **Authorization Gate** (`gate`): route access by authentication and role
//! - **Record Service Client** (`client`): one method per backend endpoint,
//!   every outcome normalized to an `ApiResponse` (`response`)
//! - **Pages** (`views`, `portal`): dashboard, doctors, patients, records and
//!   my-record view-models
//!
//! Credential input and the domain types live in `ehr_core`.
//!
//! ## Example
//!
//! ```no_run
//! use ehr_core::{LoginForm, Role};
//! use ehr_portal::{Portal, PortalConfig, Route};
//!
//! # async fn demo() -> ehr_portal::Result<()> {
//! let mut portal = Portal::new(PortalConfig::load(None)?)?;
//!
//! let mut form = LoginForm::new(Role::Admin);
//! form.username = "admin".into();
//! form.password = "admin123".into();
//! let response = portal.login(&mut form).await;
//! assert!(response.success);
//!
//! println!("{}", portal.open(Route::Dashboard).await);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod portal;
pub mod response;
pub mod session;
pub mod storage;
pub mod views;

pub use client::RecordServiceClient;
pub use config::PortalConfig;
pub use error::{PortalError, Result};
pub use gate::{authorize, nav_items, Access, NavItem, Route};
pub use portal::{Page, Portal};
pub use response::ApiResponse;
pub use session::{Session, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
