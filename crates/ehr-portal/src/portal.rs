//! Portal shell
//!
//! Wires configuration, session storage, the session store and the record
//! service client together, and turns a navigation into a rendered page.

use crate::client::RecordServiceClient;
use crate::config::PortalConfig;
use crate::error::Result;
use crate::gate::{authorize, nav_items, Access, NavItem, Route};
use crate::response::ApiResponse;
use crate::session::Session;
use crate::storage::{FileStorage, SessionStorage};
use crate::views::{DashboardView, DoctorsView, MyRecordView, PatientsView, RecordsView};
use ehr_core::{Identity, LoginForm};
use log::debug;
use std::fmt;
use std::sync::Arc;

pub struct Portal {
    client: RecordServiceClient,
    session: Session,
}

impl Portal {
    /// Portal persisting its session under `config.storage_dir`
    pub fn new(config: PortalConfig) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
        Portal::with_storage(config, storage)
    }

    /// Portal over an arbitrary storage backend
    pub fn with_storage(config: PortalConfig, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let client = RecordServiceClient::new(&config.api_url, storage.clone())?;
        let session = Session::hydrate(storage);
        Ok(Portal { client, session })
    }

    pub fn client(&self) -> &RecordServiceClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub async fn login(&mut self, form: &mut LoginForm) -> ApiResponse<Identity> {
        self.session.submit(&self.client, form).await
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Sidebar for the signed-in user; empty when signed out
    pub fn nav(&self) -> Vec<NavItem> {
        self.identity()
            .map(|identity| nav_items(identity.role))
            .unwrap_or_default()
    }

    /// Gate `route` and, if it may render, mount its page.
    ///
    /// Role mismatches still produce the page, in its access-denied state
    /// and without any request having been made.
    pub async fn open(&self, route: Route) -> Page {
        let identity = match authorize(self.identity(), route) {
            Access::Redirect(target) => {
                debug!("{} requires sign-in, redirecting to {}", route, target);
                return Page::Redirect(target);
            }
            Access::Granted(identity) => identity,
            Access::Denied => self.identity(),
        };

        let client = &self.client;
        match (route, identity) {
            (Route::Login, _) => Page::Login,
            (Route::Dashboard, Some(identity)) => {
                Page::Dashboard(DashboardView::mount(identity, client).await)
            }
            (Route::Dashboard, None) => Page::Redirect(Route::Login),
            (Route::Doctors, identity) => Page::Doctors(DoctorsView::mount(identity, client).await),
            (Route::Patients, identity) => {
                Page::Patients(PatientsView::mount(identity, client).await)
            }
            (Route::Records, identity) => Page::Records(RecordsView::mount(identity, client).await),
            (Route::MyRecord, identity) => {
                Page::MyRecord(MyRecordView::mount(identity, client).await)
            }
        }
    }

    pub async fn open_path(&self, path: &str) -> Page {
        self.open(Route::from_path(path)).await
    }
}

/// A rendered navigation outcome
#[derive(Debug)]
pub enum Page {
    Login,
    Redirect(Route),
    Dashboard(DashboardView),
    Doctors(DoctorsView),
    Patients(PatientsView),
    Records(RecordsView),
    MyRecord(MyRecordView),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Login => Route::Login,
            Page::Redirect(target) => *target,
            Page::Dashboard(_) => Route::Dashboard,
            Page::Doctors(_) => Route::Doctors,
            Page::Patients(_) => Route::Patients,
            Page::Records(_) => Route::Records,
            Page::MyRecord(_) => Route::MyRecord,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Login => writeln!(f, "Sign in to continue (ehr login)"),
            Page::Redirect(target) => writeln!(f, "Redirecting to {}", target),
            Page::Dashboard(view) => write!(f, "{}", view),
            Page::Doctors(view) => write!(f, "{}", view),
            Page::Patients(view) => write!(f, "{}", view),
            Page::Records(view) => write!(f, "{}", view),
            Page::MyRecord(view) => write!(f, "{}", view),
        }
    }
}
