//! `ehr` command line
//!
//! Drives the portal from a terminal. The session persists between
//! invocations, so `ehr login` once and the following commands run as that
//! user.
//!
//! Usage:
//!   ehr login --role admin --username admin --password admin123
//!   ehr open /records
//!   ehr records create --patient-id P100 --name "Jane Doe" ...
//!   ehr doctors delete D7
//!   ehr logout

use crate::config::PortalConfig;
use crate::gate::{authorize, Access, Route};
use crate::portal::Portal;
use crate::session::AUTH_FAILED_MESSAGE;
use crate::views::{
    DoctorsView, MyRecordView, PatientsView, RecordDetails, RecordsView, ACCESS_DENIED_MESSAGE,
};
use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use ehr_core::{Identity, LoginForm, NewDoctor, RecordForm, Role};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ehr")]
#[command(author = "EHR Portal")]
#[command(version)]
#[command(about = "Role-gated electronic health record portal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to ./ehr-portal.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List the pages available to the signed-in user
    Nav,

    /// Render the page at a path (e.g. /, /records, /my-record)
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Manage doctor accounts (admin)
    Doctors {
        #[command(subcommand)]
        action: DoctorsCommand,
    },

    /// Manage patients (admin)
    Patients {
        #[command(subcommand)]
        action: PatientsCommand,
    },

    /// Work with patient records (doctor)
    Records {
        #[command(subcommand)]
        action: RecordsCommand,
    },

    /// Show your own medical record (patient)
    MyRecord,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// admin, doctor or patient
    #[arg(short, long)]
    pub role: Role,

    /// Admin username
    #[arg(short, long, default_value = "")]
    pub username: String,

    /// Doctor email
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Admin or doctor password
    #[arg(short, long, default_value = "")]
    pub password: String,

    /// Patient ID
    #[arg(long, default_value = "")]
    pub patient_id: String,

    /// Patient name
    #[arg(short, long, default_value = "")]
    pub name: String,
}

impl LoginArgs {
    fn into_form(self) -> LoginForm {
        let mut form = LoginForm::new(self.role);
        form.username = self.username;
        form.email = self.email;
        form.password = self.password;
        form.patient_id = self.patient_id;
        form.name = self.name;
        form
    }
}

#[derive(Subcommand, Debug)]
pub enum DoctorsCommand {
    List {
        /// Filter by name, email, department or specialization
        #[arg(short, long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        doctor_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone_number: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        specialization: String,
        #[arg(long, default_value = "")]
        experience: String,
        /// At least 6 characters
        #[arg(long)]
        password: String,
    },
    Delete { doctor_id: String },
}

#[derive(Subcommand, Debug)]
pub enum PatientsCommand {
    List {
        /// Filter by name, email, diagnosis or patient ID
        #[arg(short, long)]
        search: Option<String>,
    },
    Delete { patient_id: String },
}

#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    List {
        /// Filter by name, patient ID or diagnosis
        #[arg(short, long)]
        search: Option<String>,
    },
    Show { patient_id: String },
    Create {
        #[arg(long)]
        patient_id: String,
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Edit a record; fields not given keep their current value
    Update {
        patient_id: String,
        #[command(flatten)]
        fields: RecordFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct RecordFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    /// Male, Female or Other
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone_number: Option<String>,
    #[arg(long)]
    pub diagnosis: Option<String>,
    #[arg(long)]
    pub treatment_plan: Option<String>,
    #[arg(long)]
    pub symptoms: Option<String>,
    #[arg(long)]
    pub medications: Option<String>,
    #[arg(long)]
    pub allergies: Option<String>,
}

impl RecordFields {
    /// Overwrite the form fields that were given
    pub fn apply(self, form: &mut RecordForm) {
        let set = |slot: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *slot = value;
            }
        };
        set(&mut form.name, self.name);
        set(&mut form.gender, self.gender);
        set(&mut form.email, self.email);
        set(&mut form.phone_number, self.phone_number);
        set(&mut form.diagnosis, self.diagnosis);
        set(&mut form.treatment_plan, self.treatment_plan);
        set(&mut form.symptoms, self.symptoms);
        set(&mut form.medications, self.medications);
        set(&mut form.allergies, self.allergies);
        if let Some(age) = self.age {
            form.age = age;
        }
    }
}

/// Execute one command and return what to print
pub async fn run(cli: Cli) -> Result<String> {
    let mut config = PortalConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    let mut portal = Portal::new(config)?;

    match cli.command {
        Command::Login(args) => {
            let mut form = args.into_form();
            let identity = portal
                .login(&mut form)
                .await
                .into_result(AUTH_FAILED_MESSAGE)
                .map_err(|message| anyhow!(message))?;
            Ok(format!("Signed in as {} ({})", identity.name, identity.role.label()))
        }
        Command::Logout => {
            portal.logout();
            Ok("Signed out".to_string())
        }
        Command::Whoami => match portal.identity() {
            Some(identity) => Ok(describe(identity)),
            None => Ok("Not signed in".to_string()),
        },
        Command::Nav => {
            let items = portal.nav();
            if items.is_empty() {
                return Ok(format!("Not signed in; go to {}", Route::Login));
            }
            Ok(items
                .iter()
                .map(|item| format!("{:<16} {}", item.label, item.route))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Open { path } => Ok(portal.open_path(&path).await.to_string()),
        Command::Doctors { action } => doctors(&portal, action).await,
        Command::Patients { action } => patients(&portal, action).await,
        Command::Records { action } => records(&portal, action).await,
        Command::MyRecord => {
            let identity = require(&portal, Route::MyRecord)?;
            let view = MyRecordView::mount(Some(&identity), portal.client()).await;
            finish(view.error(), view.to_string())
        }
    }
}

async fn doctors(portal: &Portal, action: DoctorsCommand) -> Result<String> {
    let identity = require(portal, Route::Doctors)?;
    let client = portal.client();

    match action {
        DoctorsCommand::List { search } => {
            let mut view = DoctorsView::mount(Some(&identity), client).await;
            if let Some(term) = search {
                view.set_search(term);
            }
            finish(view.error(), view.to_string())
        }
        DoctorsCommand::Add {
            doctor_id,
            name,
            email,
            phone_number,
            department,
            specialization,
            experience,
            password,
        } => {
            let doctor = NewDoctor {
                doctor_id,
                name,
                email,
                phone_number,
                department,
                specialization,
                experience,
                password,
            };
            let mut view = DoctorsView::new(Some(&identity));
            if !view.add(client, &doctor).await {
                bail!(view.form_error().unwrap_or("Failed to add doctor").to_string());
            }
            Ok(format!("Added doctor {}\n\n{}", doctor.doctor_id, view))
        }
        DoctorsCommand::Delete { doctor_id } => {
            let mut view = DoctorsView::new(Some(&identity));
            if !view.delete(client, &doctor_id).await {
                bail!(view.error().unwrap_or("Failed to delete doctor").to_string());
            }
            Ok(format!("Deleted doctor {}\n\n{}", doctor_id, view))
        }
    }
}

async fn patients(portal: &Portal, action: PatientsCommand) -> Result<String> {
    let identity = require(portal, Route::Patients)?;
    let client = portal.client();

    match action {
        PatientsCommand::List { search } => {
            let mut view = PatientsView::mount(Some(&identity), client).await;
            if let Some(term) = search {
                view.set_search(term);
            }
            finish(view.error(), view.to_string())
        }
        PatientsCommand::Delete { patient_id } => {
            let mut view = PatientsView::new(Some(&identity));
            if !view.delete(client, &patient_id).await {
                bail!(view.error().unwrap_or("Failed to delete patient").to_string());
            }
            Ok(format!("Deleted patient {}\n\n{}", patient_id, view))
        }
    }
}

async fn records(portal: &Portal, action: RecordsCommand) -> Result<String> {
    let identity = require(portal, Route::Records)?;
    let client = portal.client();

    match action {
        RecordsCommand::List { search } => {
            let mut view = RecordsView::mount(Some(&identity), client).await;
            if let Some(term) = search {
                view.set_search(term);
            }
            finish(view.error(), view.to_string())
        }
        RecordsCommand::Show { patient_id } => {
            let record = client
                .get_record(&patient_id)
                .await
                .into_result("Failed to fetch records")
                .map_err(|message| anyhow!(message))?;
            Ok(RecordDetails(&record).to_string())
        }
        RecordsCommand::Create { patient_id, fields } => {
            let mut view = RecordsView::new(Some(&identity));
            let mut form = RecordForm::for_doctor(&identity);
            form.patient_id = patient_id;
            fields.apply(&mut form);

            if !view.create(client, &form).await {
                bail!(view.form_error().unwrap_or("Failed to create record").to_string());
            }
            Ok(format!("Created record {}\n\n{}", form.patient_id, view))
        }
        RecordsCommand::Update { patient_id, fields } => {
            let mut view = RecordsView::mount(Some(&identity), client).await;
            if let Some(message) = view.error() {
                bail!(message.to_string());
            }
            let mut form = view
                .edit_form(&patient_id)
                .ok_or_else(|| anyhow!("No record found for patient {}", patient_id))?;
            fields.apply(&mut form);

            if !view.update(client, &patient_id, &form).await {
                bail!(view.form_error().unwrap_or("Failed to update record").to_string());
            }
            Ok(format!("Updated record {}\n\n{}", patient_id, view))
        }
    }
}

/// Signed-in identity allowed on `route`, or the reason it is not
fn require(portal: &Portal, route: Route) -> Result<Identity> {
    match authorize(portal.identity(), route) {
        Access::Granted(Some(identity)) => Ok(identity.clone()),
        Access::Granted(None) | Access::Redirect(_) => {
            bail!("Not signed in; run `ehr login` first")
        }
        Access::Denied => bail!(ACCESS_DENIED_MESSAGE),
    }
}

fn finish(error: Option<&str>, output: String) -> Result<String> {
    match error {
        Some(message) => bail!(message.to_string()),
        None => Ok(output),
    }
}

fn describe(identity: &Identity) -> String {
    let mut out = format!("{} ({})\nid: {}", identity.name, identity.role.label(), identity.id);
    if identity.is(Role::Patient) {
        if let Some(key) = identity.record_key() {
            out.push_str(&format!("\npatient id: {}", key));
        }
    }
    out
}
