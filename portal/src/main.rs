//! Command-line driver for the enrolment portal core.
//!
//! # Examples
//! ```sh
//! portal enrol --applicant applicant.json --receipt-dir receipts
//! portal login --email admin@university.com --password admin123
//! portal suggest-address --query "12 rue de la Paix"
//! portal board --status approved --search sarah
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use portal::PortalSettings;
use portal::domain::ports::{
    FixtureLoginService, InMemoryTokenStore, RandomSource, SessionTokenStore,
};
use portal::domain::{
    ApplicationBoard, ApplicationQuery, AuthSession, ContactVerifier, DocumentUploader,
    StatusFilter, SubmissionSimulator, WizardController, WizardError, address_suggestions,
};
use portal::inbound::{ApplicantScript, Destination, ScriptServices, resolve, run_script};
use portal::outbound::{
    FileTokenStore, ReceiptWriter, SeededRandomSource, SimulatedDocumentVerifier,
    SpawningAutosave, ThreadRandomSource, TokioSleeper, fixture_applications,
};

/// `portal` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "portal",
    about = "Drive the university enrolment portal core",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay an applicant script through the wizard and submit it.
    Enrol {
        /// JSON file holding every step draft and selected file.
        #[arg(long, value_name = "path")]
        applicant: PathBuf,
        /// Directory for the receipt. Overrides `PORTAL_RECEIPT_DIR`.
        #[arg(long = "receipt-dir", value_name = "dir")]
        receipt_dir: Option<PathBuf>,
        /// Upload and submission attempts before giving up.
        #[arg(long = "max-attempts", default_value_t = 3)]
        max_attempts: u32,
    },
    /// Sign in and report the dashboard the user lands on.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List the address suggestions offered for a query.
    SuggestAddress {
        #[arg(long)]
        query: String,
    },
    /// Query the admin board over the seeded applications.
    Board {
        #[arg(long, default_value = "")]
        search: String,
        /// `all`, `pending`, `approved` or `rejected`.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long = "per-page", default_value_t = 10)]
        per_page: usize,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = PortalSettings::load_from_iter([OsString::from("portal")])
        .map_err(|err| eyre!("load portal settings: {err}"))?;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async move {
        match args.command {
            Command::Enrol {
                applicant,
                receipt_dir,
                max_attempts,
            } => enrol(&settings, &applicant, receipt_dir, max_attempts).await,
            Command::Login { email, password } => login(&settings, &email, &password).await,
            Command::SuggestAddress { query } => {
                for suggestion in address_suggestions(&query) {
                    println!("suggestion={suggestion}");
                }
                Ok(())
            }
            Command::Board {
                search,
                status,
                page,
                per_page,
            } => {
                board(ApplicationQuery {
                    search,
                    status,
                    page,
                    per_page,
                });
                Ok(())
            }
        }
    })
}

fn board(query: ApplicationQuery) {
    let board = ApplicationBoard::new(fixture_applications());
    let counts = board.counts();
    println!(
        "counts.total={} counts.pending={} counts.approved={} counts.rejected={}",
        counts.total, counts.pending, counts.approved, counts.rejected
    );
    let page = board.page(&query);
    println!("page={}/{} matching={}", page.page, page.total_pages, page.total_items);
    for app in &page.items {
        println!(
            "application={} status={} name={} {}",
            app.reference, app.status, app.given_name, app.family_name
        );
    }
}

fn random_source(settings: &PortalSettings) -> Arc<dyn RandomSource> {
    match settings.random_seed {
        Some(seed) => Arc::new(SeededRandomSource::new(seed)),
        None => Arc::new(ThreadRandomSource),
    }
}

fn load_script(path: &Path) -> Result<ApplicantScript> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("applicant path must be a file: {}", path.display()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .with_context(|| format!("open applicant directory {}", parent.display()))?;
    let raw = dir
        .read_to_string(file_name)
        .with_context(|| format!("read applicant script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse applicant script {}", path.display()))
}

async fn enrol(
    settings: &PortalSettings,
    applicant: &Path,
    receipt_dir: Option<PathBuf>,
    max_attempts: u32,
) -> Result<()> {
    let script = load_script(applicant)?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let sleeper = Arc::new(TokioSleeper);
    let random = random_source(settings);

    let autosave = Arc::new(SpawningAutosave::new(sleeper.clone(), settings.autosave_latency()));
    let mut wizard = WizardController::new(clock.clone(), autosave);
    let uploader = DocumentUploader::new(
        Arc::new(SimulatedDocumentVerifier::new(random.clone())),
        sleeper.clone(),
        settings.upload_timing(),
    );
    let contact = ContactVerifier::new(sleeper.clone(), settings.contact_verification_delay());
    let mut simulator =
        SubmissionSimulator::new(sleeper, random, clock, settings.submission_stage_delay());
    let services = ScriptServices {
        uploader: &uploader,
        contact: &contact,
        simulator: &mut simulator,
    };

    let outcome = match run_script(script, &mut wizard, services, max_attempts).await {
        Ok(outcome) => outcome,
        Err(WizardError::Invalid { step, report }) => {
            println!("rejected_step={}", step.number());
            println!("errors={}", report.to_details());
            return Err(eyre!("step {step} rejected"));
        }
        Err(err) => return Err(err).wrap_err("enrolment failed"),
    };

    for (kind, status) in &outcome.documents {
        println!("document.{kind}={status:?}");
    }
    println!("email_verified={}", outcome.email_verified);
    println!("phone_verified={}", outcome.phone_verified);
    for warning in &outcome.warnings {
        println!("warning={warning:?}");
    }
    println!("attempts={}", outcome.attempts);
    println!("outcome={:?}", outcome.result.outcome);
    println!("submitted_at={}", outcome.result.timestamp.to_rfc3339());
    if let Some(message) = &outcome.result.message {
        println!("message={message}");
    }
    if let Some(reference) = &outcome.result.case_reference {
        println!("case_reference={reference}");
    }

    if let Some(receipt) = wizard.receipt() {
        let root = receipt_dir.unwrap_or_else(|| settings.receipt_dir());
        let path = ReceiptWriter::new(root)
            .write(&receipt)
            .wrap_err("write receipt")?;
        println!("receipt={}", path.display());
    }
    Ok(())
}

async fn login(settings: &PortalSettings, email: &str, password: &str) -> Result<()> {
    let tokens: Arc<dyn SessionTokenStore> = match &settings.token_dir {
        Some(dir) => Arc::new(FileTokenStore::open(dir).wrap_err("open token store")?),
        None => Arc::new(InMemoryTokenStore::default()),
    };
    let mut session = AuthSession::new(
        Arc::new(FixtureLoginService),
        tokens,
        Arc::new(TokioSleeper),
        settings.login_delay(),
    );
    if let Some(user) = session.restore() {
        println!("restored={}", user.email);
    }

    let authenticated = session.login(email, password).await;
    println!("authenticated={authenticated}");
    if let Some(user) = session.current_user() {
        println!("name={}", user.name);
        println!("role={}", user.role);
    }
    println!("view={:?}", resolve(Destination::Dashboard, &session));
    Ok(())
}
