mod backend;
mod cloud;
mod compat;
mod helpers;
mod settings;
#[cfg(test)]
mod testing;
mod wizard;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use backend::{CatalogBackend, CloudManager, HttpBackend};
use cloud::Job;
use settings::{BackendSettings, Settings};
use wizard::WizardError;

/// Env var holding the whole settings document as JSON; takes precedence
/// over the settings file.
const SETTINGS_JSON_ENV: &str = "MACHINE_WIZARD_SETTINGS_JSON";

fn init_tracing() {
    // Log to stderr so it does not interleave with the menus
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("machine_wizard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings() -> Result<&'static Settings> {
    if std::env::var_os(SETTINGS_JSON_ENV).is_some() {
        return settings::init_from_env(SETTINGS_JSON_ENV).with_context(|| format!("load settings from ${SETTINGS_JSON_ENV}"));
    }

    let path = settings::settings_file_path();
    settings::init_from_file(&path).with_context(|| format!("load settings from {}", path.display()))
}

fn connect(settings: &Settings) -> Result<Box<dyn CloudManager>> {
    Ok(match settings.backend() {
        BackendSettings::Catalog { path } => {
            info!(path = %path.display(), "using catalog backend");
            Box::new(CatalogBackend::from_file(path).with_context(|| format!("load catalog {}", path.display()))?)
        }
        BackendSettings::Http { url } => {
            info!(%url, "using HTTP backend");
            Box::new(HttpBackend::new(url.clone())?)
        }
    })
}

/// A tiny wrapper to render the outcome cleanly
fn print_job(job: &Job) {
    println!("\n=== Job ===");
    println!("Id:      {}", job.id());
    println!("Status:  {}", job.status());
    if let Some(machine) = job.created_machine() {
        println!("Machine:");
        println!("  id:       {}", machine.id());
        println!("  name:     {}", machine.name());
        println!("  location: {}", machine.location());
        println!("  state:    {}", machine.state().unwrap_or("<unknown>"));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = load_settings()?;
    let backend = connect(settings)?;

    match wizard::run(backend.as_ref(), settings).await {
        Ok(job) => {
            print_job(&job);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<WizardError>() {
            Some(WizardError::Cancelled) => {
                println!("Machine creation cancelled.");
                Ok(())
            }
            Some(wizard_err @ WizardError::Submission(_)) => {
                error!("{wizard_err}");
                Err(err)
            }
            _ => Err(err),
        },
    }
}
