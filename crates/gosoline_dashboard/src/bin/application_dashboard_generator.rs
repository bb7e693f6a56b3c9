use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{ArgGroup, Parser};
use gosoline_config::dumping::SerializeConfig;
use gosoline_config::loading::load_and_process_config;
use gosoline_config::ConfigError;
use gosoline_dashboard::app_id::AppId;
use gosoline_dashboard::clock::DefaultClock;
use gosoline_dashboard::dashboard_definition::build_application_dashboard;
use gosoline_dashboard::errors::{MetadataReaderError, ResourceNamesError};
use gosoline_dashboard::metadata::ApplicationMetadata;
use gosoline_dashboard::metadata_reader::MetadataReader;
use gosoline_dashboard::resource_names::{DiscoveredResources, ResourceNames};
use gosoline_dashboard::trace_util::configure_tracing;
use gosoline_dashboard_config::config::DashboardProviderConfig;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Error)]
enum DashboardGeneratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ResourceNames(#[from] ResourceNamesError),
    #[error(transparent)]
    MetadataReader(#[from] MetadataReaderError),
    #[error("Failed to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse {}: {source}", .path.display())]
    InvalidJson { path: PathBuf, source: serde_json::Error },
}

#[derive(Parser, Debug)]
#[command(
    name = "application_dashboard_generator",
    about = "Generates the grafana dashboard of a gosoline application."
)]
#[command(group(
    ArgGroup::new("metadata_source").required(true).args(["metadata_file", "read_metadata"])
))]
struct Args {
    #[arg(long = "config_file", help = "Config files, applied in the given order")]
    config_files: Vec<PathBuf>,

    #[arg(long = "config_override", help = "Config overrides in the form param.path=value")]
    config_overrides: Vec<String>,

    #[arg(long = "metadata_file", help = "Application metadata json")]
    metadata_file: Option<PathBuf>,

    #[arg(long = "read_metadata", help = "Read the metadata from the running application")]
    read_metadata: bool,

    #[arg(long = "discovered_file", help = "Resources discovered through the cluster APIs")]
    discovered_file: Option<PathBuf>,

    #[arg(long = "output_path", default_value = "dashboard.json")]
    output_path: PathBuf,

    #[arg(long)]
    project: String,

    #[arg(long = "env")]
    environment: String,

    #[arg(long)]
    family: String,

    #[arg(long)]
    group: String,

    #[arg(long = "app")]
    application: String,
}

impl Args {
    fn app_id(&self) -> AppId {
        AppId::new(&self.project, &self.environment, &self.family, &self.group, &self.application)
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, DashboardGeneratorError> {
    let file = File::open(path)
        .map_err(|source| DashboardGeneratorError::Io { path: path.to_owned(), source })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| DashboardGeneratorError::InvalidJson { path: path.to_owned(), source })
}

async fn fetch_metadata(
    config: &DashboardProviderConfig,
    app_id: &AppId,
) -> Result<ApplicationMetadata, DashboardGeneratorError> {
    let reader =
        MetadataReader::from_config(config, reqwest::Client::new(), Arc::new(DefaultClock))?;

    let cancellation_token = CancellationToken::new();
    let cancel_on_interrupt = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the metadata request.");
            cancel_on_interrupt.cancel();
        }
    });

    Ok(reader.read_metadata(app_id, &cancellation_token).await?)
}

#[tokio::main]
async fn main() -> Result<(), DashboardGeneratorError> {
    configure_tracing().await;

    let args = Args::parse();
    let app_id = args.app_id();
    let config: DashboardProviderConfig = load_and_process_config(
        DashboardProviderConfig::default().dump(),
        &args.config_files,
        &args.config_overrides,
    )?;

    let discovered: DiscoveredResources = match &args.discovered_file {
        Some(path) => read_json_file(path)?,
        None => DiscoveredResources::default(),
    };
    let resource_names = ResourceNames::from_patterns(
        config.orchestrator,
        &config.name_patterns,
        &app_id,
        &discovered,
    )?;

    let metadata = match &args.metadata_file {
        Some(path) => read_json_file(path)?,
        None => fetch_metadata(&config, &app_id).await?,
    };

    let dashboard =
        build_application_dashboard(resource_names, config.orchestrator, &metadata, &discovered);
    dashboard.write_to_file(&args.output_path).map_err(|source| DashboardGeneratorError::Io {
        path: args.output_path.clone(),
        source,
    })?;

    info!(
        "Generated dashboard {} with {} panels at {}.",
        dashboard.title,
        dashboard.panels.len(),
        args.output_path.display()
    );
    Ok(())
}
