//! HCP contract CLI
//!
//! Command-line interface for inspecting wire versions and running the
//! write-validation pipeline against request bodies.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use hcp_contract::registry::{ApiRegistry, ApiVersion, ResourceContract};
use hcp_contract::CloudError;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "hcp-contract")]
#[command(about = "Inspect and validate HCP resource-provider wire contracts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered API versions, oldest first
    Versions,

    /// Print the fully-defaulted wire skeleton for a resource kind
    Defaults {
        /// API version, e.g. 2025-12-22-preview
        #[arg(long)]
        api_version: String,

        /// Resource kind
        #[arg(long, value_enum)]
        kind: Kind,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Run the write pipeline on a request body
    Validate {
        /// Candidate request body (JSON file)
        candidate: PathBuf,

        /// API version, e.g. 2025-12-22-preview
        #[arg(long)]
        api_version: String,

        /// Resource kind
        #[arg(long, value_enum)]
        kind: Kind,

        /// Current canonical resource (JSON file); implies updating
        #[arg(long)]
        current: Option<PathBuf>,

        /// Output errors as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum Kind {
    Cluster,
    NodePool,
    ExternalAuth,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Cluster => "cluster",
            Kind::NodePool => "node-pool",
            Kind::ExternalAuth => "external-auth",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let registry = ApiRegistry::with_all_versions();

    let result = match cli.command {
        Commands::Versions => run_versions(&registry),
        Commands::Defaults {
            api_version,
            kind,
            pretty,
        } => run_defaults(&registry, &api_version, kind, pretty),
        Commands::Validate {
            candidate,
            api_version,
            kind,
            current,
            json,
            pretty,
        } => run_validate(&registry, &api_version, kind, &candidate, current, json, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_versions(registry: &ApiRegistry) -> Result<(), u8> {
    for version in registry.versions() {
        println!("{}", version);
    }
    Ok(())
}

fn lookup<'a>(registry: &'a ApiRegistry, api_version: &str) -> Result<&'a dyn ApiVersion, u8> {
    let version = registry.lookup(api_version).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    Ok(version.as_ref())
}

fn run_defaults(
    registry: &ApiRegistry,
    api_version: &str,
    kind: Kind,
    pretty: bool,
) -> Result<(), u8> {
    let version = lookup(registry, api_version)?;
    let skeleton = match kind {
        Kind::Cluster => version.cluster().to_wire(None),
        Kind::NodePool => kind_contract(version.node_pool(), kind, api_version)?.to_wire(None),
        Kind::ExternalAuth => {
            kind_contract(version.external_auth(), kind, api_version)?.to_wire(None)
        }
    };
    print_json(&skeleton, pretty)
}

/// Kinds a version predates are a usage error, same class as an unknown
/// version string.
fn kind_contract<'a, C>(
    contract: Option<&'a dyn ResourceContract<C>>,
    kind: Kind,
    api_version: &str,
) -> Result<&'a dyn ResourceContract<C>, u8> {
    contract.ok_or_else(|| {
        eprintln!(
            "Error: resource kind '{}' is not served by api-version '{}'",
            kind.as_str(),
            api_version
        );
        2u8
    })
}

fn run_validate(
    registry: &ApiRegistry,
    api_version: &str,
    kind: Kind,
    candidate_path: &Path,
    current_path: Option<PathBuf>,
    json_output: bool,
    pretty: bool,
) -> Result<(), u8> {
    let version = lookup(registry, api_version)?;
    let candidate = load_json(candidate_path)?;
    let current = match &current_path {
        Some(path) => Some(load_json(path)?),
        None => None,
    };
    let updating = current.is_some();

    let normalized = match kind {
        Kind::Cluster => validate_kind(version.cluster(), &candidate, current, updating),
        Kind::NodePool => validate_kind(
            kind_contract(version.node_pool(), kind, api_version)?,
            &candidate,
            current,
            updating,
        ),
        Kind::ExternalAuth => validate_kind(
            kind_contract(version.external_auth(), kind, api_version)?,
            &candidate,
            current,
            updating,
        ),
    };

    match normalized {
        Ok(value) => print_json(&value, pretty),
        Err(err) => {
            report_cloud_error(&err, json_output);
            Err(err.exit_code() as u8)
        }
    }
}

fn validate_kind<C>(
    contract: &dyn ResourceContract<C>,
    candidate: &Value,
    current: Option<Value>,
    updating: bool,
) -> Result<Value, CloudError>
where
    C: serde::Serialize + serde::de::DeserializeOwned,
{
    let current: Option<C> = match current {
        Some(value) => Some(
            serde_json::from_value(value)
                .map_err(|e| CloudError::malformed_request_body(e.to_string()))?,
        ),
        None => None,
    };
    let normalized = contract.validate_write(candidate, current.as_ref(), updating)?;
    serde_json::to_value(&normalized).map_err(|e| CloudError::malformed_request_body(e.to_string()))
}

fn load_json(path: &Path) -> Result<Value, u8> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        3u8
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error parsing {}: {}", path.display(), e);
        2u8
    })
}

fn print_json(value: &Value, pretty: bool) -> Result<(), u8> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    println!("{}", text);
    Ok(())
}

/// Output an error envelope in plain text or JSON format.
fn report_cloud_error(err: &CloudError, json_output: bool) {
    if json_output {
        match serde_json::to_string(err) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error serializing error envelope: {}", e),
        }
    } else {
        eprintln!("Error: {}", err);
    }
}
