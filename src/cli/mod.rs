//! # Command Line Interface
//!
//! `tyk-operator` commands: snapshot export, inspection of what a gateway or
//! dashboard holds, hot reload, and offline helpers for `tyk://` targets.
//!
//! Connection settings come from the `TYK_*` environment variables (or a
//! `.env` file); `--mode`, `--url`, `--auth` and `--org` override them.

pub mod output;
pub mod resources;
pub mod targets;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::client::Universal;
use crate::config::{env_keys, LogFormat, OperatorConfig};
use crate::observability::{init_logging, init_metrics, log_config_info};
use crate::snapshot::{self, SnapshotOptions};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "tyk-operator")]
#[command(about = "Tyk operator tooling for gateways and dashboards")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json or yaml)
    #[arg(short, long, global = true, default_value = "yaml")]
    pub output: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Overrides for the `TYK_*` environment variables.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Backend mode: ce (gateway) or pro (dashboard)
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Gateway or dashboard base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Gateway secret or dashboard user key
    #[arg(long, global = true)]
    pub auth: Option<String>,

    /// Organisation id
    #[arg(long, global = true)]
    pub org: Option<String>,
}

impl ConnectionArgs {
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            env_keys::TYK_MODE => self.mode.clone(),
            env_keys::TYK_URL => self.url.clone(),
            env_keys::TYK_AUTH => self.auth.clone(),
            env_keys::TYK_ORG => self.org.clone(),
            _ => None,
        }
    }

    /// Flags first, then the environment.
    pub fn config(&self) -> crate::errors::Result<OperatorConfig> {
        OperatorConfig::from_lookup(|key| self.lookup(key).or_else(|| std::env::var(key).ok()))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export API definitions and policies as custom resources
    Snapshot(SnapshotArgs),

    /// API definition commands
    Api {
        #[command(subcommand)]
        command: resources::ApiCommands,
    },

    /// Security policy commands
    Policy {
        #[command(subcommand)]
        command: resources::PolicyCommands,
    },

    /// Certificate commands
    Cert {
        #[command(subcommand)]
        command: resources::CertCommands,
    },

    /// OAS API commands
    Oas {
        #[command(subcommand)]
        command: resources::OasCommands,
    },

    /// Ask the gateway to reload its APIs and policies
    Reload,

    /// Resolve the in-cluster targets of an API definition file
    Resolve {
        /// ApiDefinition resource or bare API definition (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Decode a tyk:// URL into its target, path and query
    DecodeTarget {
        /// tyk:// URL
        url: String,
    },
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// File to write ApiDefinition resources to
    #[arg(long, default_value = "apis.yaml")]
    pub apidef: PathBuf,

    /// File to write SecurityPolicy resources to
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Only export APIs tagged with this category
    #[arg(long)]
    pub category: Option<String>,

    /// Write one file per API and per policy
    #[arg(long)]
    pub separate: bool,

    /// Directory for --separate output
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl From<SnapshotArgs> for SnapshotOptions {
    fn from(args: SnapshotArgs) -> Self {
        SnapshotOptions {
            api_definitions_file: args.apidef,
            policies_file: args.policy,
            category: args.category,
            separate: args.separate,
            output_dir: args.output_dir,
        }
    }
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose);
    let output: OutputFormat = cli.output.parse()?;

    match cli.command {
        Commands::Resolve { file } => targets::handle_resolve(&file, output)?,
        Commands::DecodeTarget { url } => targets::handle_decode_target(&url, output)?,
        command => {
            let client = connect(&cli.connection).await?;
            run_remote(command, &client, output).await?;
        }
    }

    Ok(())
}

async fn connect(connection: &ConnectionArgs) -> anyhow::Result<Universal> {
    let config = connection.config().context("Failed to load configuration")?;
    log_config_info(&config);
    init_metrics(&config.observability).await?;
    Ok(Universal::from_config(&config)?)
}

async fn run_remote(command: Commands, client: &Universal, output: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Snapshot(args) => {
            let report = snapshot::export(client, &args.into()).await.context("Snapshot failed")?;
            output::print_output(&report, output)?;
        }
        Commands::Api { command } => resources::handle_api_command(command, client, output).await?,
        Commands::Policy { command } => resources::handle_policy_command(command, client, output).await?,
        Commands::Cert { command } => resources::handle_cert_command(command, client, output).await?,
        Commands::Oas { command } => resources::handle_oas_command(command, client).await?,
        Commands::Reload => {
            client.hot_reload().await.context("Hot reload failed")?;
            println!("Reload requested");
        }
        Commands::Resolve { .. } | Commands::DecodeTarget { .. } => {
            anyhow::bail!("command does not need a backend connection")
        }
    }

    Ok(())
}

fn initialise_logging(verbose: bool) {
    let format = match std::env::var(env_keys::LOG_FORMAT) {
        Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    };

    if let Err(e) = init_logging(verbose, format) {
        // Subscriber already set elsewhere (e.g. integration tests)
        debug!(error = %e, "Logging already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_snapshot() {
        let cli = Cli::parse_from([
            "tyk-operator",
            "snapshot",
            "--apidef",
            "out.yaml",
            "--policy",
            "policies.yaml",
            "--category",
            "payments",
            "--mode",
            "pro",
        ]);

        assert_eq!(cli.connection.mode.as_deref(), Some("pro"));
        match cli.command {
            Commands::Snapshot(args) => {
                let options: SnapshotOptions = args.into();
                assert_eq!(options.api_definitions_file, PathBuf::from("out.yaml"));
                assert_eq!(options.policies_file, Some(PathBuf::from("policies.yaml")));
                assert_eq!(options.category.as_deref(), Some("payments"));
                assert!(!options.separate);
            }
            _ => panic!("expected snapshot"),
        }
    }

    #[test]
    fn test_flags_override_environment() {
        let args = ConnectionArgs {
            mode: Some("ce".to_string()),
            url: Some("http://gateway:8080".to_string()),
            auth: Some("secret".to_string()),
            org: Some("org".to_string()),
        };

        let config = args.config().unwrap();
        assert_eq!(config.url, "http://gateway:8080");
        assert_eq!(config.auth, "secret");
    }
}
