//! Inspection commands for APIs, policies, certificates and OAS documents.

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::{print_output, print_table, OutputFormat};
use crate::client::Universal;
use crate::model::ListApiOptions;

#[derive(Subcommand)]
pub enum ApiCommands {
    /// List API definitions
    List {
        /// Only APIs whose name contains this text
        #[arg(short, long)]
        query: Option<String>,

        /// Only APIs in this category (dashboard only)
        #[arg(long)]
        category: Option<String>,
    },

    /// Get an API definition by API id
    Get {
        /// API id
        id: String,
    },

    /// Delete an API definition by API id
    Delete {
        /// API id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PolicyCommands {
    /// List security policies
    List,

    /// Get a security policy by id
    Get {
        /// Policy id (object id on the dashboard)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CertCommands {
    /// List stored certificate ids
    List,
}

#[derive(Subcommand)]
pub enum OasCommands {
    /// Print an OAS API document
    Get {
        /// API id
        id: String,
    },
}

pub async fn handle_api_command(command: ApiCommands, client: &Universal, output: OutputFormat) -> Result<()> {
    match command {
        ApiCommands::List { query, category } => {
            let options = ListApiOptions { query, category, ..ListApiOptions::all_pages() };
            let list = client.api().list(&options).await.context("Failed to list APIs")?;

            let rows: Vec<Vec<String>> = list
                .apis
                .iter()
                .map(|api| {
                    vec![
                        api.api_id().to_string(),
                        api.name.clone(),
                        api.proxy.listen_path.clone().unwrap_or_default(),
                        api.proxy.target_url.clone(),
                    ]
                })
                .collect();
            print_table(&[("API ID", 34), ("Name", 30), ("Listen Path", 24), ("Target", 40)], &rows);
            println!("\n{} API(s)", rows.len());
        }
        ApiCommands::Get { id } => {
            let api = client.api().get(&id).await.with_context(|| format!("Failed to get API {}", id))?;
            print_output(&api, output)?;
        }
        ApiCommands::Delete { id } => {
            let result =
                client.api().delete(&id).await.with_context(|| format!("Failed to delete API {}", id))?;
            print_output(&result, output)?;
        }
    }

    Ok(())
}

pub async fn handle_policy_command(
    command: PolicyCommands,
    client: &Universal,
    output: OutputFormat,
) -> Result<()> {
    let policies = client.portal().policy();

    match command {
        PolicyCommands::List => {
            let all = policies.all().await.context("Failed to list policies")?;
            let rows: Vec<Vec<String>> = all
                .iter()
                .map(|p| {
                    vec![
                        if p.mid.is_empty() { p.id.clone() } else { p.mid.clone() },
                        p.name.clone(),
                        p.state.clone(),
                        p.access_rights.len().to_string(),
                    ]
                })
                .collect();
            print_table(&[("ID", 26), ("Name", 30), ("State", 8), ("APIs", 5)], &rows);
        }
        PolicyCommands::Get { id } => {
            let policy = policies.get(&id).await.with_context(|| format!("Failed to get policy {}", id))?;
            print_output(&policy, output)?;
        }
    }

    Ok(())
}

pub async fn handle_cert_command(command: CertCommands, client: &Universal, output: OutputFormat) -> Result<()> {
    match command {
        CertCommands::List => {
            let ids = client.certificate().all().await.context("Failed to list certificates")?;
            print_output(&ids, output)?;
        }
    }

    Ok(())
}

pub async fn handle_oas_command(command: OasCommands, client: &Universal) -> Result<()> {
    match command {
        OasCommands::Get { id } => {
            let doc = client.oas().get(&id).await.with_context(|| format!("Failed to get OAS API {}", id))?;
            println!("{}", doc);
        }
    }

    Ok(())
}
