//! # BPCTL CLI
//!
//! Command-line interface driving the broker adapter directly.
//!
//! Useful to inspect what the reconciliation loop sees and to trigger
//! operations by hand. Scope and secret namespace come from the same
//! environment variables the proxy reads.
//!
//! ## Usage
//!
//! ```bash
//! # List registered brokers
//! bpctl list
//!
//! # Register a broker
//! bpctl create 3f1c0d2e my_broker https://broker.example.com --username admin --password admin
//!
//! # Rotate credentials / move the url
//! bpctl update 1234 3f1c0d2e my_broker https://new.example.com --username admin --password s3cret
//!
//! # Ask the catalog controller to relist a broker
//! bpctl sync my_broker
//!
//! # Register brokers in a namespace instead of cluster-wide
//! BROKER_PROXY_TARGET_NAMESPACE=team-a bpctl list
//! ```

use anyhow::{Context, Result};
use broker_proxy::observability;
use broker_proxy::platform::{
    BasicCredentials, CreateServiceBrokerRequest, DeleteServiceBrokerRequest,
    UpdateServiceBrokerRequest,
};
use broker_proxy::{AdapterConfig, BrokerPlatformClient, PlatformAdapter};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

/// Service Catalog broker proxy CLI
#[derive(Parser)]
#[command(name = "bpctl")]
#[command(
    about = "Service Catalog broker proxy CLI",
    long_about = None,
    after_help = "\
Examples:
  bpctl list
  bpctl get my-broker
  bpctl sync my-broker
  BROKER_PROXY_TARGET_NAMESPACE=team-a bpctl list
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target namespace (overrides BROKER_PROXY_TARGET_NAMESPACE; empty for cluster scope)
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered brokers
    List,
    /// Show one broker
    Get {
        /// Broker name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Register a broker and its credential secret
    Create {
        /// External id, also the credential secret name
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "URL")]
        url: String,
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Update a broker's url and credentials
    Update {
        /// Cluster uid of the broker
        #[arg(value_name = "GUID")]
        guid: String,
        /// External id, also the credential secret name
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "URL")]
        url: String,
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Delete a broker (its credential secret is kept)
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
        /// Cluster uid of the broker, for logging only
        #[arg(long, default_value = "")]
        guid: String,
    },
    /// Request a catalog relist for a broker
    Sync {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Show which optional operations this platform supports
    Capabilities,
}

#[derive(Args)]
struct CredentialArgs {
    /// Basic-auth username
    #[arg(long, env = "BROKER_USERNAME")]
    username: String,
    /// Basic-auth password
    #[arg(long, env = "BROKER_PASSWORD", hide_env_values = true)]
    password: String,
}

impl CredentialArgs {
    fn into_credentials(self) -> BasicCredentials {
        BasicCredentials::new(self.username, self.password)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("Failed to install rustls crypto provider");
    }

    observability::init_logging("bpctl=info,broker_proxy=warn");

    let cli = Cli::parse();

    let mut config = AdapterConfig::from_env();
    if let Some(namespace) = cli.namespace {
        config.target_namespace = namespace.trim().to_string();
    }

    let adapter = PlatformAdapter::connect(config)
        .await
        .context("Failed to create broker adapter. Ensure kubeconfig is configured.")?;

    match cli.command {
        Commands::List => print_json(&adapter.get_brokers().await?),
        Commands::Get { name } => print_json(&adapter.get_broker_by_name(&name).await?),
        Commands::Create {
            id,
            name,
            url,
            credentials,
        } => {
            let request = CreateServiceBrokerRequest {
                id,
                name,
                broker_url: url,
                credentials: credentials.into_credentials(),
            };
            print_json(&adapter.create_broker(&request).await?)
        }
        Commands::Update {
            guid,
            id,
            name,
            url,
            credentials,
        } => {
            let request = UpdateServiceBrokerRequest {
                guid,
                id,
                name,
                broker_url: url,
                credentials: credentials.into_credentials(),
            };
            print_json(&adapter.update_broker(&request).await?)
        }
        Commands::Delete { name, guid } => {
            adapter
                .delete_broker(&DeleteServiceBrokerRequest { guid, name: name.clone() })
                .await?;
            println!("✅ Deleted broker '{name}'");
            Ok(())
        }
        Commands::Sync { name } => {
            // Only the name matters for a relist
            let request = UpdateServiceBrokerRequest {
                guid: String::new(),
                id: String::new(),
                name: name.clone(),
                broker_url: String::new(),
                credentials: BasicCredentials::new("", ""),
            };
            adapter.fetch_catalog(&request).await?;
            println!("✅ Requested catalog relist for broker '{name}'");
            Ok(())
        }
        Commands::Capabilities => print_json(&adapter.capabilities()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}
