//! marathonctl - inspect the Marathon launch queue and kill pod instances.

use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};
use marathon_sdk::{MarathonClient, MarathonConfig};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "marathonctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Marathon API root
    #[arg(long, env = "MARATHON_URL", global = true)]
    url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the launch queue
    Queue {
        /// Include the offers that were declined for each item
        #[arg(long)]
        unused_offers: bool,
    },
    /// Reset the launch delay of an application
    ClearDelay { app_id: String },
    /// Kill one instance of a pod
    DeleteInstance { pod_id: String, instance_id: String },
    /// Kill several instances of a pod
    DeleteInstances {
        pod_id: String,
        #[arg(required = true)]
        instance_ids: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = MarathonConfig::from_env();
    if let Some(url) = cli.url {
        config = config.with_url(url);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    let client = MarathonClient::with_config(config).wrap_err("invalid Marathon configuration")?;

    match cli.command {
        Commands::Queue { unused_offers } => {
            let queue = if unused_offers {
                client.queue_with_unused_offers().await?
            } else {
                client.queue().await?
            };
            info!(items = queue.len(), delayed = queue.delayed().count(), "launch queue");
            print_json(&queue)?;
        }
        Commands::ClearDelay { app_id } => {
            client
                .clear_queue_delay(&app_id)
                .await
                .wrap_err_with(|| format!("failed to clear launch delay of {}", app_id))?;
            info!(%app_id, "launch delay cleared");
        }
        Commands::DeleteInstance { pod_id, instance_id } => {
            let instance = client.delete_pod_instance(&pod_id, &instance_id).await?;
            print_json(&instance)?;
        }
        Commands::DeleteInstances { pod_id, instance_ids } => {
            let instances = client.delete_pod_instances(&pod_id, instance_ids.as_slice()).await?;
            info!(%pod_id, deleted = instances.len(), "pod instances deleted");
            print_json(&instances)?;
        }
    }

    Ok(())
}
