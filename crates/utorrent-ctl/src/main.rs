//! # uTorrent WebUI control
//!
//! ## Usage
//!
//! ```sh,ignore
//! UTORRENT_USERNAME=admin UTORRENT_PASSWORD=secret cargo run -p utorrent-ctl -- list
//! ```
//!
//! Connection settings are read from `UTORRENT_*` variables, optionally from a `.env` file.

use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use utorrent_client::{ConnectionParams, UTorrentClient};
use utorrent_types::UTorrentWebApi;

mod cli;

use cli::{Cli, Command};

/// Initializes the tracing subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the connection parameters from the environment and CLI overrides.
fn connection_params(cli: &Cli) -> ConnectionParams {
    let mut params = ConnectionParams::from_env();
    if let Some(host) = &cli.host {
        params.host = host.clone();
    }
    if let Some(port) = cli.port {
        params.port = port;
    }
    params
}

/// Runs one command and returns what to print.
async fn run(
    client: &UTorrentClient,
    command: Command,
) -> Result<Value, Box<dyn std::error::Error>> {
    let value = match command {
        Command::List => serde_json::to_value(client.torrent_list().await?)?,
        Command::Get { hash } => serde_json::to_value(client.torrent(&hash).await?)?,
        Command::AddUrl { url } => serde_json::to_value(client.add_torrent_url(&url).await?)?,
        Command::AddFile { path } => serde_json::to_value(client.add_torrent_file(&path).await?)?,
        Command::Start(h) => serde_json::to_value(client.start(&h.hashes).await?)?,
        Command::Stop(h) => serde_json::to_value(client.stop(&h.hashes).await?)?,
        Command::Pause(h) => serde_json::to_value(client.pause(&h.hashes).await?)?,
        Command::ForceStart(h) => serde_json::to_value(client.force_start(&h.hashes).await?)?,
        Command::Unpause(h) => serde_json::to_value(client.unpause(&h.hashes).await?)?,
        Command::Recheck(h) => serde_json::to_value(client.recheck(&h.hashes).await?)?,
        Command::Remove(h) => serde_json::to_value(client.remove(&h.hashes).await?)?,
        Command::RemoveData(h) => serde_json::to_value(client.remove_data(&h.hashes).await?)?,
        Command::Files(h) => serde_json::to_value(client.torrent_files(&h.hashes).await?)?,
        Command::Props(h) => serde_json::to_value(client.torrent_properties(&h.hashes).await?)?,
        Command::Priority {
            hash,
            priority,
            indices,
        } => serde_json::to_value(
            client
                .set_file_priority(&hash, priority.into(), &indices)
                .await?,
        )?,
        Command::Settings => serde_json::to_value(client.settings().await?)?,
        Command::SetSetting { name, value } => {
            serde_json::to_value(client.set_setting_named(&name, &value).await?)?
        }
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let params = connection_params(&cli);
    debug!("Connection: {params:?}");

    let client = UTorrentClient::connect(&params)?;
    let output = run(&client, cli.command).await;
    client.close();

    let output = output?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("Done");
    Ok(())
}
