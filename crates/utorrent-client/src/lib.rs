//! # uTorrent WebUI client.
//!
//! usage:
//!
//! ```rust,ignore
//! use utorrent_client::{ConnectionParams, UTorrentClient};
//! use utorrent_types::UTorrentWebApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UTorrentClient::connect(&ConnectionParams::from_env())?;
//!     client.add_torrent_url("magnet:?xt=urn:btih:...").await?;
//!     for torrent in client.torrent_list().await? {
//!         println!("{} {:.1}%", torrent.name, torrent.percent_done() * 100.0);
//!     }
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! Every request carries the WebUI token. It is fetched on first use, shared by all requests and
//! refreshed once when the server rejects a request. Torrent listings are cached locally and kept
//! current through the server's cache ids, so repeated listings only transfer changes.

mod action;
mod cache;
mod client;
mod config;
mod conversions;
mod ops;
mod token;
mod transport;

#[cfg(test)]
mod testutil;

#[cfg(test)]
use httpmock as _;
#[cfg(test)]
use tracing_subscriber as _;

pub use client::UTorrentClient;
pub use config::ConnectionParams;
pub use transport::{FilePart, HttpTransport, TransportError};
