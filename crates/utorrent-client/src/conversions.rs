//! Conversions from WebUI JSON messages to utorrent_types.
//!
//! The WebUI encodes torrents, files and settings as positional arrays, so rows are read by
//! index rather than derived.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use utorrent_types::{
    ClientSettings, Priority, SettingValue, Torrent, TorrentFile, TorrentFileList,
    TorrentListUpdate, TorrentProperties, TorrentStatus, UTorrentError,
};

/// Number of leading entries of a list row this client understands.
const TORRENT_ROW_LEN: usize = 19;
const FILE_ROW_LEN: usize = 4;
const SETTING_ROW_LEN: usize = 3;

const SETTING_TYPE_INTEGER: i64 = 0;
const SETTING_TYPE_BOOLEAN: i64 = 1;

#[derive(Debug, Deserialize)]
struct WireTorrentList {
    torrents: Option<Vec<Vec<Value>>>,
    torrentp: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    torrentm: Vec<String>,
    torrentc: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireFileList {
    #[serde(default)]
    files: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WirePropertiesList {
    #[serde(default)]
    props: Vec<WireProperties>,
}

#[derive(Debug, Deserialize)]
struct WireProperties {
    hash: String,
    #[serde(default)]
    trackers: String,
    #[serde(default)]
    ulrate: i64,
    #[serde(default)]
    dlrate: i64,
    #[serde(default)]
    superseed: i64,
    #[serde(default)]
    dht: i64,
    #[serde(default)]
    pex: i64,
    #[serde(default)]
    seed_override: i64,
    #[serde(default)]
    seed_ratio: i64,
    #[serde(default)]
    seed_time: i64,
    #[serde(default)]
    ulslots: i64,
}

#[derive(Debug, Deserialize)]
struct WireSettings {
    #[serde(default)]
    settings: Vec<Vec<Value>>,
}

/// Parses a list response into a snapshot or a delta.
pub(crate) fn parse_torrent_list(body: &str) -> Result<TorrentListUpdate, UTorrentError> {
    let wire: WireTorrentList = from_json(body)?;
    let cache_id = wire.torrentc.as_ref().map(value_to_string);

    if let Some(rows) = wire.torrents {
        return Ok(TorrentListUpdate::Snapshot {
            torrents: rows.iter().map(|r| torrent_from_row(r)).collect::<Result<_, _>>()?,
            cache_id,
        });
    }

    let changed = wire
        .torrentp
        .unwrap_or_default()
        .iter()
        .map(|r| torrent_from_row(r))
        .collect::<Result<_, _>>()?;

    Ok(TorrentListUpdate::Delta {
        changed,
        removed: wire.torrentm,
        cache_id,
    })
}

/// Parses a `getfiles` response. `files` alternates a torrent hash and that torrent's rows.
pub(crate) fn parse_file_lists(body: &str) -> Result<Vec<TorrentFileList>, UTorrentError> {
    let wire: WireFileList = from_json(body)?;
    if wire.files.len() % 2 != 0 {
        return Err(invalid("files must alternate hash and file rows"));
    }

    wire.files
        .chunks(2)
        .map(|pair| {
            let hash = pair[0]
                .as_str()
                .ok_or_else(|| invalid("file list hash is not a string"))?
                .to_string();
            let rows = pair[1]
                .as_array()
                .ok_or_else(|| invalid(format!("files of {hash} are not an array")))?;
            let files = rows
                .iter()
                .map(file_from_row)
                .collect::<Result<_, _>>()?;
            Ok(TorrentFileList { hash, files })
        })
        .collect()
}

/// Parses a `getprops` response.
pub(crate) fn parse_properties(body: &str) -> Result<Vec<TorrentProperties>, UTorrentError> {
    let wire: WirePropertiesList = from_json(body)?;
    Ok(wire.props.into_iter().map(properties_from_wire).collect())
}

/// Parses a `getsettings` response.
pub(crate) fn parse_settings(body: &str) -> Result<ClientSettings, UTorrentError> {
    let wire: WireSettings = from_json(body)?;
    let mut settings = BTreeMap::new();
    for row in &wire.settings {
        if row.len() < SETTING_ROW_LEN {
            return Err(invalid(format!("setting row too short: {row:?}")));
        }
        let name = str_at(row, 0)?;
        let kind = int_at(row, 1)?;
        let raw = value_to_string(&row[2]);
        settings.insert(name, setting_value(kind, raw));
    }
    Ok(ClientSettings(settings))
}

fn setting_value(kind: i64, raw: String) -> SettingValue {
    match kind {
        SETTING_TYPE_INTEGER => match raw.parse() {
            Ok(n) => SettingValue::Integer(n),
            Err(_) => SettingValue::Text(raw),
        },
        SETTING_TYPE_BOOLEAN => match raw.as_str() {
            "true" => SettingValue::Boolean(true),
            "false" => SettingValue::Boolean(false),
            _ => SettingValue::Text(raw),
        },
        _ => SettingValue::Text(raw),
    }
}

fn torrent_from_row(row: &[Value]) -> Result<Torrent, UTorrentError> {
    if row.len() < TORRENT_ROW_LEN {
        return Err(invalid(format!(
            "torrent row has {} entries, expected at least {TORRENT_ROW_LEN}",
            row.len()
        )));
    }

    let status = u32::try_from(int_at(row, 1)?)
        .map_err(|_| invalid("torrent status out of range"))?;

    Ok(Torrent {
        hash: str_at(row, 0)?,
        status: TorrentStatus(status),
        name: str_at(row, 2)?,
        size: int_at(row, 3)?,
        progress: int_at(row, 4)?,
        downloaded: int_at(row, 5)?,
        uploaded: int_at(row, 6)?,
        ratio: int_at(row, 7)?,
        upload_speed: int_at(row, 8)?,
        download_speed: int_at(row, 9)?,
        eta: int_at(row, 10)?,
        label: str_at(row, 11)?,
        peers_connected: int_at(row, 12)?,
        peers_in_swarm: int_at(row, 13)?,
        seeds_connected: int_at(row, 14)?,
        seeds_in_swarm: int_at(row, 15)?,
        availability: int_at(row, 16)?,
        queue_order: int_at(row, 17)?,
        remaining: int_at(row, 18)?,
    })
}

fn file_from_row(row: &Value) -> Result<TorrentFile, UTorrentError> {
    let row = row
        .as_array()
        .filter(|r| r.len() >= FILE_ROW_LEN)
        .ok_or_else(|| invalid(format!("malformed file row: {row}")))?;

    let priority = int_at(row, 3)?;
    Ok(TorrentFile {
        name: str_at(row, 0)?,
        size: int_at(row, 1)?,
        downloaded: int_at(row, 2)?,
        priority: Priority::from_value(priority)
            .ok_or_else(|| invalid(format!("unknown file priority {priority}")))?,
    })
}

fn properties_from_wire(wire: WireProperties) -> TorrentProperties {
    TorrentProperties {
        trackers: wire
            .trackers
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        hash: wire.hash,
        upload_rate: wire.ulrate,
        download_rate: wire.dlrate,
        superseed: wire.superseed,
        dht: wire.dht,
        pex: wire.pex,
        seed_override: wire.seed_override,
        seed_ratio: wire.seed_ratio,
        seed_time: wire.seed_time,
        upload_slots: wire.ulslots,
    }
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, UTorrentError> {
    serde_json::from_str(body).map_err(|e| invalid(e.to_string()))
}

fn str_at(row: &[Value], idx: usize) -> Result<String, UTorrentError> {
    row[idx]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("entry {idx} is not a string: {}", row[idx])))
}

fn int_at(row: &[Value], idx: usize) -> Result<i64, UTorrentError> {
    let value = &row[idx];
    value
        .as_i64()
        // Some builds report large counters as floats, others quote them.
        .or_else(|| value.as_f64().map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| invalid(format!("entry {idx} is not a number: {value}")))
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid(msg: impl Into<String>) -> UTorrentError {
    UTorrentError::InvalidMessage(msg.into())
}
