//! Shared test utilities and fixtures.

use url::Url;
use utorrent_types::{Torrent, TorrentStatus};

pub(crate) const TOKEN_PAGE: &str =
    "<html><div id='token' style='display:none;'>tok-1</div></html>";

pub(crate) const ACK_BODY: &str = r#"{"build":30470}"#;

pub(crate) const FULL_LIST_BODY: &str = r#"{
    "build": 30470,
    "label": [["linux", 1]],
    "torrents": [
        ["B", 201, "ubuntu.iso", 1000, 500, 500, 100, 200, 10, 20, 60, "linux", 3, 30, 2, 20, 65536, 1, 500],
        ["C", 136, "debian.iso", 2000, 1000, 2000, 0, 0, 0, 0, 0, "", 0, 0, 0, 0, 65536, -1, 0]
    ],
    "torrentc": "1001"
}"#;

pub(crate) const FILES_BODY: &str = r#"{
    "build": 30470,
    "files": [
        "A", [["a.txt", 100, 50, 2], ["b.txt", 200, 0, 0]],
        "B", [["c.bin", 300, 300, 3]]
    ]
}"#;

pub(crate) const PROPS_BODY: &str = r#"{
    "build": 30470,
    "props": [{
        "hash": "A",
        "trackers": "udp://tracker.one:80\r\n\r\nudp://tracker.two:80\r\n",
        "ulrate": 0,
        "dlrate": 0,
        "superseed": 0,
        "dht": 1,
        "pex": 1,
        "seed_override": 0,
        "seed_ratio": 1500,
        "seed_time": 0,
        "ulslots": 0
    }]
}"#;

pub(crate) const SETTINGS_BODY: &str = r#"{
    "build": 30470,
    "settings": [
        ["bind_port", 0, "6881"],
        ["dht", 1, "true"],
        ["dir_active_download", 2, "/downloads"],
        ["odd_int", 0, "abc", {"access": "Y"}]
    ]
}"#;

/// A list row for `hash` in wire form.
pub(crate) fn list_row(hash: &str) -> String {
    format!(
        r#"["{hash}", 201, "{hash}-name", 1000, 500, 500, 0, 0, 0, 0, 0, "", 0, 0, 0, 0, 65536, 1, 500]"#
    )
}

/// A delta list message in wire form.
pub(crate) fn delta_list_body(changed: &[&str], removed: &[&str], cache_id: &str) -> String {
    let rows: Vec<_> = changed.iter().map(|h| list_row(h)).collect();
    let removed: Vec<_> = removed.iter().map(|h| format!("\"{h}\"")).collect();
    format!(
        r#"{{"build":30470,"label":[],"torrentp":[{}],"torrentm":[{}],"torrentc":"{cache_id}"}}"#,
        rows.join(","),
        removed.join(",")
    )
}

pub(crate) fn make_test_torrent(hash: &str, name: &str) -> Torrent {
    Torrent {
        hash: hash.to_string(),
        status: TorrentStatus(201),
        name: name.to_string(),
        size: 1000,
        progress: 500,
        downloaded: 500,
        uploaded: 0,
        ratio: 0,
        upload_speed: 0,
        download_speed: 0,
        eta: 0,
        label: String::new(),
        peers_connected: 0,
        peers_in_swarm: 0,
        seeds_connected: 0,
        seeds_in_swarm: 0,
        availability: 65536,
        queue_order: 1,
        remaining: 500,
    }
}

/// Every value of query parameter `key`, in order.
pub(crate) fn query_values(url: &Url, key: &str) -> Vec<String> {
    url.query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

/// The single value of query parameter `key`, if present.
pub(crate) fn query_value(url: &Url, key: &str) -> Option<String> {
    query_values(url, key).into_iter().next()
}

pub(crate) fn is_token_request(url: &Url) -> bool {
    url.path().ends_with("/token.html")
}
