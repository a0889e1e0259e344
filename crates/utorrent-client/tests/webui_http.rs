//! Drives UTorrentClient over real HTTP against a mock WebUI.

#![allow(unused_crate_dependencies)]
#![allow(missing_docs)]

use std::time::Duration;

use httpmock::prelude::*;
use utorrent_client::{ConnectionParams, UTorrentClient};
use utorrent_types::{RequestResult, UTorrentError, UTorrentWebApi};

const TOKEN_PAGE: &str = "<html><div id='token' style='display:none;'>tok-1</div></html>";
const ACK: &str = r#"{"build":30470}"#;
const FULL_LIST: &str = r#"{"build":30470,"label":[],"torrents":[
    ["AAA",201,"first",100,1000,100,0,0,0,0,0,"",0,0,0,0,65536,1,0],
    ["BBB",136,"second",200,500,100,0,0,0,0,0,"",0,0,0,0,65536,2,100]
],"torrentc":"77"}"#;
const DELTA_LIST: &str = r#"{"build":30470,"label":[],"torrentp":[
    ["CCC",201,"third",300,0,0,0,0,0,0,0,"",0,0,0,0,0,3,300]
],"torrentm":["BBB"],"torrentc":"78"}"#;

fn init_test_tracing() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn params_for(server: &MockServer) -> ConnectionParams {
    ConnectionParams {
        scheme: "http".to_string(),
        host: server.host(),
        port: server.port(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn client_for(server: &MockServer) -> UTorrentClient {
    UTorrentClient::connect(&params_for(server)).expect("valid connection params")
}

#[tokio::test]
async fn list_then_delta_over_http() {
    init_test_tracing();
    let server = MockServer::start_async().await;

    let token = server.mock(|when, then| {
        when.method(GET).path("/gui/token.html");
        then.status(200).body(TOKEN_PAGE);
    });
    let mut full = server.mock(|when, then| {
        when.method(GET)
            .path("/gui/")
            .query_param("list", "1")
            .query_param("token", "tok-1");
        then.status(200).body(FULL_LIST);
    });

    let client = client_for(&server);
    let first = client.torrent_list().await.expect("first listing");
    assert_eq!(
        first.iter().map(|t| t.hash.as_str()).collect::<Vec<_>>(),
        vec!["AAA", "BBB"]
    );
    full.assert();
    full.delete();

    let delta = server.mock(|when, then| {
        when.method(GET)
            .path("/gui/")
            .query_param("list", "1")
            .query_param("cid", "77")
            .query_param("token", "tok-1");
        then.status(200).body(DELTA_LIST);
    });

    let second = client.torrent_list().await.expect("second listing");
    assert_eq!(
        second.iter().map(|t| t.hash.as_str()).collect::<Vec<_>>(),
        vec!["AAA", "CCC"]
    );
    delta.assert();
    token.assert_calls(1);
}

#[tokio::test]
async fn action_carries_basic_auth_and_hashes() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(GET).path("/gui/token.html");
        then.status(200).body(TOKEN_PAGE);
    });
    let stop = server.mock(|when, then| {
        when.method(GET)
            .path("/gui/")
            .header("authorization", "Basic YWRtaW46c2VjcmV0")
            .query_param("action", "stop")
            .query_param("hash", "AAA")
            .query_param("token", "tok-1");
        then.status(200).body(ACK);
    });

    let client = client_for(&server);
    let result = client.stop(&["AAA".to_string()]).await.expect("stop");

    assert_eq!(result, RequestResult::Success);
    stop.assert();
}

#[tokio::test]
async fn rejected_requests_end_in_authentication_error() {
    init_test_tracing();
    let server = MockServer::start_async().await;

    let token = server.mock(|when, then| {
        when.method(GET).path("/gui/token.html");
        then.status(200).body(TOKEN_PAGE);
    });
    let start = server.mock(|when, then| {
        when.method(GET).path("/gui/").query_param("action", "start");
        then.status(400).body("invalid request");
    });

    let client = client_for(&server);
    let result = client.start(&["AAA".to_string()]).await;

    assert!(matches!(result, Err(UTorrentError::Authentication(_))));
    token.assert_calls(2);
    start.assert_calls(2);
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start_async().await;

    let token = server.mock(|when, then| {
        when.method(GET).path("/gui/token.html");
        then.status(200).body(TOKEN_PAGE);
    });
    let pause = server.mock(|when, then| {
        when.method(GET).path("/gui/").query_param("action", "pause");
        then.status(500).body("oops");
    });

    let client = client_for(&server);
    let result = client.pause(&["AAA".to_string()]).await;

    assert!(matches!(result, Err(UTorrentError::ServerError(_))));
    token.assert_calls(1);
    pause.assert_calls(1);
}

#[tokio::test]
async fn empty_body_is_protocol_error() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(GET).path("/gui/token.html");
        then.status(200).body(TOKEN_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/gui/").query_param("action", "recheck");
        then.status(200);
    });

    let client = client_for(&server);
    let result = client.recheck(&["AAA".to_string()]).await;

    assert!(matches!(result, Err(UTorrentError::Protocol(_))));
}

#[tokio::test]
async fn torrent_file_is_uploaded_as_multipart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("upload.torrent");
    std::fs::write(&path, b"d8:announce0:e").expect("write torrent");

    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/gui/token.html");
        then.status(200).body(TOKEN_PAGE);
    });
    let upload = server.mock(|when, then| {
        when.method(POST)
            .path("/gui/")
            .query_param("action", "add-file")
            .query_param("token", "tok-1");
        then.status(200).body(ACK);
    });

    let client = client_for(&server);
    let result = client.add_torrent_file(&path).await.expect("upload");

    assert!(result.is_success());
    upload.assert();
    client.close();
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let params = ConnectionParams {
        host: "127.0.0.1".to_string(),
        port,
        timeout: Duration::from_secs(2),
        ..Default::default()
    };

    let client = UTorrentClient::connect(&params).expect("valid params");
    let result = client.settings().await;

    assert!(matches!(result, Err(UTorrentError::Network(_))));
}
