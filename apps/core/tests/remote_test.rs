use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use lexsearch_core::model::EntityType;
use lexsearch_core::remote::{HttpSearchClient, RemoteSearch, RemoteSearchError};

/// Serves one canned response and hands back the raw request body.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/search", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });
    (endpoint, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(split) = text.find("\r\n\r\n") {
            let headers = text[..split].to_ascii_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= split + 4 + length {
                return text[split + 4..].to_string();
            }
        }
    }
    String::new()
}

fn client(endpoint: &str) -> HttpSearchClient {
    HttpSearchClient::new(endpoint, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn posts_query_and_types_and_decodes_results() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"[{"id":"c7","type":"contact","title":"Juan Pérez","subtitle":"Estudio Pérez","metadata":{"email":"juan@example.test"}}]"#,
    )
    .await;

    let results = client(&endpoint)
        .search_remote("perez", &[EntityType::Matter, EntityType::Contact])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "c7");
    assert_eq!(results[0].entity_type, EntityType::Contact);
    assert_eq!(results[0].subtitle.as_deref(), Some("Estudio Pérez"));

    let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"query": "perez", "types": ["folder", "contact"]})
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (endpoint, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

    let error = client(&endpoint)
        .search_remote("perez", &[EntityType::Task])
        .await
        .unwrap_err();

    assert_eq!(error, RemoteSearchError::Status(500));
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (endpoint, server) = serve_once("200 OK", r#"{"not":"a list"}"#).await;

    let error = client(&endpoint)
        .search_remote("perez", &[EntityType::Event])
        .await
        .unwrap_err();

    assert!(matches!(error, RemoteSearchError::Decode(_)), "{error}");
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/search", listener.local_addr().unwrap());
    drop(listener);

    let error = client(&endpoint)
        .search_remote("perez", &[EntityType::Matter])
        .await
        .unwrap_err();

    assert!(matches!(error, RemoteSearchError::Transport(_)), "{error}");
}
