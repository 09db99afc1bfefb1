//! The live adapter against a one-shot local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reqwest::Url;

use tasklist::adapters::live::{LiveTaskApi, StaticToken};
use tasklist::ports::{RequestError, TaskApi, TaskDraft, TaskId};
use tasklist::view::{TaskListView, ViewError};

/// Accepts one connection, answers it with `status` and `body`, and hands
/// back the raw request it received.
fn serve_once(status: &str, body: &str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/todos", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        request
    });
    (url.parse().unwrap(), handle)
}

fn read_request(stream: &mut impl Read) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        raw.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse().ok())?
                })
                .unwrap_or(0usize);
            if raw.len() >= end + 4 + length || n == 0 {
                return text;
            }
        } else if n == 0 {
            return text;
        }
    }
}

fn client(url: Url) -> LiveTaskApi {
    LiveTaskApi::new(url, Duration::from_secs(5), Box::new(StaticToken::new("test-token"))).unwrap()
}

#[tokio::test]
async fn list_sends_bearer_token_and_decodes_tasks() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success":true,"data":[{"_id":"a1","title":"Buy milk","completed":false},{"_id":"b2","title":"Walk dog"}]}"#,
    );

    let tasks = client(url).list().await.unwrap().into_result().unwrap().unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("GET /api/todos HTTP/1.1"), "{request}");
    assert!(request.to_ascii_lowercase().contains("authorization: bearer test-token"));
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::new("a1"));
    assert!(!tasks[1].completed);
}

#[tokio::test]
async fn create_posts_json_title() {
    let (url, server) = serve_once(
        "201 Created",
        r#"{"success":true,"data":{"_id":"c3","title":"Buy milk","completed":false}}"#,
    );

    let task = client(url).create("Buy milk").await.unwrap().into_result().unwrap().unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("POST /api/todos HTTP/1.1"), "{request}");
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"title":"Buy milk"}"#), "{request}");
    assert_eq!(task["title"], "Buy milk");
}

#[tokio::test]
async fn create_succeeds_whatever_the_payload_shape() {
    let (url, server) = serve_once("201 Created", r#"{"success":true,"data":{"created":[1,2]}}"#);

    let envelope = client(url).create("Buy milk").await.unwrap();
    server.join().unwrap();

    assert!(envelope.into_result().is_ok());
}

#[tokio::test]
async fn list_accepts_both_id_spellings() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success":true,"data":[{"_id":"a1","id":"a1","title":"Buy milk","completed":false}]}"#,
    );

    let view = TaskListView::new(Arc::new(client(url)));
    view.fetch_all().await.unwrap();
    server.join().unwrap();

    assert_eq!(view.tasks()[0].id, TaskId::new("a1"));
}

#[tokio::test]
async fn hung_request_times_out_and_clears_loading() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url: Url = format!("http://{}/api/todos", listener.local_addr().unwrap()).parse().unwrap();
    // Accept and read, then never answer while the client is waiting.
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _ = read_request(&mut stream);
        thread::sleep(Duration::from_secs(5));
    });

    let api = LiveTaskApi::new(url, Duration::from_secs(1), Box::new(StaticToken::new("t"))).unwrap();
    let view = TaskListView::new(Arc::new(api));

    let err = view.fetch_all().await.unwrap_err();
    assert!(matches!(err, ViewError::Request(RequestError::Transport(_))), "{err:?}");
    assert!(!view.is_loading());
}

#[tokio::test]
async fn update_puts_draft_to_item_url() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success":true,"data":{"_id":"a1","title":"X","completed":true}}"#,
    );

    let draft = TaskDraft { title: "X".into(), completed: true };
    let envelope = client(url).update(&TaskId::new("a1"), &draft).await.unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("PUT /api/todos/a1 HTTP/1.1"), "{request}");
    assert!(request.ends_with(r#"{"title":"X","completed":true}"#), "{request}");
    assert_eq!(envelope.into_result().unwrap().unwrap()["completed"], true);
}

#[tokio::test]
async fn delete_accepts_envelope_without_data() {
    let (url, server) = serve_once("200 OK", r#"{"success":true}"#);

    let envelope = client(url).delete(&TaskId::new("a1")).await.unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("DELETE /api/todos/a1 HTTP/1.1"), "{request}");
    assert!(envelope.success);
    assert_eq!(envelope.into_result(), Ok(None));
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"success":false}"#);

    let err = client(url).list().await.unwrap_err();
    server.join().unwrap();

    assert_eq!(err, RequestError::Status { status: 500 });
}

#[tokio::test]
async fn rejected_envelope_carries_message() {
    let (url, server) = serve_once("200 OK", r#"{"success":false,"message":"Todo not found"}"#);

    let envelope = client(url).delete(&TaskId::new("zz")).await.unwrap();
    server.join().unwrap();

    assert_eq!(envelope.into_result(), Err(RequestError::Rejected(Some("Todo not found".into()))));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (url, server) = serve_once("200 OK", "<html>oops</html>");

    let err = client(url).list().await.unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, RequestError::Decode(_)), "{err:?}");
}
