//! HTTP access service tests against a local one-shot server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use gatepass::service::{self, AccessService, Action, HttpAccessService, ServiceError};
use gatepass::session::ScanRequest;

/// A received request: head (request line and headers) and body.
struct Received {
    head: String,
    body: String,
}

/// Read one HTTP request from `stream`.
fn read_request(stream: &mut TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < head_end + length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "client closed before sending body");
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..head_end + length]).to_string();
    Received { head, body }
}

/// Serve one request with `status` and `body`, reporting what was received.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/exec", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let received = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(received);
    });

    (url, rx)
}

#[test]
fn test_scan_posts_form_and_returns_body() {
    let (url, rx) = serve_once("200 OK", "王小明 允許進入\n");
    let http = HttpAccessService::new(url, Some(Duration::from_secs(5))).unwrap();

    let body = service::scan(&http, &ScanRequest::new("W-0042", "A1")).unwrap();
    assert_eq!(body, "王小明 允許進入\n");

    let received = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(received.head.starts_with("POST /exec HTTP/1.1"));
    assert!(received
        .head
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded"));
    assert_eq!(received.body, "action=scan&userId=W-0042&username=A1");
}

#[test]
fn test_login_fields_are_url_encoded() {
    let (url, rx) = serve_once("200 OK", "登入成功");
    let http = HttpAccessService::new(url, None).unwrap();

    let body = service::login(&http, "a b", "p&w=1").unwrap();
    assert_eq!(body, "登入成功");

    let received = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(received.body, "action=login&username=a+b&password=p%26w%3D1");
}

#[test]
fn test_non_success_status_is_an_error() {
    let (url, _rx) = serve_once("500 Internal Server Error", "boom");
    let http = HttpAccessService::new(url, Some(Duration::from_secs(5))).unwrap();

    let result = http.submit(Action::Scan, &[("userId", "W-1"), ("username", "A1")]);
    assert!(matches!(result, Err(ServiceError::Status(500))));
}

#[test]
fn test_unreachable_endpoint_is_transport_error() {
    // Bind and release a port so nothing is listening on it
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let http = HttpAccessService::new(format!("http://{addr}/exec"), Some(Duration::from_secs(2))).unwrap();

    let result = service::login(&http, "A1", "pw");
    assert!(matches!(result, Err(ServiceError::Transport(_))));
}

#[test]
fn test_timeout_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/exec", listener.local_addr().unwrap());
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(3));
        drop(stream);
    });

    let http = HttpAccessService::new(url, Some(Duration::from_millis(200))).unwrap();
    let result = service::login(&http, "A1", "pw");
    assert!(matches!(result, Err(ServiceError::Transport(_))));
}
