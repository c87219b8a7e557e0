//! HTTP transport against a loopback server

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use ajaxify_dom::FormData;
use ajaxify_net::{
    AjaxRequest, AjaxResponse, Callbacks, HttpTransport, RequestData, ResponseBody, TextStatus,
    Transport,
};

// ============================================================================
// Loopback server
// ============================================================================

/// Raw request as seen by the server
#[derive(Debug)]
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve exactly one request, answering with `status` and `body`
fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut request_body = vec![0; length];
        reader.read_exact(&mut request_body).unwrap();

        tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8_lossy(&request_body).into_owned(),
        })
        .ok();

        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{}/site/page", addr), rx)
}

/// Callbacks that record their invocations in order
fn tracked() -> (Callbacks, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let callbacks = Callbacks {
        success: Some(Arc::new(move |body: &ResponseBody, status: TextStatus, _: &AjaxResponse| {
            let body = match body {
                ResponseBody::Text(text) => text.clone(),
                ResponseBody::Json(value) => value.to_string(),
            };
            l1.lock().unwrap().push(format!("success:{}:{}", status.as_str(), body));
        })),
        error: Some(Arc::new(move |response: &AjaxResponse, status: TextStatus, _: &str| {
            l2.lock().unwrap().push(format!("error:{}:{}", status.as_str(), response.status));
        })),
        before_send: None,
        complete: Some(Arc::new(move |_: &AjaxResponse, status: TextStatus| {
            l3.lock().unwrap().push(format!("complete:{}", status.as_str()));
        })),
    };
    (callbacks, log)
}

const WAIT: Duration = Duration::from_secs(10);

// ============================================================================
// Requests
// ============================================================================

#[test]
fn test_get_with_query_data() {
    let (base, rx) = serve_once("200 OK", "text/html", "<p>ok</p>");
    let transport = HttpTransport::new(&base).unwrap();
    let (callbacks, log) = tracked();

    let data: FormData = [("q", "rust lang")].into_iter().collect();
    let request = AjaxRequest::get("/search").with_data(RequestData::Form(data)).with_callbacks(callbacks);

    assert_eq!(transport.send_blocking(request), TextStatus::Success);

    let captured = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(captured.request_line, "GET /search?q=rust+lang HTTP/1.1");
    assert_eq!(captured.header("X-Requested-With"), Some("XMLHttpRequest"));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["success:success:<p>ok</p>", "complete:success"]
    );
}

#[test]
fn test_post_form_body() {
    let (base, rx) = serve_once("200 OK", "application/json", r#"{"saved":true}"#);
    let transport = HttpTransport::new(&base).unwrap();
    let (callbacks, log) = tracked();

    let data: FormData = [("name", "Fangxin"), ("age", "22")].into_iter().collect();
    let request = AjaxRequest::post("save")
        .with_data(RequestData::Form(data))
        .with_data_type("json")
        .with_callbacks(callbacks);

    assert_eq!(transport.send_blocking(request), TextStatus::Success);

    let captured = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(captured.request_line, "POST /site/save HTTP/1.1");
    assert_eq!(
        captured.header("Content-Type"),
        Some("application/x-www-form-urlencoded; charset=UTF-8")
    );
    assert!(captured.header("Accept").unwrap().starts_with("application/json"));
    assert_eq!(captured.body, "name=Fangxin&age=22");
    assert_eq!(
        *log.lock().unwrap(),
        vec![r#"success:success:{"saved":true}"#, "complete:success"]
    );
}

#[test]
fn test_absent_url_targets_page() {
    let (base, rx) = serve_once("200 OK", "text/plain", "");
    let transport = HttpTransport::new(&base).unwrap();

    transport.send_blocking(AjaxRequest::new());
    let captured = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(captured.request_line, "GET /site/page HTTP/1.1");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_http_error_goes_to_error_callback() {
    let (base, _rx) = serve_once("404 Not Found", "text/plain", "missing");
    let transport = HttpTransport::new(&base).unwrap();
    let (callbacks, log) = tracked();

    let status = transport.send_blocking(AjaxRequest::get("/gone").with_callbacks(callbacks));
    assert_eq!(status, TextStatus::Error);
    assert_eq!(*log.lock().unwrap(), vec!["error:error:404", "complete:error"]);
}

#[test]
fn test_invalid_json_is_parser_error() {
    let (base, _rx) = serve_once("200 OK", "text/html", "<html></html>");
    let transport = HttpTransport::new(&base).unwrap();
    let (callbacks, log) = tracked();

    let request = AjaxRequest::get("/api").with_data_type("json").with_callbacks(callbacks);
    assert_eq!(transport.send_blocking(request), TextStatus::ParserError);
    assert_eq!(*log.lock().unwrap(), vec!["error:parsererror:200", "complete:parsererror"]);
}

#[test]
fn test_connection_refused() {
    // Bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let transport = HttpTransport::new(&format!("http://{}/", addr)).unwrap();
    let (callbacks, log) = tracked();

    let status = transport.send_blocking(AjaxRequest::get("/x").with_callbacks(callbacks));
    assert_eq!(status, TextStatus::Error);
    assert_eq!(*log.lock().unwrap(), vec!["error:error:0", "complete:error"]);
}

#[test]
fn test_unsupported_method_reports_error() {
    let transport = HttpTransport::new("http://127.0.0.1:9/").unwrap();
    let (callbacks, log) = tracked();

    let request = AjaxRequest { method: Some("BREW".into()), ..AjaxRequest::new() }.with_callbacks(callbacks);
    assert_eq!(transport.send_blocking(request), TextStatus::Error);
    assert_eq!(*log.lock().unwrap(), vec!["error:error:0", "complete:error"]);
}

// ============================================================================
// Fire-and-forget
// ============================================================================

#[test]
fn test_send_runs_on_worker_thread() {
    let (base, rx) = serve_once("200 OK", "text/plain", "done");
    let transport = HttpTransport::new(&base).unwrap();

    let (done_tx, done_rx) = mpsc::channel();
    let done_tx = Mutex::new(done_tx);
    let callbacks = Callbacks {
        complete: Some(Arc::new(move |response: &AjaxResponse, status: TextStatus| {
            let name = thread::current().name().map(str::to_string);
            done_tx.lock().unwrap().send((response.body.clone(), status, name)).ok();
        })),
        ..Default::default()
    };

    transport.send(AjaxRequest::get("/async").with_callbacks(callbacks));

    let captured = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(captured.request_line, "GET /async HTTP/1.1");

    let (body, status, thread_name) = done_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(body, "done");
    assert_eq!(status, TextStatus::Success);
    assert_eq!(thread_name.as_deref(), Some("ajaxify-request"));
}
