use cmdapi_infra::InMemoryCommandRepo;
use cmdapi_server::{AppState, build_router, telemetry};
use std::io;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn json_lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().expect("lock output").clone();
        let text = String::from_utf8(bytes).expect("utf8 log output");
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("json log line"))
            .collect()
    }
}

// 单线程运行时：服务端任务与测试共享线程局部的订阅者
#[tokio::test(flavor = "current_thread")]
async fn request_completion_is_logged_as_json_with_request_span() {
    let sink = SharedBuffer::default();
    let _guard = tracing::subscriber::set_default(telemetry::build_subscriber(
        true,
        EnvFilter::new("info"),
        sink.clone(),
    ));

    let repo = Arc::new(InMemoryCommandRepo::new());
    let app = build_router(AppState::new(repo).expect("app state"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
    let req = format!(
        "GET /api/commands HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nx-request-id: req-123\r\n\r\n"
    );
    stream.write_all(req.as_bytes()).await.expect("write");
    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read");
    assert!(response.starts_with("HTTP/1.1 200"));

    let lines = sink.json_lines();
    let completed = lines
        .iter()
        .find(|line| line["fields"]["message"] == "request completed")
        .expect("request completed line");

    assert_eq!(completed["level"], "INFO");
    assert_eq!(completed["fields"]["status"], 200);
    assert!(completed["fields"]["latency_ms"].is_u64());

    let span = &completed["span"];
    assert_eq!(span["name"], "http.request");
    assert_eq!(span["request_id"], "req-123");
    assert_eq!(span["method"], "GET");
    assert_eq!(span["route"], "/api/commands");
}
