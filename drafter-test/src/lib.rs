// Integration test utilities: Python fixtures and a fake chat-completion endpoint.

use std::sync::{Arc, Mutex};

use drafter_core::config::DrafterConfig;
use drafter_core::pipeline::Drafter;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

// ── Python fixtures ──────────────────────────────────────────────

/// Straight-line script: three assignments and two calls.
pub const STRAIGHT_LINE: &str = "\
total = 0
items = fetch_items()
count = len(items)
total = total + count
print(total)
";

/// A small module with a class, methods, and a top-level entry point.
pub const SMALL_MODULE: &str = "\
import os

class Greeter:
    def __init__(self, name):
        self.name = name

    def greet(self):
        message = format_greeting(self.name)
        return message


def main():
    greeter = Greeter(os.environ.get(\"USER\"))
    print(greeter.greet())


if __name__ == \"__main__\":
    main()
";

/// Async code, a decorator call and chained assignment.
pub const ASYNC_AND_DECORATORS: &str = "\
@cached(ttl=60)
async def load(url):
    a = b = await fetch(url)
    return a
";

pub const BROKEN: &str = "def oops(:\n    return 1\n";

// ── Fake remote endpoint ─────────────────────────────────────────

/// One request received by a [`FakeEndpoint`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Respond(u16),
    Silent,
}

/// Local HTTP server standing in for a chat-completion API.
///
/// Every request gets the same canned response. Aborted on drop.
#[derive(Debug)]
pub struct FakeEndpoint {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl FakeEndpoint {
    /// Answer every request with `status` and `body`.
    pub async fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::start(Behavior::Respond(status), body.into()).await
    }

    /// Answer with a chat-completion envelope carrying `content`.
    pub async fn chat(content: &str) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        });
        Self::respond(200, body.to_string()).await
    }

    /// Accept connections and read requests but never reply.
    pub async fn silent() -> Self {
        Self::start(Behavior::Silent, String::new()).await
    }

    async fn start(behavior: Behavior, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake endpoint");
        let addr = listener.local_addr().expect("fake endpoint address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let body = body.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, behavior, &body, &recorded).await;
                });
            }
        });

        Self {
            url: format!("http://{addr}/v1/chat/completions"),
            requests,
            task,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Config pointing the remote section at this endpoint.
    pub fn config(&self) -> DrafterConfig {
        let mut config = DrafterConfig::default();
        config.remote.url = Some(self.url.clone());
        config.remote.timeout_secs = 2;
        config
    }

    pub fn drafter(&self) -> Drafter {
        Drafter::new(self.config()).expect("drafter for fake endpoint")
    }
}

impl Drop for FakeEndpoint {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    mut stream: TcpStream,
    behavior: Behavior,
    body: &str,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let request = read_request(&mut stream).await?;
    recorded.lock().expect("request log poisoned").push(request);

    match behavior {
        Behavior::Respond(status) => {
            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await
        }
        Behavior::Silent => {
            // Hold the connection open until the client gives up.
            let mut sink = [0u8; 64];
            while stream.read(&mut sink).await? > 0 {}
            Ok(())
        }
    }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let header = |name: &str| {
        head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    };
    let content_length: usize = header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    let body = serde_json::from_slice(&buf[header_end..body_end]).unwrap_or(serde_json::Value::Null);

    Ok(RecordedRequest {
        authorization: header("authorization"),
        body,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Drafter with the default config and no remote model.
pub fn offline_drafter() -> Drafter {
    Drafter::offline(DrafterConfig::default())
}
