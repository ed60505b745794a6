//! Scripted HTTP/1.1 server for adapter tests. Answers one request per
//! connection with the next canned reply and records what it was asked.

use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub(crate) struct Reply {
    link: Option<String>,
    body: String,
}

impl Reply {
    pub(crate) fn json(body: impl Into<String>) -> Self {
        Self {
            link: None,
            body: body.into(),
        }
    }

    pub(crate) fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub(crate) method: String,
    /// Path and query, as sent on the request line
    pub(crate) target: String,
    pub(crate) body: String,
}

pub(crate) struct TestServer {
    pub(crate) origin: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl TestServer {
    /// Binds an ephemeral port and serves the replies `script` builds from
    /// the server origin, in order.
    pub(crate) async fn start(script: impl FnOnce(&str) -> Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let replies = script(&origin);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            for reply in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);
                write_reply(&mut socket, &reply).await;
            }
        });

        Self { origin, requests }
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

/// A client that ignores any proxy configured in the environment.
pub(crate) fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

async fn read_request(socket: &mut TcpStream) -> Request {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the request head");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the request body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.split_whitespace();
    Request {
        method: request_line.next().unwrap_or_default().to_owned(),
        target: request_line.next().unwrap_or_default().to_owned(),
        body: String::from_utf8_lossy(&buf[head_end..head_end + content_length]).into_owned(),
    }
}

async fn write_reply(socket: &mut TcpStream, reply: &Reply) {
    let mut head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.body.len()
    );
    if let Some(link) = &reply.link {
        head.push_str(&format!("Link: {link}\r\n"));
    }
    head.push_str("\r\n");
    socket.write_all(head.as_bytes()).await.unwrap();
    socket.write_all(reply.body.as_bytes()).await.unwrap();
    let _ = socket.shutdown().await;
}
