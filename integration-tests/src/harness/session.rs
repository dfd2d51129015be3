use pingora::prelude::Session;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::time::timeout;

const READ_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(100);

//-----------------------------------------------------------------------------
// Requests
//-----------------------------------------------------------------------------
pub struct RawHttpRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
}

impl RawHttpRequest {
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: vec![("Host".to_string(), "example.com".to_string())],
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new("GET", target)
    }

    pub fn header(mut self, k: impl AsRef<str>, v: impl AsRef<str>) -> Self {
        self.headers
            .push((k.as_ref().to_string(), v.as_ref().to_string()));
        self
    }

    pub fn forwarded_for(self, xff: impl AsRef<str>) -> Self {
        self.header("X-Forwarded-For", xff)
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();

        // request line
        out.extend_from_slice(format!("{} {} HTTP/1.1\r\n", self.method, self.target).as_bytes());

        // headers
        for (k, v) in self.headers {
            out.extend_from_slice(format!("{k}: {v}\r\n").as_bytes());
        }

        // header/body separator
        out.extend_from_slice(b"\r\n");

        out
    }
}

//-----------------------------------------------------------------------------
// Responses
//-----------------------------------------------------------------------------
#[derive(Debug)]
pub struct RawHttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawHttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse a complete Content-Length framed response, or None if more bytes are needed.
    fn parse(buf: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(buf).ok()?;
        let (head, rest) = text.split_once("\r\n\r\n")?;
        let mut lines = head.split("\r\n");

        let status = lines.next()?.split(' ').nth(1)?.parse().ok()?;
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        let content_length: usize = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);

        if rest.len() < content_length {
            return None;
        }

        Some(Self {
            status,
            headers,
            body: rest[..content_length].to_string(),
        })
    }
}

//-----------------------------------------------------------------------------
// Sessions
//-----------------------------------------------------------------------------

/// A pingora Session backed by an in-memory duplex pipe.
///
/// The far end of the pipe plays the client. There is no socket, so the
/// session has no client address and only X-Forwarded-For identifies the caller.
pub struct TestSession {
    pub session: Session,
    client: DuplexStream,
}

impl TestSession {
    pub async fn open(request: RawHttpRequest) -> Self {
        let (mut client, server_side) = duplex(64 * 1024);
        // Build a real Session backed by memory IO.
        let mut session = Session::new_h1(Box::new(server_side));
        // Send synthetic HTTP request.
        client.write_all(&request.build()).await.unwrap();
        // Let pingora parse request.
        assert!(session.read_request().await.unwrap());

        Self { session, client }
    }

    /// Read what the server side wrote back to the client.
    pub async fn read_response(&mut self) -> RawHttpResponse {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            if let Some(resp) = RawHttpResponse::parse(&buf) {
                return resp;
            }

            let n = timeout(READ_TIMEOUT, self.client.read(&mut chunk))
                .await
                .expect("timed out waiting for a response")
                .expect("failed to read from the session pipe");

            assert!(
                n > 0,
                "pipe closed before a full response arrived: {:?}",
                String::from_utf8_lossy(&buf)
            );
            buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Assert that nothing was written back to the client.
    pub async fn assert_no_response(&mut self) {
        let mut chunk = [0u8; 1];
        let read = timeout(SILENCE_WINDOW, self.client.read(&mut chunk)).await;

        assert!(read.is_err(), "expected no response, but the server wrote one");
    }
}
