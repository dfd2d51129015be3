use http::{HeaderMap, StatusCode};

/// A response produced by a device instead of proxying upstream.
#[derive(Debug)]
pub struct ResponseCtx {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ResponseCtx {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}
