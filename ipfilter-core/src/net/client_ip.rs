use http::HeaderMap;
use std::net::IpAddr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolve the client IP the filter decides on.
///
/// Rules:
/// - Take the left-most entry of X-Forwarded-For (the original client)
/// - Fall back to the connection peer when the header is missing, unreadable
///   or its first entry is empty
/// - Fall back to "" when there is no peer address either
///
/// The result is used verbatim for exact string comparison, so nothing is
/// trimmed, parsed or canonicalized here.
pub fn resolve_client_ip(headers: &HeaderMap, peer_addr: Option<IpAddr>) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .filter(|first| !first.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    peer_addr.map(|ip| ip.to_string()).unwrap_or_default()
}
