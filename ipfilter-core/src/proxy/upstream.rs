use std::net::SocketAddr;

/// Where granted requests are proxied to.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub address: SocketAddr,
    pub use_tls: bool,
    pub sni: String,
}

impl UpstreamConfig {
    pub fn plain(address: SocketAddr) -> Self {
        Self {
            address,
            use_tls: false,
            sni: String::new(),
        }
    }

    pub fn tls(address: SocketAddr, sni: impl Into<String>) -> Self {
        Self {
            address,
            use_tls: true,
            sni: sni.into(),
        }
    }
}
