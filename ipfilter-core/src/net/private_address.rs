use ipnet::IpNet;
use once_cell::sync::Lazy;
use std::net::IpAddr;

/// Loopback, link-local and RFC1918/RFC4193 ranges.
static DEFAULT_PRIVATE_RANGES: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "fc00::/7",
        "fe80::/10",
        "::1/128",
        "::/128",
    ]
    .iter()
    .map(|s| s.parse().expect("built-in private range must be a valid CIDR"))
    .collect()
});

/// Decides whether a resolved client IP belongs to private address space.
///
/// The IP filter only ever hands over the raw resolved string, so
/// implementations must treat anything they cannot parse as public.
pub trait AddressClassifier: Send + Sync {
    fn is_private(&self, ip: &str) -> bool;
}

/// Table-driven classifier backed by a list of CIDR ranges.
#[derive(Debug, Clone)]
pub struct PrivateAddressClassifier {
    ranges: Vec<IpNet>,
}

impl Default for PrivateAddressClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivateAddressClassifier {
    pub fn new() -> Self {
        Self {
            ranges: DEFAULT_PRIVATE_RANGES.clone(),
        }
    }

    pub fn with_ranges(ranges: Vec<IpNet>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[IpNet] {
        &self.ranges
    }

    fn contains(&self, ip: &IpAddr) -> bool {
        self.ranges.iter().any(|net| net.contains(ip))
    }
}

impl AddressClassifier for PrivateAddressClassifier {
    fn is_private(&self, ip: &str) -> bool {
        let Ok(addr) = ip.parse::<IpAddr>() else {
            return false;
        };

        // Dual-stack listeners report IPv4 peers as ::ffff:a.b.c.d.
        let addr = match addr {
            IpAddr::V6(v6) => v6
                .to_ipv4_mapped()
                .map(IpAddr::V4)
                .unwrap_or(IpAddr::V6(v6)),
            v4 => v4,
        };

        self.contains(&addr)
    }
}
