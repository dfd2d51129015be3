//! Request-time IP allow/deny filtering for pingora-based HTTP servers.
//!
//! The filter is an [`IpFilterDevice`] that runs in a [`device`] pipeline.
//! [`IpFilterGateway`] wires that pipeline into pingora's `ProxyHttp`
//! lifecycle in front of a single upstream.

pub mod conf;
pub mod ctx;
pub mod device;
pub mod logging;
pub mod net;
pub mod proxy;

pub use conf::{FilterMode, IpFilterOptions, IpFilterSpec};
pub use device::builtin::{AccessDecision, IpFilterDevice};
pub use proxy::{IpFilterGateway, UpstreamConfig};
