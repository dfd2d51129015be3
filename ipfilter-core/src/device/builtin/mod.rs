pub mod ip_filter;

pub use ip_filter::{AccessDecision, IpFilterDevice};
