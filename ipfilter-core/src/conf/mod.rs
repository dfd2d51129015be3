mod error;
mod parse;
pub mod types;

pub use error::ConfigError;
pub use parse::parse_ip_filter;
pub use types::{FilterMode, IpFilterOptions, IpFilterSpec, Lenient};
