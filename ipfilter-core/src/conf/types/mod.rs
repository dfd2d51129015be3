mod ip_filter;
mod lenient;

pub use ip_filter::*;
pub use lenient::Lenient;
