mod filter_gateway;
mod upstream;

pub use filter_gateway::IpFilterGateway;
pub use upstream::UpstreamConfig;
