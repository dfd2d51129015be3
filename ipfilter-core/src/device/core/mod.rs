pub mod pipeline;
pub mod result;

pub use self::pipeline::DevicePipeline;
pub use self::result::DeviceResult;
use crate::ctx::RequestCtx;

/// A processing unit in the HTTP request pipeline.
///
/// Devices inspect a hydrated request and either let it continue to the next
/// device (and eventually upstream) or short-circuit it with a response.
/// Each device must be both Send and Sync so a single instance can serve
/// concurrent requests.
pub trait Device: Send + Sync {
    /// Called when a request is first received, before any upstream work.
    fn on_request(&self, _ctx: &mut RequestCtx) -> DeviceResult {
        DeviceResult::Continue
    }
}
