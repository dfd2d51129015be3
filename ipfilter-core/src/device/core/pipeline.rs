use super::{Device, DeviceResult};
use crate::ctx::RequestCtx;

pub struct DevicePipeline;

impl DevicePipeline {
    pub fn run_on_request(
        devices: &[impl AsRef<dyn Device>],
        ctx: &mut RequestCtx,
    ) -> DeviceResult {
        for dev in devices {
            match dev.as_ref().on_request(ctx) {
                DeviceResult::Continue => continue,
                r => return r,
            }
        }
        DeviceResult::Continue
    }
}
