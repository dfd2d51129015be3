use crate::ctx::{RequestCtx, ResponseCtx};
use crate::device::core::{Device, DevicePipeline, DeviceResult};
use crate::proxy::upstream::UpstreamConfig;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use pingora::prelude::{HttpPeer, ProxyHttp, Session};
use pingora_http::ResponseHeader;
use std::sync::Arc;

/// IpFilterGateway runs the device pipeline in front of a single upstream.
///
/// Pingora hook order that matters here...
///
/// 1. new_ctx()
///    - Allocate empty RequestCtx
///
/// 2. request_filter()
///    - Hydrate ctx from Session
///    - Run on_request devices
///    - Device responses (e.g. access denied) end here
///
/// 3. upstream_peer()
///    - Only reached for requests every device let through
pub struct IpFilterGateway {
    devices: Vec<Arc<dyn Device>>,
    upstream: UpstreamConfig,
}

impl IpFilterGateway {
    pub fn new(devices: Vec<Arc<dyn Device>>, upstream: UpstreamConfig) -> Self {
        Self { devices, upstream }
    }

    pub fn devices(&self) -> &[Arc<dyn Device>] {
        &self.devices
    }
}

#[async_trait]
impl ProxyHttp for IpFilterGateway {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        RequestCtx::empty()
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora::Result<Box<HttpPeer>> {
        let peer = HttpPeer::new(
            self.upstream.address,
            self.upstream.use_tls,
            self.upstream.sni.clone(),
        );

        Ok(Box::new(peer))
    }

    /// ACCEPT → INSPECT → (RESPOND | PROXY)
    async fn request_filter(
        &self,
        session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> pingora::Result<bool> {
        // The request ctx existed before now but had no data.
        ctx.hydrate_from_session(session);

        match DevicePipeline::run_on_request(&self.devices, ctx) {
            DeviceResult::Continue => Ok(false),

            DeviceResult::Respond(resp) => {
                write_device_response(session, resp).await?;
                Ok(true)
            }
        }
    }
}

/// Write a device-produced response and end the stream.
async fn write_device_response(
    session: &mut Session,
    resp: ResponseCtx,
) -> pingora::Result<()> {
    let mut resp_header = ResponseHeader::build(resp.status, Some(resp.headers.len() + 1))?;

    for (name, value) in resp.headers.iter() {
        resp_header.insert_header(name.clone(), value.clone())?;
    }
    resp_header.insert_header(CONTENT_LENGTH, resp.body.len().to_string())?;

    session
        .write_response_header(Box::new(resp_header), false)
        .await?;
    session
        .write_response_body(Some(Bytes::from(resp.body)), true)
        .await?;

    Ok(())
}
