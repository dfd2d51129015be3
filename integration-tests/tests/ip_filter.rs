use integration_tests::harness::{EventCapture, RawHttpRequest, TestSession, load_fixture};
use ipfilter_core::device::core::Device;
use ipfilter_core::{
    AccessDecision, IpFilterDevice, IpFilterGateway, IpFilterOptions, UpstreamConfig,
};
use pingora::prelude::ProxyHttp;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn gateway(device: IpFilterDevice) -> IpFilterGateway {
    let upstream = UpstreamConfig::plain("127.0.0.1:4000".parse().unwrap());
    IpFilterGateway::new(vec![Arc::new(device) as Arc<dyn Device>], upstream)
}

fn ips(list: &[&str]) -> Option<Vec<String>> {
    Some(list.iter().map(|s| s.to_string()).collect())
}

//-----------------------------------------------------------------------------
// Deny mode
//-----------------------------------------------------------------------------
#[tokio::test]
async fn listed_ip_is_denied_with_default_response() {
    // Arrange
    let (capture, _guard) = EventCapture::install();
    let gw = gateway(IpFilterDevice::new(
        ips(&["10.0.0.5"]),
        IpFilterOptions::default(),
    ));
    let mut sess = TestSession::open(RawHttpRequest::get("/api").forwarded_for("10.0.0.5")).await;
    let mut ctx = gw.new_ctx();

    // Act
    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    // Assert
    assert!(handled);
    let resp = sess.read_response().await;
    assert_eq!(resp.status, 401);
    assert_eq!(resp.body, "Unauthorized");
    assert_eq!(resp.header("content-length"), Some("12"));
    assert_eq!(
        capture.filter_messages(),
        vec!["Access denied to IP address: 10.0.0.5".to_string()]
    );
}

#[tokio::test]
async fn unlisted_ip_is_forwarded_in_deny_mode() {
    let (capture, _guard) = EventCapture::install();
    let gw = gateway(load_fixture("deny_list.hcl"));
    let mut sess = TestSession::open(RawHttpRequest::get("/").forwarded_for("8.8.8.8")).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(!handled);
    sess.assert_no_response().await;
    assert_eq!(
        capture.filter_messages(),
        vec!["Access granted to IP address: 8.8.8.8".to_string()]
    );
}

#[tokio::test]
async fn left_most_forwarded_entry_decides() {
    let gw = gateway(load_fixture("deny_list.hcl"));
    let request = RawHttpRequest::get("/").forwarded_for("203.0.113.7, 8.8.8.8, 10.9.9.9");
    let mut sess = TestSession::open(request).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(handled);
    assert_eq!(sess.read_response().await.status, 401);
}

#[tokio::test]
async fn missing_client_address_is_forwarded_in_deny_mode() {
    let (capture, _guard) = EventCapture::install();
    let gw = gateway(load_fixture("deny_list.hcl"));
    let mut sess = TestSession::open(RawHttpRequest::get("/")).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(!handled);
    assert_eq!(
        capture.filter_messages(),
        vec!["Access granted to IP address: ".to_string()]
    );
}

//-----------------------------------------------------------------------------
// Allow mode
//-----------------------------------------------------------------------------
#[tokio::test]
async fn listed_ip_is_forwarded_in_allow_mode() {
    // Arrange
    let gw = gateway(load_fixture("allow_list.hcl"));
    let mut sess = TestSession::open(RawHttpRequest::get("/").forwarded_for("10.0.0.5")).await;
    let mut ctx = gw.new_ctx();

    // Act
    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    // Assert
    assert!(!handled);
    assert_eq!(
        ctx.extensions.get::<AccessDecision>(),
        Some(&AccessDecision::Granted {
            client_ip: "10.0.0.5".to_string()
        })
    );
    sess.assert_no_response().await;
}

#[tokio::test]
async fn unlisted_ip_gets_configured_error_in_allow_mode() {
    let (capture, _guard) = EventCapture::install();
    let gw = gateway(load_fixture("allow_list.hcl"));
    let mut sess = TestSession::open(RawHttpRequest::get("/").forwarded_for("10.0.0.6")).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(handled);
    let resp = sess.read_response().await;
    assert_eq!(resp.status, 403);
    assert_eq!(resp.body, "Forbidden: your address is not on the allow list");
    // The fixture turns logging off.
    assert!(capture.filter_messages().is_empty());
}

//-----------------------------------------------------------------------------
// Private address override
//-----------------------------------------------------------------------------
#[tokio::test]
async fn unlisted_private_ip_is_forwarded_via_override() {
    let gw = gateway(load_fixture("private_override.hcl"));
    let mut sess =
        TestSession::open(RawHttpRequest::get("/").forwarded_for("192.168.1.50")).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(!handled);
}

#[tokio::test]
async fn explicitly_denied_private_ip_is_still_denied() {
    let gw = gateway(load_fixture("private_override.hcl"));
    let mut sess =
        TestSession::open(RawHttpRequest::get("/").forwarded_for("192.168.1.1")).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(handled);
    assert_eq!(sess.read_response().await.status, 401);
}

//-----------------------------------------------------------------------------
// Disabled filter
//-----------------------------------------------------------------------------
#[tokio::test]
async fn empty_list_forwards_silently() {
    let (capture, _guard) = EventCapture::install();
    let gw = gateway(load_fixture("disabled.hcl"));
    let mut sess = TestSession::open(RawHttpRequest::get("/").forwarded_for("6.6.6.6")).await;
    let mut ctx = gw.new_ctx();

    let handled = gw.request_filter(&mut sess.session, &mut ctx).await.unwrap();

    assert!(!handled);
    assert!(ctx.extensions.get::<AccessDecision>().is_none());
    assert!(capture.filter_messages().is_empty());
}

//-----------------------------------------------------------------------------
// Concurrency
//-----------------------------------------------------------------------------
#[test]
fn one_device_serves_many_threads() {
    let device = Arc::new(load_fixture("deny_list.hcl"));

    std::thread::scope(|scope| {
        for i in 0..8u8 {
            let device = device.clone();
            scope.spawn(move || {
                let mut headers = http::HeaderMap::new();
                let ip = if i % 2 == 0 {
                    "10.0.0.5".to_string()
                } else {
                    format!("8.8.8.{i}")
                };
                headers.insert("x-forwarded-for", ip.parse().unwrap());

                let decision = device.evaluate(&headers, None);

                assert_eq!(decision.is_granted(), i % 2 == 1, "ip {ip}");
            });
        }
    });
}
