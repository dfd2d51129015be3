use ipfilter_core::IpFilterDevice;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("ip_filter")
        .join(name)
}

pub fn load_fixture(name: &str) -> IpFilterDevice {
    let path = fixture_path(name);

    IpFilterDevice::from_file(&path)
        .unwrap_or_else(|e| panic!("failed to load fixture {}: {e}", path.display()))
}
