use crate::conf::error::ConfigError;
use crate::conf::types::IpFilterSpec;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
struct IpFilterFile {
    ip_filter: Option<IpFilterSpec>,
}

/// Read the `ip_filter = { ... }` block from an HCL file.
///
/// IO and syntax errors are hard failures. Individual field values are not
/// validated here; see [`IpFilterSpec`] for how bad values degrade.
pub fn parse_ip_filter(path: &Path) -> Result<IpFilterSpec, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let parsed: IpFilterFile = hcl::from_str(&s).map_err(|e| ConfigError::parse(path, e))?;

    parsed.ip_filter.ok_or_else(|| ConfigError::MissingIpFilter {
        path: path.to_path_buf(),
    })
}
