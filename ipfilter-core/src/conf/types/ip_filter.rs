use crate::conf::types::Lenient;
use http::StatusCode;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

pub const DEFAULT_ERROR_MESSAGE: &str = "Unauthorized";
pub const DEFAULT_ERROR_STATUS: StatusCode = StatusCode::UNAUTHORIZED;

/// File form of the IP filter.
///
/// Every field is optional and lenient: a missing or malformed value takes the
/// default instead of failing the load.
#[derive(Default, Clone, Debug, Deserialize)]
pub struct IpFilterSpec {
    /// Addresses to allow or deny. Absent or empty disables the filter.
    #[serde(default)]
    pub ips: Option<Lenient<Vec<String>>>,

    /// `allow` or `deny`, case-insensitive.
    #[serde(default)]
    pub mode: Option<Lenient<String>>,

    /// Log every access decision.
    #[serde(default)]
    pub log: Option<Lenient<bool>>,

    //-------------------------------------------------------------------------
    // Deny response
    //-------------------------------------------------------------------------
    #[serde(default)]
    pub error_code: Option<Lenient<u16>>,

    #[serde(default)]
    pub error_message: Option<Lenient<String>>,

    /// Grant any private-space address unless it is explicitly denied.
    #[serde(default)]
    pub allow_private_ips: Option<Lenient<bool>>,
}

impl IpFilterSpec {
    /// Split into the address list and fully defaulted options.
    pub fn into_parts(self) -> (Option<Vec<String>>, IpFilterOptions) {
        let ips = Lenient::resolve(self.ips, "ips");
        let defaults = IpFilterOptions::default();

        let mut options = IpFilterOptions {
            mode: Lenient::resolve(self.mode, "mode")
                .map(|m| FilterMode::parse(&m))
                .unwrap_or(defaults.mode),
            log: Lenient::resolve(self.log, "log").unwrap_or(defaults.log),
            error_status: defaults.error_status,
            error_message: Lenient::resolve(self.error_message, "error_message")
                .unwrap_or(defaults.error_message),
            allow_private_ips: Lenient::resolve(self.allow_private_ips, "allow_private_ips")
                .unwrap_or(defaults.allow_private_ips),
        };

        if let Some(code) = Lenient::resolve(self.error_code, "error_code") {
            options = options.with_error_code(code);
        }

        (ips, options)
    }
}

/// Whether listed addresses are the only ones let in, or the only ones kept out.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Allow,
    #[default]
    Deny,
    /// Anything else. Neither the allow nor the deny check can pass.
    Unrecognized(String),
}

impl FilterMode {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "allow" => FilterMode::Allow,
            "deny" => FilterMode::Deny,
            _ => FilterMode::Unrecognized(s.to_string()),
        }
    }
}

impl From<&str> for FilterMode {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Allow => f.write_str("allow"),
            FilterMode::Deny => f.write_str("deny"),
            FilterMode::Unrecognized(s) => f.write_str(s),
        }
    }
}

/// Runtime options of the IP filter, with defaults already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpFilterOptions {
    pub mode: FilterMode,
    pub log: bool,
    pub error_status: StatusCode,
    pub error_message: String,
    pub allow_private_ips: bool,
}

impl Default for IpFilterOptions {
    fn default() -> Self {
        Self {
            mode: FilterMode::Deny,
            log: true,
            error_status: DEFAULT_ERROR_STATUS,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            allow_private_ips: false,
        }
    }
}

impl IpFilterOptions {
    pub fn with_mode(mut self, mode: impl Into<FilterMode>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Codes outside the valid HTTP status range keep the current status.
    pub fn with_error_code(mut self, code: u16) -> Self {
        match StatusCode::from_u16(code) {
            Ok(status) => self.error_status = status,
            Err(_) => {
                tracing::warn!(
                    "ip_filter.error_code {code} is not a valid HTTP status, using {}",
                    self.error_status.as_u16()
                );
            }
        }
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn with_allow_private_ips(mut self, allow: bool) -> Self {
        self.allow_private_ips = allow;
        self
    }
}
