use crate::conf::types::{FilterMode, IpFilterOptions, IpFilterSpec};
use crate::conf::{ConfigError, parse_ip_filter};
use crate::ctx::{RequestCtx, ResponseCtx};
use crate::device::core::{Device, DeviceResult};
use crate::net::{AddressClassifier, PrivateAddressClassifier, resolve_client_ip};
use http::HeaderMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// Outcome of evaluating one request against the filter.
///
/// Granted decisions are stored in the request extensions so later devices
/// can read the resolved client IP without re-parsing headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// No addresses configured; nothing was checked.
    Bypass,
    Granted { client_ip: String },
    Denied { client_ip: String },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        !matches!(self, AccessDecision::Denied { .. })
    }

    pub fn client_ip(&self) -> Option<&str> {
        match self {
            AccessDecision::Bypass => None,
            AccessDecision::Granted { client_ip } | AccessDecision::Denied { client_ip } => {
                Some(client_ip)
            }
        }
    }
}

/// IpFilterDevice grants or denies requests by client IP.
///
/// The address list is matched by exact string comparison against whatever
/// the client IP resolves to, in either allow-list or deny-list mode. Private
/// addresses can optionally be let through unless they are explicitly denied.
pub struct IpFilterDevice {
    ips: Vec<String>,
    options: IpFilterOptions,
    classifier: Arc<dyn AddressClassifier>,
}

impl IpFilterDevice {
    pub fn new(ips: Option<Vec<String>>, options: IpFilterOptions) -> Self {
        if let FilterMode::Unrecognized(mode) = &options.mode {
            tracing::warn!(
                "ip_filter mode '{mode}' is neither 'allow' nor 'deny'; only the private address override can grant access"
            );
        }

        Self {
            ips: ips.unwrap_or_default(),
            options,
            classifier: Arc::new(PrivateAddressClassifier::new()),
        }
    }

    pub fn from_spec(spec: IpFilterSpec) -> Self {
        let (ips, options) = spec.into_parts();
        Self::new(ips, options)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_spec(parse_ip_filter(path)?))
    }

    /// Swap the private address table.
    pub fn with_classifier(mut self, classifier: Arc<dyn AddressClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn ips(&self) -> &[String] {
        &self.ips
    }

    pub fn options(&self) -> &IpFilterOptions {
        &self.options
    }

    /// Decide on a request without side effects.
    ///
    /// Grant rules, any one is enough:
    /// 1. allow mode and the IP is listed
    /// 2. deny mode and the IP is not listed
    /// 3. private IPs are allowed, the IP is private, and it is not listed in deny mode
    pub fn evaluate(&self, headers: &HeaderMap, peer_ip: Option<IpAddr>) -> AccessDecision {
        // An empty list disables the filter rather than denying everything.
        if self.ips.is_empty() {
            return AccessDecision::Bypass;
        }

        let ip = resolve_client_ip(headers, peer_ip);
        let listed = self.ips.iter().any(|entry| *entry == ip);
        let mode = &self.options.mode;

        let allowed_ip = *mode == FilterMode::Allow && listed;
        let not_banned_ip = *mode == FilterMode::Deny && !listed;
        let private_ip_okay = self.options.allow_private_ips
            && self.classifier.is_private(&ip)
            && !(*mode == FilterMode::Deny && listed);

        if allowed_ip || not_banned_ip || private_ip_okay {
            AccessDecision::Granted { client_ip: ip }
        } else {
            AccessDecision::Denied { client_ip: ip }
        }
    }

    fn deny(&self) -> DeviceResult {
        DeviceResult::Respond(ResponseCtx::new(
            self.options.error_status,
            HeaderMap::new(),
            self.options.error_message.as_bytes().to_vec(),
        ))
    }
}

impl Device for IpFilterDevice {
    fn on_request(&self, ctx: &mut RequestCtx) -> DeviceResult {
        let decision = self.evaluate(&ctx.headers, ctx.peer_ip);

        match &decision {
            AccessDecision::Bypass => DeviceResult::Continue,

            AccessDecision::Granted { client_ip } => {
                if self.options.log {
                    tracing::info!("Access granted to IP address: {}", client_ip);
                }
                ctx.extensions.insert(decision.clone());
                DeviceResult::Continue
            }

            AccessDecision::Denied { client_ip } => {
                if self.options.log {
                    tracing::info!("Access denied to IP address: {}", client_ip);
                }
                self.deny()
            }
        }
    }
}
