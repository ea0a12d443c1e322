//! Structural analysis of rendered pages: which iframes load content from
//! known third-party cookie hosts.

pub mod domains;
pub mod iframes;

pub use domains::{BUILTIN_THIRD_PARTY_DOMAINS, MonitoredDomains};
pub use iframes::{MAX_URL_DISPLAY, ThirdPartyReference, scan_iframes, source_host, truncate_url};
