use consent_core::{ComplianceError, Result};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::domains::MonitoredDomains;

/// Longest URL shown in diagnostics tables.
pub const MAX_URL_DISPLAY: usize = 80;

/// An iframe loading content from a monitored third-party domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyReference {
    pub url: String,
    pub domain: String,
}

/// Host part of an iframe source. Protocol-relative sources (`//host/path`)
/// count as https; relative sources have no host.
pub fn source_host(src: &str) -> Option<String> {
    let src = src.trim();
    let parsed = if src.starts_with("//") {
        Url::parse(&format!("https:{}", src))
    } else {
        Url::parse(src)
    };
    parsed.ok()?.host_str().map(str::to_ascii_lowercase)
}

/// Find every iframe in `html` whose source host ends with a monitored domain.
pub fn scan_iframes(html: &str, domains: &MonitoredDomains) -> Result<Vec<ThirdPartyReference>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("iframe[src]").map_err(|e| ComplianceError::Parsing(e.to_string()))?;

    let references: Vec<ThirdPartyReference> = document
        .select(&selector)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .filter_map(|src| {
            let host = source_host(src)?;
            let domain = domains.match_host(&host)?;
            Some(ThirdPartyReference {
                url: src.to_string(),
                domain: domain.to_string(),
            })
        })
        .collect();

    debug!(found = references.len(), monitored = domains.len(), "scanned iframes");
    Ok(references)
}

/// Shorten a URL for display, keeping the scheme and host readable.
pub fn truncate_url(url: &str, max: usize) -> String {
    if url.chars().count() <= max {
        return url.to_string();
    }
    let kept: String = url.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
