use std::collections::BTreeSet;

/// Hosts known to set cookies through embedded content.
pub const BUILTIN_THIRD_PARTY_DOMAINS: &[&str] = &[
    "addthis.com",
    "addtoany.com",
    "adnxs.com",
    "adsrvr.org",
    "amazon-adsystem.com",
    "bing.com",
    "criteo.com",
    "doubleclick.net",
    "facebook.com",
    "facebook.net",
    "google-analytics.com",
    "googleadservices.com",
    "googlesyndication.com",
    "googletagmanager.com",
    "hotjar.com",
    "instagram.com",
    "linkedin.com",
    "outbrain.com",
    "pinterest.com",
    "quantserve.com",
    "scorecardresearch.com",
    "sharethis.com",
    "Taboola.com",
    "tiktok.com",
    "twitter.com",
    "vimeo.com",
    "yahoo.com",
    "youtube.com",
];

/// Effective set of monitored third-party domains:
/// (built-in ∪ included) − ignored, all lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoredDomains {
    domains: BTreeSet<String>,
}

fn normalize(domain: &str) -> Option<String> {
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    (!domain.is_empty()).then_some(domain)
}

impl MonitoredDomains {
    pub fn new<I, J, S, T>(included: I, ignored: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let ignored: BTreeSet<String> = ignored.into_iter().filter_map(|d| normalize(d.as_ref())).collect();
        let domains = BUILTIN_THIRD_PARTY_DOMAINS
            .iter()
            .copied()
            .map(str::to_string)
            .chain(included.into_iter().map(|d| d.as_ref().to_string()))
            .filter_map(|d| normalize(&d))
            .filter(|d| !ignored.contains(d))
            .collect();
        Self { domains }
    }

    /// Built-in list only.
    pub fn builtin() -> Self {
        Self::new(std::iter::empty::<&str>(), std::iter::empty::<&str>())
    }

    pub fn contains(&self, domain: &str) -> bool {
        normalize(domain).is_some_and(|d| self.domains.contains(&d))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    /// First monitored domain the host ends with, compared case-insensitively.
    pub fn match_host(&self, host: &str) -> Option<&str> {
        let host = host.to_ascii_lowercase();
        self.iter().find(|domain| host.ends_with(*domain))
    }
}
