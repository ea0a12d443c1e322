use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub navigation: Duration,
    pub page_stable: Duration,
    /// How long the banner may take to show up
    pub cookie_banner: Duration,
    /// How long the banner may take to go away after a click
    pub banner_dismiss: Duration,
    /// How long a vendor consent API may take to load
    pub vendor_api: Duration,
    pub check_interval: Duration,
    /// Pause before clicking a control that is still animating in
    pub settle_delay: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation: Duration::from_millis(30000),
            page_stable: Duration::from_millis(30000),
            cookie_banner: Duration::from_millis(10000),
            banner_dismiss: Duration::from_millis(10000),
            vendor_api: Duration::from_millis(10000),
            check_interval: Duration::from_millis(300),
            settle_delay: Duration::from_millis(1000),
        }
    }
}

impl TimeoutConfig {
    pub fn with_cookie_banner(mut self, ms: u64) -> Self {
        self.cookie_banner = Duration::from_millis(ms);
        self
    }

    pub fn with_vendor_api(mut self, ms: u64) -> Self {
        self.vendor_api = Duration::from_millis(ms);
        self
    }

    pub fn with_settle_delay(mut self, ms: u64) -> Self {
        self.settle_delay = Duration::from_millis(ms);
        self
    }

    pub fn fast() -> Self {
        Self {
            navigation: Duration::from_millis(20000),
            page_stable: Duration::from_millis(20000),
            cookie_banner: Duration::from_millis(5000),
            banner_dismiss: Duration::from_millis(5000),
            vendor_api: Duration::from_millis(5000),
            check_interval: Duration::from_millis(200),
            settle_delay: Duration::from_millis(500),
        }
    }

    pub fn patient() -> Self {
        Self {
            navigation: Duration::from_millis(60000),
            page_stable: Duration::from_millis(60000),
            cookie_banner: Duration::from_millis(20000),
            banner_dismiss: Duration::from_millis(20000),
            vendor_api: Duration::from_millis(20000),
            check_interval: Duration::from_millis(500),
            settle_delay: Duration::from_millis(2000),
        }
    }
}
