use async_trait::async_trait;
use consent_core::{BrowserSession, ComplianceError, Result};
use std::collections::BTreeMap;

use crate::{CookieManager, Selectors};

/// Banner driven by clicks only; no vendor API is known.
#[derive(Debug, Clone)]
pub struct GenericCookieManager {
    selectors: Selectors,
}

impl GenericCookieManager {
    pub fn new(selectors: Selectors) -> Self {
        Self { selectors }
    }

    fn unsupported(&self, operation: &'static str) -> ComplianceError {
        ComplianceError::UnsupportedOperation {
            manager: self.name(),
            operation,
        }
    }
}

#[async_trait]
impl CookieManager for GenericCookieManager {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    async fn accept_cookies(&self, _session: &dyn BrowserSession) -> Result<()> {
        Err(self.unsupported("accept cookies programmatically"))
    }

    async fn reject_cookies(&self, _session: &dyn BrowserSession) -> Result<()> {
        Err(self.unsupported("reject cookies programmatically"))
    }

    async fn categories_accepted_status(&self, _session: &dyn BrowserSession) -> Result<BTreeMap<String, bool>> {
        Err(self.unsupported("read the accepted cookie categories"))
    }
}
