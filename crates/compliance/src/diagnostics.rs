//! Plain-text tables printed with compliance findings.

use comfy_table::{Table, presets::UTF8_FULL};
use consent_core::CookieRecord;
use consent_parser::{MAX_URL_DISPLAY, ThirdPartyReference, truncate_url};

pub fn cookie_table(cookies: &[CookieRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Domain", "Name", "Value"]);
    for cookie in cookies {
        table.add_row(vec![cookie.domain.as_str(), cookie.name.as_str(), cookie.value.as_str()]);
    }
    table.to_string()
}

pub fn iframe_table(references: &[ThirdPartyReference]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Domain", "URL"]);
    for reference in references {
        table.add_row(vec![reference.domain.clone(), truncate_url(&reference.url, MAX_URL_DISPLAY)]);
    }
    table.to_string()
}
