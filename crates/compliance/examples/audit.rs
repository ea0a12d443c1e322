use browser::{ChromiumSession, LaunchOptions};
use cookie_compliance::{BrowserSession, CookieComplianceConfig, CookieComplianceContext, TimeoutConfig};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// cargo run -p cookie_compliance --example audit -- https://www.example.com/
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.example.com/".to_string());

    let config = CookieComplianceConfig::from_value(json!({
        "cookie_manager": {
            "type": "onetrust",
            "accept_button_selector": "#onetrust-accept-btn-handler",
            "reject_button_selector": "#onetrust-reject-all-handler",
            "cookie_banner_selector": "#onetrust-banner-sdk"
        },
        "cookies": {
            "analytics": ["_ga", "_gid"]
        },
        "report": { "path": "/tmp/cookie-reports", "screenshot": true }
    }))?;

    let timeouts = TimeoutConfig::patient();
    let session = Arc::new(ChromiumSession::launch(LaunchOptions::default(), timeouts.clone()).await?);
    session.visit(&url).await?;

    let context = CookieComplianceContext::from_config(session.clone(), config, timeouts);

    // Before any decision nothing may be tracked
    if let Err(e) = context.there_should_not_be_any_cookie().await {
        context.report_failure("there should not be any cookies loaded", &e).await;
        println!("{}", e);
    }

    context.wait_cookie_banner_appears().await?;
    context.accept_cookies().await?;
    if let Err(e) = context.cookies_have_been_saved("analytics").await {
        context.report_failure("the cookies of analytics type have been loaded", &e).await;
        println!("{}", e);
    }

    session.close().await?;
    Ok(())
}
