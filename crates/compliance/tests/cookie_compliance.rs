//! Consent scenarios from `tests/features`, run against an in-memory page.
//!
//!   cargo test -p cookie_compliance --test cookie_compliance

use consent_core::mock::{Effect, MockSession};
use consent_core::{CookieRecord, ElementState};
use cookie_compliance::{
    ComplianceError, CookieComplianceConfig, CookieComplianceContext, CookieManagerConfig, ManagerKind,
    TimeoutConfig,
};
use cucumber::{World, given, then, when};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

const ACCEPT: &str = "#cookie-accept";
const REJECT: &str = "#cookie-reject";
const BANNER: &str = "#cookie-banner";
// Marker of the OneTrust group status script
const STATUS_SCRIPT: &str = "OnetrustActiveGroups";

#[derive(World, Default)]
pub struct ComplianceWorld {
    config: CookieComplianceConfig,
    preloaded: Vec<CookieRecord>,
    set_on_accept: Vec<CookieRecord>,
    iframes: Vec<String>,
    onetrust_groups: Vec<String>,
    context: Option<CookieComplianceContext>,
    audit_error: Option<ComplianceError>,
}

impl fmt::Debug for ComplianceWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceWorld")
            .field("config", &self.config)
            .field("opened", &self.context.is_some())
            .field("audit_error", &self.audit_error)
            .finish()
    }
}

impl ComplianceWorld {
    fn open(&mut self) {
        let html = self
            .iframes
            .iter()
            .map(|src| format!(r#"<iframe src="{}"></iframe>"#, src))
            .collect::<String>();

        let mut accept_effects = vec![Effect::SetElement(BANNER.into(), ElementState::HIDDEN)];
        accept_effects.extend(self.set_on_accept.iter().cloned().map(Effect::SetCookie));

        let mut session = MockSession::new()
            .with_url("https://www.example.com/")
            .with_html(&format!("<html><body>{}</body></html>", html))
            .with_element(BANNER, ElementState::VISIBLE)
            .with_element(ACCEPT, ElementState::VISIBLE)
            .with_element(REJECT, ElementState::VISIBLE)
            .on_click(ACCEPT, accept_effects)
            .on_click(REJECT, vec![Effect::SetElement(BANNER.into(), ElementState::HIDDEN)]);
        for cookie in &self.preloaded {
            session = session.with_cookie(&cookie.name, &cookie.domain, &cookie.value);
        }

        if !self.onetrust_groups.is_empty() {
            let mut allow_all = vec![
                Effect::SetEvaluation(STATUS_SCRIPT.into(), self.group_status(true)),
                Effect::SetElement(BANNER.into(), ElementState::HIDDEN),
            ];
            allow_all.extend(self.set_on_accept.iter().cloned().map(Effect::SetCookie));
            session = session
                .with_truthy("window.OneTrust")
                .with_evaluation(STATUS_SCRIPT, self.group_status(false))
                .on_script("AllowAll", allow_all)
                .on_script(
                    "RejectAll",
                    vec![
                        Effect::SetEvaluation(STATUS_SCRIPT.into(), self.group_status(false)),
                        Effect::SetElement(BANNER.into(), ElementState::HIDDEN),
                    ],
                );
        }

        self.context = Some(CookieComplianceContext::from_config(
            Arc::new(session),
            self.config.clone(),
            TimeoutConfig::default().with_settle_delay(0),
        ));
    }

    /// The first group is strictly necessary and always active.
    fn group_status(&self, all_accepted: bool) -> Value {
        let groups = self
            .onetrust_groups
            .iter()
            .enumerate()
            .map(|(i, group)| (group.clone(), Value::Bool(all_accepted || i == 0)))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(groups)
    }

    fn context(&self) -> &CookieComplianceContext {
        self.context.as_ref().expect("the page has not been opened")
    }
}

fn names(list: &str) -> Vec<String> {
    list.split(',').map(|name| name.trim().to_string()).collect()
}

#[given(regex = r#"^a site whose consent banner is managed by "([^"]*)"$"#)]
async fn site_with_manager(world: &mut ComplianceWorld, kind: String) {
    let kind: ManagerKind = serde_json::from_value(serde_json::Value::String(kind)).expect("unknown manager");
    world.config.cookie_manager = CookieManagerConfig {
        kind,
        accept_button_selector: ACCEPT.into(),
        reject_button_selector: REJECT.into(),
        cookie_banner_selector: BANNER.into(),
        api_timeout_ms: None,
    };
}

#[given(regex = r#"^the "(\w+)" category sets the cookies "([^"]*)"$"#)]
async fn category_cookies(world: &mut ComplianceWorld, category: String, list: String) {
    world.config.cookies.insert(category, names(&list));
}

#[given(regex = r#"^accepting the banner sets the cookie "([^"]*)" with value "([^"]*)"$"#)]
async fn accept_sets_cookie(world: &mut ComplianceWorld, name: String, value: String) {
    world.set_on_accept.push(CookieRecord::new(name, ".example.com", value));
}

#[given(regex = r#"^the page sets the cookie "([^"]*)" on "([^"]*)" with value "([^"]*)"$"#)]
async fn preloaded_cookie(world: &mut ComplianceWorld, name: String, domain: String, value: String) {
    world.preloaded.push(CookieRecord::new(name, domain, value));
}

#[given(regex = r#"^the cookies "([^"]*)" are ignored$"#)]
async fn ignored_cookies(world: &mut ComplianceWorld, list: String) {
    world.config.cookies_ignored.extend(names(&list));
}

#[given(regex = r#"^the page embeds an iframe from "([^"]*)"$"#)]
async fn embedded_iframe(world: &mut ComplianceWorld, src: String) {
    world.iframes.push(src);
}

#[given(regex = r#"^third-party iframes from "([^"]*)" are ignored$"#)]
async fn ignored_domain(world: &mut ComplianceWorld, domain: String) {
    world.config.third_party_domains_ignored.push(domain);
}

#[given(regex = r#"^third-party iframes from "([^"]*)" are monitored$"#)]
async fn included_domain(world: &mut ComplianceWorld, domain: String) {
    world.config.third_party_domains_included.push(domain);
}

#[given(regex = r#"^the OneTrust API is loaded with the groups "([^"]*)"$"#)]
async fn onetrust_groups(world: &mut ComplianceWorld, list: String) {
    world.onetrust_groups = names(&list);
}

#[when(regex = r"^I open the page$")]
async fn open_page(world: &mut ComplianceWorld) {
    world.open();
}

#[when(regex = r"^I wait cookie banner appears$")]
async fn wait_banner(world: &mut ComplianceWorld) {
    world.context().wait_cookie_banner_appears().await.unwrap_or_else(|e| panic!("{}", e));
}

#[when(regex = r"^I accept cookies$")]
async fn accept(world: &mut ComplianceWorld) {
    world.context().accept_cookies().await.unwrap_or_else(|e| panic!("{}", e));
}

#[when(regex = r"^I reject cookies$")]
async fn reject(world: &mut ComplianceWorld) {
    world.context().reject_cookies().await.unwrap_or_else(|e| panic!("{}", e));
}

#[when(regex = r"^I accept all cookies through the consent manager$")]
async fn accept_through_manager(world: &mut ComplianceWorld) {
    world
        .context()
        .accept_cookies_through_manager()
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[when(regex = r"^I reject all cookies through the consent manager$")]
async fn reject_through_manager(world: &mut ComplianceWorld) {
    world
        .context()
        .reject_cookies_through_manager()
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[when(regex = r"^I audit the page for cookies loaded without consent$")]
async fn audit(world: &mut ComplianceWorld) {
    world.audit_error = world.context().there_should_not_be_any_cookie().await.err();
}

#[then(regex = r"^the cookies of (\w+) type have not been loaded$")]
async fn category_not_loaded(world: &mut ComplianceWorld, category: String) {
    world
        .context()
        .cookies_should_be_empty(&category)
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r"^the cookies of (\w+) type have been loaded$")]
async fn category_loaded(world: &mut ComplianceWorld, category: String) {
    world
        .context()
        .cookies_have_been_saved(&category)
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r"^there should not be any cookies loaded$")]
async fn nothing_loaded(world: &mut ComplianceWorld) {
    world
        .context()
        .there_should_not_be_any_cookie()
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r#"^the cookie with name "([^"]*)" exists$"#)]
async fn cookie_exists(world: &mut ComplianceWorld, name: String) {
    world.context().cookie_exists(&name).await.unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r#"^the cookie with name "([^"]*)" exists with value "([^"]*)"$"#)]
async fn cookie_exists_with_value(world: &mut ComplianceWorld, name: String, value: String) {
    world
        .context()
        .cookie_exists_with_value(&name, &value)
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r#"^the cookie category "([^"]*)" is accepted$"#)]
async fn category_accepted(world: &mut ComplianceWorld, category: String) {
    world
        .context()
        .cookie_category_should_be_accepted(&category, true)
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r#"^the cookie category "([^"]*)" is not accepted$"#)]
async fn category_not_accepted(world: &mut ComplianceWorld, category: String) {
    world
        .context()
        .cookie_category_should_be_accepted(&category, false)
        .await
        .unwrap_or_else(|e| panic!("{}", e));
}

#[then(regex = r"^the cookie banner is closed$")]
async fn banner_closed(world: &mut ComplianceWorld) {
    assert!(!world.context().is_banner_visible().await.unwrap());
}

#[then(regex = r"^the audit finds (\d+) violations?$")]
async fn audit_violations(world: &mut ComplianceWorld, count: usize) {
    let found = world.audit_error.as_ref().map_or(0, |e| e.violations().len());
    assert_eq!(found, count, "audit result: {:?}", world.audit_error);
}

#[then(regex = r#"^the audit report mentions "([^"]*)"$"#)]
async fn audit_mentions(world: &mut ComplianceWorld, text: String) {
    let report = world.audit_error.as_ref().map(|e| e.to_string()).unwrap_or_default();
    assert!(report.contains(&text), "'{}' not in:\n{}", text, report);
}

#[then(regex = r#"^the audit report does not mention "([^"]*)"$"#)]
async fn audit_omits(world: &mut ComplianceWorld, text: String) {
    let report = world.audit_error.as_ref().map(|e| e.to_string()).unwrap_or_default();
    assert!(!report.contains(&text), "'{}' unexpectedly in:\n{}", text, report);
}

#[tokio::main]
async fn main() {
    ComplianceWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
