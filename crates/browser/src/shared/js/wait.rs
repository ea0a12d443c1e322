/// Document ready state plus the number of resource fetches still in flight.
pub const PAGE_ACTIVITY: &str = r#"
() => ({
    readyState: document.readyState,
    pendingResources: performance.getEntriesByType('resource').filter(r => !r.responseEnd).length
})
"#;
