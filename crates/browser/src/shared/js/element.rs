pub const CHECK_ELEMENT_STATE: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return { exists: false, visible: false };

    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    const visible = rect.width > 0 && rect.height > 0 &&
                    style.visibility !== 'hidden' && style.display !== 'none';

    return { exists: true, visible };
}
"#;

pub const SCROLL_INTO_VIEW: &str = r#"
(selector, block) => {
    const el = document.querySelector(selector);
    if (!el) return { success: false, error: 'Element not found' };
    el.scrollIntoView({ behavior: 'instant', block: block || 'center' });
    return { success: true };
}
"#;

pub const SAFE_CLICK: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return { success: false, error: 'Element not found' };
    el.click();
    return { success: true };
}
"#;
