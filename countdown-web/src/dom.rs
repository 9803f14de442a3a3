//! Browser document access for mounting the countdown.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

fn page_document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no browser document to mount the countdown in"))
}

/// Best-effort text for a thrown JS value.
#[must_use]
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{value:?}"),
    }
}

/// Report a failure that happens before yew is running.
pub fn report_mount_failure(err: &JsValue) {
    let message = format!("countdown mount failed: {}", describe_js_error(err));
    web_sys::console::error_1(&message.into());
}

/// The element with `id`; created under `<body>` when the page lacks one.
///
/// # Errors
/// Fails outside a browser, when `<body>` is missing, or when the DOM
/// rejects the new element.
pub fn mount_root(id: &str) -> Result<Element, JsValue> {
    let document = page_document()?;
    if let Some(existing) = document.get_element_by_id(id) {
        return Ok(existing);
    }
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no <body>"))?;
    let created = document.create_element("div")?;
    created.set_id(id);
    body.append_child(&created)?;
    log::debug!("created mount element #{id}");
    Ok(created)
}
