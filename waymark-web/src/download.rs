//! Browser download plumbing for backup files.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

use crate::tracker::{backup_file_name, BrowserClock, Clock, Tracker, WebSessionStore};

/// The page document, needed to stage the download anchor.
///
/// # Panics
/// Panics outside a browser context, where `window` and `document` do not
/// exist.
#[must_use]
pub fn document() -> Document {
    web_sys::window()
        .expect("no global `window`; not running in a browser")
        .document()
        .expect("browser window has no document")
}

/// Renders a thrown JavaScript value as text for log output.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Hand `json` to the browser as a file download named `file_name`, through
/// a temporary object URL and anchor click.
///
/// # Errors
///
/// Returns a readable message when the blob or anchor plumbing fails.
pub fn download_json(json: &str, file_name: &str) -> Result<(), String> {
    let parts = js_sys::Array::of1(&JsValue::from_str(json));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| js_error_message(&e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_error_message(&e))?;

    let document = document();
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| js_error_message(&e))?
        .dyn_into()
        .map_err(|_| "anchor element cast failed".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    let body = document
        .body()
        .ok_or_else(|| "document has no body".to_string())?;
    body.append_child(&anchor).map_err(|e| js_error_message(&e))?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    let _ = Url::revoke_object_url(&url);
    Ok(())
}

/// Export every session as a dated backup download. Failures are logged and
/// reported as `false`; nothing here interrupts tracking.
pub fn download_backup(tracker: &mut Tracker<WebSessionStore, BrowserClock>) -> bool {
    let json = match tracker.export_backup() {
        Ok(json) => json,
        Err(err) => {
            log::error!("backup serialization failed: {err}");
            return false;
        }
    };
    let file_name = backup_file_name(BrowserClock.now());
    if let Err(message) = download_json(&json, &file_name) {
        log::error!("backup download failed: {message}");
        return false;
    }
    true
}
