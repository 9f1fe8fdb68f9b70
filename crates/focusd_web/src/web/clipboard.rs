use focusd_site::clipboard::{Clipboard, ClipboardError, WriteFuture};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::js_err;

/// `navigator.clipboard.writeText`, with a hidden-textarea `execCommand`
/// fallback for contexts where the async API is missing or refused.
pub(super) struct BrowserClipboard;

fn write_text_promise(text: &str) -> Result<Promise, ClipboardError> {
    let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .ok_or(ClipboardError::Unavailable)?;
    let write = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or(ClipboardError::Unavailable)?;
    write
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| ClipboardError::Rejected(js_err(&e)))?
        .dyn_into::<Promise>()
        .map_err(|e| ClipboardError::Rejected(js_err(&e)))
}

impl Clipboard for BrowserClipboard {
    fn write_text<'a>(&'a self, text: &'a str) -> WriteFuture<'a> {
        Box::pin(async move {
            let promise = write_text_promise(text)?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| ClipboardError::Rejected(js_err(&e)))
        })
    }

    fn fallback_copy(&self, text: &str) -> Result<bool, ClipboardError> {
        let fallback = |e: JsValue| ClipboardError::Fallback(js_err(&e));
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(ClipboardError::Unavailable)?;
        let body = doc.body().ok_or(ClipboardError::Unavailable)?;
        let area = doc
            .create_element("textarea")
            .map_err(fallback)?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| ClipboardError::Fallback("not a textarea".into()))?;
        area.set_value(text);
        let style = area.style();
        style.set_property("position", "fixed").map_err(fallback)?;
        style.set_property("left", "-9999px").map_err(fallback)?;
        body.append_child(&area).map_err(fallback)?;
        area.select();

        let copied = doc
            .dyn_ref::<web_sys::HtmlDocument>()
            .ok_or(ClipboardError::Unavailable)
            .and_then(|d| d.exec_command("copy").map_err(fallback));
        let _ = body.remove_child(&area);
        copied
    }
}
