use focusd_site::release::{FetchError, FetchFuture, HttpClient};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::js_err;

/// `window.fetch`, text body only.
pub(super) struct BrowserFetch;

impl HttpClient for BrowserFetch {
    fn get_text<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let window = web_sys::window().ok_or(FetchError::Network("no window".into()))?;
            let resp = JsFuture::from(window.fetch_with_str(url))
                .await
                .map_err(|e| FetchError::Network(js_err(&e)))?
                .dyn_into::<web_sys::Response>()
                .map_err(|e| FetchError::Network(js_err(&e)))?;
            if !resp.ok() {
                return Err(FetchError::Status(resp.status()));
            }
            let body = resp.text().map_err(|e| FetchError::Network(js_err(&e)))?;
            let text = JsFuture::from(body)
                .await
                .map_err(|e| FetchError::Network(js_err(&e)))?;
            text.as_string()
                .ok_or(FetchError::Network("response body is not text".into()))
        })
    }
}
