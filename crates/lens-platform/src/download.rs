//! Save text to the user's downloads through a temporary object URL.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use lens_types::{LensError, Result};

pub fn download_text(file_name: &str, text: &str) -> Result<()> {
    let window = web_sys::window()
        .ok_or_else(|| LensError::JsInterop("No window object".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| LensError::JsInterop("No document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| LensError::JsInterop("No document body".to_string()))?;

    let parts = Array::of1(&JsValue::from_str(text));
    let bag = BlobPropertyBag::new();
    bag.set_type("text/plain");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &bag)
        .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    body.append_child(&anchor)
        .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?;
    anchor.click();
    anchor.remove();

    let _ = Url::revoke_object_url(&url);
    log::info!("Downloaded {}", file_name);
    Ok(())
}
