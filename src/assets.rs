//! Fetching of the portal model and sound, and audio decoding.

use crate::core::AssetError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn fetch_error(url: &str, e: impl std::fmt::Debug) -> AssetError {
    AssetError::Fetch {
        url: url.to_string(),
        reason: format!("{:?}", e),
    }
}

/// Download `url` as an `ArrayBuffer`, reporting `(loaded, total)` byte
/// counts to `on_progress` whenever the total is known.
pub async fn fetch_array_buffer(
    url: &str,
    mut on_progress: impl FnMut(f64, f64) + 'static,
) -> Result<js_sys::ArrayBuffer, AssetError> {
    let xhr = web::XmlHttpRequest::new().map_err(|e| fetch_error(url, e))?;
    xhr.open_with_async("GET", url, true)
        .map_err(|e| fetch_error(url, e))?;
    xhr.set_response_type(web::XmlHttpRequestResponseType::Arraybuffer);

    let progress = Closure::wrap(Box::new(move |ev: web::ProgressEvent| {
        if ev.length_computable() {
            on_progress(ev.loaded(), ev.total());
        }
    }) as Box<dyn FnMut(_)>);
    xhr.set_onprogress(Some(progress.as_ref().unchecked_ref()));

    let done = js_sys::Promise::new(&mut |resolve, reject| {
        let onload = Closure::once_into_js(move || {
            _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once_into_js(move || {
            _ = reject.call1(&JsValue::NULL, &JsValue::from_str("network error"));
        });
        xhr.set_onload(Some(onload.unchecked_ref()));
        xhr.set_onerror(Some(onerror.unchecked_ref()));
    });
    xhr.send().map_err(|e| fetch_error(url, e))?;
    let result = JsFuture::from(done).await;
    xhr.set_onprogress(None);
    drop(progress);
    result.map_err(|e| fetch_error(url, e))?;

    let status = xhr.status().map_err(|e| fetch_error(url, e))?;
    if !(200..300).contains(&status) {
        return Err(AssetError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    xhr.response()
        .map_err(|e| fetch_error(url, e))?
        .dyn_into::<js_sys::ArrayBuffer>()
        .map_err(|e| fetch_error(url, e))
}

/// Decode a compressed audio file with the page's `AudioContext`.
pub async fn decode_audio(
    audio_ctx: &web::AudioContext,
    url: &str,
    data: &js_sys::ArrayBuffer,
) -> Result<web::AudioBuffer, AssetError> {
    let decode_error = |e: JsValue| AssetError::Decode {
        url: url.to_string(),
        reason: format!("{:?}", e),
    };
    let promise = audio_ctx.decode_audio_data(data).map_err(decode_error)?;
    JsFuture::from(promise)
        .await
        .map_err(decode_error)?
        .dyn_into::<web::AudioBuffer>()
        .map_err(decode_error)
}
