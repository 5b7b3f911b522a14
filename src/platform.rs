//! Browser preconditions. The wasm build targets WebGPU only; there is no WebGL path.

#[cfg(target_arch = "wasm32")]
use crate::core::error::BalloonError;

/// Fails fast when `navigator.gpu` is missing so the page shows a message
/// instead of a black canvas.
#[cfg(target_arch = "wasm32")]
pub fn check_webgpu_available() -> Result<(), BalloonError> {
    let Some(win) = web_sys::window() else {
        return Err(BalloonError::WebGpuUnavailable);
    };
    let nav = win.navigator();
    let key = wasm_bindgen::JsValue::from_str("gpu");
    let has_gpu = js_sys::Reflect::get(&nav, &key)
        .map(|v| !v.is_undefined())
        .unwrap_or(false);
    if has_gpu {
        Ok(())
    } else {
        Err(BalloonError::WebGpuUnavailable)
    }
}

/// Installs a panic hook that forwards panics to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
