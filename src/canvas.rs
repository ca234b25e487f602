//! HTML Canvas rendering for WASM environments.
//!
//! This module provides [`IconStudio`], a wrapper around [`IconRenderer`]
//! that renders into an HTML canvas element and hands PNG/ICO downloads back
//! to JavaScript.
//!
//! # Feature Flag
//!
//! This module is only available with the `canvas` feature enabled:
//!
//! ```toml
//! [dependencies]
//! iconmaker = { version = "0.1", features = ["canvas"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { IconStudio } from 'iconmaker';
//!
//! await init();
//!
//! const studio = new IconStudio();
//! studio.setSpec("golden star", "#6366f1", "#ffd700", 256);
//! studio.renderToCanvas(document.getElementById('preview'), 128);
//!
//! const ico = studio.exportBytes("ico");
//! const name = studio.fileName("My Star", "ico"); // "My Star_256x256.ico"
//! ```

use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::export::{ExportFormat, export, file_name};
use crate::icon::{IconSpec, RasterImage};
use crate::renderer::{Configurable, IconRenderer, RenderOptions};

// ============================================================================
// IconStudio
// ============================================================================

/// A wrapper around [`IconRenderer`] for live preview in web UIs.
///
/// Holds the current spec and the last render, so previews at several sizes
/// and the final download all come from one render.
#[wasm_bindgen]
pub struct IconStudio {
    renderer: IconRenderer,
    spec: IconSpec,
    current: Option<RasterImage>,
}

impl Default for IconStudio {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl IconStudio {
    #[wasm_bindgen(constructor)]
    pub fn new() -> IconStudio {
        Self {
            renderer: IconRenderer::new(),
            spec: IconSpec::default(),
            current: None,
        }
    }

    // ---- Inputs ----

    /// Sets the description, colors and export size. Invalidates the last render.
    #[wasm_bindgen(js_name = "setSpec")]
    pub fn set_spec(
        &mut self,
        description: &str,
        background: &str,
        foreground: &str,
        size: u32,
    ) -> Result<(), JsError> {
        self.spec = IconSpec::from_hex(description, background, foreground, size)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.current = None;
        Ok(())
    }

    /// Uses an externally generated image (e.g. from the remote service) as
    /// the current render.
    #[wasm_bindgen(js_name = "setImageDataUrl")]
    pub fn set_image_data_url(&mut self, data_url: &str) -> Result<(), JsError> {
        let raster = RasterImage::from_data_url(data_url, crate::icon::WORKING_SIZE)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.current = Some(raster);
        Ok(())
    }

    // ---- Rendering ----

    /// Renders (if needed) and draws the icon resampled to `size` pixels.
    #[wasm_bindgen(js_name = "renderToCanvas")]
    pub fn render_to_canvas(&mut self, canvas: &HtmlCanvasElement, size: u32) -> Result<(), JsError> {
        let rendered = self.current().resized(size);

        canvas.set_width(size);
        canvas.set_height(size);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|_| JsError::new("Failed to get 2d context"))?
            .ok_or_else(|| JsError::new("Canvas 2d context is null"))?
            .dyn_into()
            .map_err(|_| JsError::new("Failed to cast to CanvasRenderingContext2d"))?;

        let raw_pixels = rendered.into_image().into_raw();
        let image_data =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(&raw_pixels), size, size)
                .map_err(|_| JsError::new("Failed to create ImageData"))?;

        ctx.put_image_data(&image_data, 0.0, 0.0)
            .map_err(|_| JsError::new("Failed to put image data"))?;
        Ok(())
    }

    /// Returns raw RGBA pixels of the icon resampled to `size`.
    #[wasm_bindgen(js_name = "renderToPixels")]
    pub fn render_to_pixels(&mut self, size: u32) -> js_sys::Uint8Array {
        let raw_pixels = self.current().resized(size).into_image().into_raw();
        let array = js_sys::Uint8Array::new_with_length(raw_pixels.len() as u32);
        array.copy_from(&raw_pixels);
        array
    }

    /// The current render as a PNG data URL, for `<img>` previews and saving.
    #[wasm_bindgen(js_name = "toDataUrl")]
    pub fn to_data_url(&mut self) -> Result<String, JsError> {
        self.current()
            .to_data_url()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    // ---- Export ----

    /// Encodes the current render at the spec's size as `"png"` or `"ico"`.
    #[wasm_bindgen(js_name = "exportBytes")]
    pub fn export_bytes(&mut self, format: &str) -> Result<js_sys::Uint8Array, JsError> {
        let format: ExportFormat = format.parse().map_err(|e: String| JsError::new(&e))?;
        let size = self.spec.size;
        let out = export(self.current(), size, "", format)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let array = js_sys::Uint8Array::new_with_length(out.bytes.len() as u32);
        array.copy_from(&out.bytes);
        Ok(array)
    }

    /// Download file name for the current spec's size.
    #[wasm_bindgen(js_name = "fileName")]
    pub fn file_name(&self, name: &str, format: &str) -> Result<String, JsError> {
        let format: ExportFormat = format.parse().map_err(|e: String| JsError::new(&e))?;
        Ok(file_name(name, self.spec.size, format))
    }

    // ---- Options Import/Export ----

    /// Exports the renderer options as a JSON string.
    #[wasm_bindgen(js_name = "exportOptionsJson")]
    pub fn export_options_json(&self) -> Result<String, JsError> {
        self.renderer
            .export_options()
            .to_json()
            .map_err(|e| JsError::new(&format!("Failed to serialize options: {}", e)))
    }

    /// Imports renderer options from a JSON string. Invalidates the last render.
    #[wasm_bindgen(js_name = "importOptionsJson")]
    pub fn import_options_json(&mut self, json: &str) -> Result<(), JsError> {
        let options = RenderOptions::from_json(json)
            .map_err(|e| JsError::new(&format!("Failed to parse options: {}", e)))?;
        self.renderer.apply_options(&options);
        self.current = None;
        Ok(())
    }

    /// Drops the last render.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl IconStudio {
    fn current(&mut self) -> &RasterImage {
        self.current
            .get_or_insert_with(|| self.renderer.render(&self.spec))
    }
}
