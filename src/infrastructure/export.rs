//! Browser-side export plumbing: SVG rasterization through an offscreen
//! canvas and the object-URL download handoff.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement,
    HtmlImageElement, Url,
};

use crate::domain::errors::ExportError;
use crate::domain::logging::{LogComponent, get_logger};

const COMPONENT: LogComponent = LogComponent::Infrastructure("Export");

/// Rasterize SVG markup to PNG bytes of exactly `width` x `height` pixels.
///
/// The markup travels through a blob URL into an `<img>`, whose `decode()`
/// promise rejects on malformed SVG. Drawing happens over a solid
/// `background` fill, so transparent chart regions come out opaque.
pub async fn rasterize_svg(
    markup: &str,
    width: u32,
    height: u32,
    background: &str,
) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::Canvas("zero-sized raster target".to_string()));
    }

    let blob = svg_blob(markup)?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| ExportError::Canvas(describe(&e)))?;

    let image = HtmlImageElement::new().map_err(|e| ExportError::Canvas(describe(&e)))?;
    image.set_src(&url);
    let decoded = JsFuture::from(image.decode()).await;
    let _ = Url::revoke_object_url(&url);
    if decoded.is_err() {
        get_logger().error(COMPONENT, "❌ browser refused to decode chart SVG");
        return Err(ExportError::Decode("markup is not decodable SVG".to_string()));
    }

    let document = gloo::utils::document();
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| ExportError::Canvas(describe(&e)))?
        .dyn_into()
        .map_err(|_| ExportError::Canvas("created element is not a canvas".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| ExportError::Canvas(describe(&e)))?
        .ok_or_else(|| ExportError::Canvas("2d context unavailable".to_string()))?
        .dyn_into()
        .map_err(|_| ExportError::Canvas("context has unexpected type".to_string()))?;

    context.set_fill_style_str(background);
    context.fill_rect(0.0, 0.0, width as f64, height as f64);
    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(|e| ExportError::Canvas(describe(&e)))?;

    let data_url =
        canvas.to_data_url_with_type("image/png").map_err(|e| ExportError::Canvas(describe(&e)))?;
    png_bytes_from_data_url(&data_url)
}

fn svg_blob(markup: &str) -> Result<Blob, ExportError> {
    let options = BlobPropertyBag::new();
    options.set_type("image/svg+xml;charset=utf-8");
    let parts = js_sys::Array::of1(&JsValue::from_str(markup));
    Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| ExportError::Canvas(describe(&e)))
}

fn png_bytes_from_data_url(data_url: &str) -> Result<Vec<u8>, ExportError> {
    let encoded = data_url
        .split_once("base64,")
        .map(|(_, tail)| tail)
        .ok_or_else(|| ExportError::Canvas("canvas returned no base64 payload".to_string()))?;
    let binary = gloo::utils::window()
        .atob(encoded)
        .map_err(|e| ExportError::Canvas(describe(&e)))?;
    Ok(binary.chars().map(|c| c as u32 as u8).collect())
}

/// Hand text to the browser as a file download.
pub fn download_text(file_name: &str, mime: &str, content: &str) -> Result<(), ExportError> {
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| ExportError::Download(describe(&e)))?;
    trigger_download(&blob, file_name)
}

/// Hand raw bytes to the browser as a file download.
pub fn download_bytes(file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), ExportError> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| ExportError::Download(describe(&e)))?;
    trigger_download(&blob, file_name)
}

fn trigger_download(blob: &Blob, file_name: &str) -> Result<(), ExportError> {
    let url =
        Url::create_object_url_with_blob(blob).map_err(|e| ExportError::Download(describe(&e)))?;
    let document = gloo::utils::document();
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| ExportError::Download(describe(&e)))?
        .dyn_into()
        .map_err(|_| ExportError::Download("created element is not an anchor".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    let _ = Url::revoke_object_url(&url);
    get_logger().info(COMPONENT, &format!("💾 download handed off: {file_name}"));
    Ok(())
}

fn describe(value: &JsValue) -> String {
    format!("{value:?}")
}
