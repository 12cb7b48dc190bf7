//! Document export: structured drawables plus a raster preview.

use crate::config::CanvasSize;
use crate::drawable::Drawable;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema version for documents with typed drawables.
pub const DOCUMENT_VERSION: u32 = 2;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Errors from a rasterizer.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Rasterizer unavailable: {0}")]
    Unavailable(String),
    #[error("Rasterization failed: {0}")]
    Failed(String),
}

/// Renders committed drawables to an encoded PNG.
pub trait Rasterizer {
    fn rasterize(&mut self, objects: &[Drawable], size: CanvasSize) -> Result<Vec<u8>, RasterError>;
}

/// Exported document, as stored by the note-saving layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExport {
    pub version: u32,
    pub objects: Vec<Drawable>,
    /// Same content as `objects`, for readers of the legacy field name.
    pub lines: Vec<Drawable>,
    /// PNG data URL, or empty when no raster was produced.
    #[serde(alias = "imageData")]
    pub raster_image: String,
    pub canvas_size: CanvasSize,
}

impl DocumentExport {
    /// Whether a raster preview is present.
    pub fn has_preview(&self) -> bool {
        !self.raster_image.is_empty()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode the raster preview back to PNG bytes.
    pub fn raster_png(&self) -> Option<Vec<u8>> {
        let encoded = self.raster_image.strip_prefix(PNG_DATA_URL_PREFIX)?;
        STANDARD.decode(encoded).ok()
    }
}

/// Build an export from committed drawables.
///
/// A missing rasterizer or a raster failure still yields a document, with
/// an empty image string.
pub fn export_document(
    objects: &[Drawable],
    canvas_size: CanvasSize,
    rasterizer: Option<&mut dyn Rasterizer>,
) -> DocumentExport {
    let raster_image = match rasterizer {
        Some(rasterizer) => match rasterizer.rasterize(objects, canvas_size) {
            Ok(png) => png_data_url(&png),
            Err(e) => {
                log::warn!("Exporting without preview: {}", e);
                String::new()
            }
        },
        None => {
            log::warn!("Exporting without preview: no rasterizer attached");
            String::new()
        }
    };

    let objects = objects.to_vec();
    DocumentExport {
        version: DOCUMENT_VERSION,
        lines: objects.clone(),
        objects,
        raster_image,
        canvas_size,
    }
}

/// Encode PNG bytes as a `data:` URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png))
}
