//! Renderer trait abstraction.

use kurbo::Affine;
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use sketchnote_core::{Canvas, CanvasSize, CssColor, Drawable};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Font could not be loaded")]
    Font,
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Committed drawables, back to front.
    pub objects: &'a [Drawable],
    /// In-progress drawable, drawn on top of everything else.
    pub transient: Option<&'a Drawable>,
    /// Canvas to surface transform.
    pub transform: Affine,
    /// Output size in pixels.
    pub size: CanvasSize,
    /// Background color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context for committed drawables at identity
    /// transform, as used for export.
    pub fn new(objects: &'a [Drawable], size: CanvasSize) -> Self {
        Self {
            objects,
            transient: None,
            transform: Affine::IDENTITY,
            size,
            background_color: Color::WHITE,
        }
    }

    /// Live view of a canvas: committed drawables, the transient drawable
    /// and the viewport transform.
    pub fn for_canvas(canvas: &'a Canvas) -> Self {
        Self::new(canvas.objects(), canvas.canvas_size())
            .with_transient(canvas.transient())
            .with_transform(canvas.viewport().transform())
    }

    pub fn with_transient(mut self, transient: Option<&'a Drawable>) -> Self {
        self.transient = transient;
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Drawables in paint order.
    pub fn drawables(&self) -> impl Iterator<Item = &'a Drawable> + '_ {
        self.objects.iter().chain(self.transient)
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Draw one frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// Parse a stored CSS color. Unparseable colors fall back to black.
pub fn css_to_color(color: &CssColor) -> Color {
    match parse_color(color.as_str()) {
        Ok(parsed) => parsed.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::warn!("Unrecognized color {:?} ({}), using black", color.as_str(), e);
            Color::BLACK
        }
    }
}
