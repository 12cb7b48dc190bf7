//! tiny-skia based CPU renderer.
//!
//! Drawables are painted onto a transparent layer so erase strokes cut
//! through ink only, then the layer is composited over the background.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError, css_to_color};
use kurbo::{Affine, BezPath, PathEl, Point};
use peniko::Color;
use rusttype::{Font, Scale, point as rt_point};
use sketchnote_core::{Blend, CanvasSize, Drawable, DrawableKind, RasterError, Rasterizer};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel, not premultiplied).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PngRenderResult {
    /// Encode the pixels as a PNG file.
    pub fn encode(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .write_image_data(&self.rgba_data)
                .map_err(|e| RendererError::Encode(e.to_string()))?;
        }
        Ok(png_data)
    }
}

/// CPU renderer for previews and export rasters.
#[derive(Default)]
pub struct SkiaRenderer {
    /// Font for text labels. Without one, labels are not rasterized.
    font: Option<Font<'static>>,
    /// Last rendered frame.
    frame: Option<Pixmap>,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the TrueType/OpenType font in `bytes` for text labels.
    pub fn with_font(mut self, bytes: Vec<u8>) -> RenderResult<Self> {
        self.font = Some(Font::try_from_vec(bytes).ok_or(RendererError::Font)?);
        Ok(self)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// The last frame built by [`Renderer::build_scene`].
    pub fn frame(&self) -> Option<&Pixmap> {
        self.frame.as_ref()
    }

    /// Render a frame and read back its pixels.
    pub fn render_to_png(&mut self, ctx: &RenderContext) -> RenderResult<PngRenderResult> {
        self.build_scene(ctx)?;
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| RendererError::RenderFailed("no frame was produced".to_string()))?;

        let rgba_data = frame
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        Ok(PngRenderResult {
            rgba_data,
            width: frame.width(),
            height: frame.height(),
        })
    }

    fn draw_drawable(&self, layer: &mut Pixmap, drawable: &Drawable, transform: Affine) {
        let style = &drawable.style;
        let opacity = style.opacity.clamp(0.0, 1.0) as f32;
        let stroke_paint = paint_for(css_to_color(&style.stroke_color), opacity, drawable.blend());

        if let DrawableKind::TextLabel {
            x,
            y,
            text,
            font_size,
        } = &drawable.kind
        {
            self.draw_text(layer, Point::new(*x, *y), text, *font_size, &stroke_paint, transform);
            return;
        }

        let ts = to_skia_transform(transform);
        let Some(path) = to_skia_path(&drawable.to_path()) else {
            return;
        };

        if let Some(fill) = drawable.fill() {
            let fill_paint = paint_for(css_to_color(fill), opacity, Blend::Normal);
            layer.fill_path(&path, &fill_paint, FillRule::Winding, ts, None);
        }

        let stroke = Stroke {
            width: style.stroke_width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        layer.stroke_path(&path, &stroke_paint, &stroke, ts, None);

        // Arrowheads are filled with the stroke color.
        if let Some(head) = drawable.arrowhead().as_ref().and_then(to_skia_path) {
            layer.fill_path(&head, &stroke_paint, FillRule::Winding, ts, None);
            layer.stroke_path(&head, &stroke_paint, &stroke, ts, None);
        }
    }

    fn draw_text(&self, layer: &mut Pixmap, anchor: Point, text: &str, font_size: f64, paint: &Paint, transform: Affine) {
        let Some(font) = &self.font else {
            log::debug!("No font loaded, skipping text label");
            return;
        };
        let Some(mut mask) = Mask::new(layer.width(), layer.height()) else {
            return;
        };

        let origin = transform * anchor;
        let zoom = transform.determinant().abs().sqrt();
        let scale = Scale::uniform((font_size * zoom) as f32);
        let v_metrics = font.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;
        let (width, height) = (layer.width() as i32, layer.height() as i32);

        for (row, line) in text.lines().enumerate() {
            let baseline = origin.y as f32 + v_metrics.ascent + row as f32 * line_height;
            for glyph in font.layout(line, scale, rt_point(origin.x as f32, baseline)) {
                let Some(bounding_box) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = gx as i32 + bounding_box.min.x;
                    let py = gy as i32 + bounding_box.min.y;
                    if px < 0 || px >= width || py < 0 || py >= height {
                        return;
                    }
                    let idx = (py * width + px) as usize;
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let data = mask.data_mut();
                    data[idx] = data[idx].max(value);
                });
            }
        }

        if let Some(rect) = Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
            layer.fill_rect(rect, paint, Transform::identity(), Some(&mask));
        }
    }
}

impl Renderer for SkiaRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let CanvasSize { width, height } = ctx.size;
        let new_pixmap = || {
            Pixmap::new(width, height)
                .ok_or_else(|| RendererError::InitFailed(format!("invalid canvas size {}x{}", width, height)))
        };

        let mut layer = new_pixmap()?;
        for drawable in ctx.drawables() {
            self.draw_drawable(&mut layer, drawable, ctx.transform);
        }

        let mut frame = new_pixmap()?;
        frame.fill(to_skia_color(self.background_color(ctx)));
        frame.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
        self.frame = Some(frame);
        Ok(())
    }
}

impl Rasterizer for SkiaRenderer {
    fn rasterize(&mut self, objects: &[Drawable], size: CanvasSize) -> Result<Vec<u8>, RasterError> {
        let ctx = RenderContext::new(objects, size);
        self.render_to_png(&ctx)
            .and_then(|result| result.encode())
            .map_err(|e| match e {
                RendererError::InitFailed(msg) => RasterError::Unavailable(msg),
                other => RasterError::Failed(other.to_string()),
            })
    }
}

fn paint_for(color: Color, opacity: f32, blend: Blend) -> Paint<'static> {
    let rgba = color.multiply_alpha(opacity).to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    if blend == Blend::Erase {
        paint.blend_mode = BlendMode::DestinationOut;
    }
    paint
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}
