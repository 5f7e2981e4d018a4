//! CPU raster backend using tiny-skia, for PNG snapshots.

use crate::renderer::{
    LABEL_FONT_SIZE, LabelKind, RenderContext, RenderResult, Renderer, RendererError,
};
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};
use kurbo::{BezPath, PathEl, Point};
use peniko::Color;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform};

/// Result of PNG rendering.
#[derive(Debug)]
pub struct PngRenderResult {
    /// Encoded PNG file bytes.
    pub png_data: Vec<u8>,
    /// Straight (non-premultiplied) RGBA pixel data, 4 bytes per pixel.
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Software renderer drawing into an RGBA pixmap.
///
/// Labels use egui's default proportional font so snapshots match the
/// on-screen canvas.
pub struct RasterRenderer {
    pixmap: Pixmap,
    font: FontArc,
}

fn paint_for(color: Color) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint
}

/// Source-over blend of one straight RGBA color at `coverage` into a pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, rgba: [u8; 4], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0) * rgba[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let index = y as usize * pixmap.width() as usize + x as usize;
    let dst = pixmap.pixels()[index];
    let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
    let blended = PremultipliedColorU8::from_rgba(
        mix(rgba[0], dst.red()),
        mix(rgba[1], dst.green()),
        mix(rgba[2], dst.blue()),
        mix(255, dst.alpha()),
    );
    if let Some(color) = blended {
        pixmap.pixels_mut()[index] = color;
    }
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

impl RasterRenderer {
    /// Create a renderer with a transparent pixmap of the given size.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::InitFailed(format!("Invalid pixmap size {}x{}", width, height))
        })?;
        let font = FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)
            .map_err(|e| RendererError::InitFailed(format!("Failed to load label font: {}", e)))?;
        Ok(Self { pixmap, font })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight RGBA of one pixel, or `None` outside the pixmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Straight RGBA bytes of the whole pixmap.
    pub fn rgba_data(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Encode the current pixmap as PNG.
    pub fn to_png(&self) -> RenderResult<PngRenderResult> {
        let rgba_data = self.rgba_data();
        let png_data = encode_png(&rgba_data, self.width(), self.height())?;
        Ok(PngRenderResult {
            png_data,
            rgba_data,
            width: self.width(),
            height: self.height(),
        })
    }

    /// Render the session at the context's viewport size and encode it.
    pub fn render_png(ctx: &RenderContext) -> RenderResult<PngRenderResult> {
        let width = ctx.viewport_size.width.ceil().max(1.0) as u32;
        let height = ctx.viewport_size.height.ceil().max(1.0) as u32;
        let mut renderer = Self::new(width, height)?;
        renderer.build_scene(ctx);
        let result = renderer.to_png()?;
        log::info!("Rendered PNG snapshot: {}x{} ({} bytes)", width, height, result.png_data.len());
        Ok(result)
    }
}

impl Renderer for RasterRenderer {
    fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        if let Some(path) = to_skia_path(path) {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color) {
        if let Some(path) = to_skia_path(path) {
            let stroke = Stroke {
                width: width as f32,
                ..Default::default()
            };
            self.pixmap
                .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
        }
    }

    fn draw_handle(&mut self, center: Point, radius: f64, color: Color) {
        let circle = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32);
        if let Some(circle) = circle {
            self.pixmap.fill_path(
                &circle,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_label(&mut self, anchor: Point, text: &str, _kind: LabelKind, color: Color) {
        let c = color.to_rgba8();
        let rgba = [c.r, c.g, c.b, c.a];
        let scale = PxScale::from(LABEL_FONT_SIZE);
        let scaled = self.font.as_scaled(scale);

        // Anchor is the top-left of the text box.
        let mut caret = ab_glyph::point(anchor.x as f32, anchor.y as f32 + scaled.ascent());
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, id);
            }
            previous = Some(id);
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let pixmap = &mut self.pixmap;
            outlined.draw(|x, y, coverage| {
                let px = bounds.min.x as i32 + x as i32;
                let py = bounds.min.y as i32 + y as i32;
                blend_pixel(pixmap, px, py, rgba, coverage);
            });
        }
    }
}

/// Encode straight RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RendererError::Encode(format!("Failed to write PNG data: {}", e)))?;
    }
    Ok(png_data)
}
