use std::path::Path;

use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context as _, Result, anyhow};
use psyscene_core::Drawable;
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::compose::blit_centered;

pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    FontArc::try_from_vec(bytes).map_err(|e| anyhow!("parsing font {}: {e}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub color: [u8; 4],
    pub offset: (f32, f32),
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 32.0,
            color: [255, 255, 255, 255],
            offset: (0.0, 0.0),
        }
    }
}

/// A line of text, rasterised once and blitted every frame.
pub struct TextStim {
    text: String,
    offset: (f32, f32),
    pixmap: Pixmap,
}

impl TextStim {
    pub fn new(font: &FontArc, text: impl Into<String>, style: TextStyle) -> Result<Self> {
        let text = text.into();
        let pixmap = render_text_pixmap(&text, style.size_px, font, style.color)
            .ok_or_else(|| anyhow!("Failed to create pixmap for {text:?}"))?;
        Ok(Self {
            text,
            offset: style.offset,
            pixmap,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Drawable for TextStim {
    fn draw(&self, canvas: &mut Pixmap) {
        blit_centered(canvas, &self.pixmap, self.offset);
    }
}

/// Rasterises `text` into a tightly cropped, premultiplied pixmap. Text with
/// no visible glyphs yields a transparent 1x1 pixmap.
pub fn render_text_pixmap(
    text: &str,
    font_size: f32,
    font: &FontArc,
    color: [u8; 4],
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Layout with baseline at ascent
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    if outlines.is_empty() {
        return Pixmap::new(1, 1);
    }

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;
    let stride = w as usize;
    let dst = pm.pixels_mut();

    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            let a = (cov * color[3] as f32 / 255.0).clamp(0.0, 1.0);
            let bg = dst[i];
            let inv = 1.0 - a;
            // source-over in premultiplied space
            let over = |src: u8, dst: u8| {
                ((src as f32 * a) + dst as f32 * inv).round().clamp(0.0, 255.0) as u8
            };
            let alpha = ((a * 255.0) + bg.alpha() as f32 * inv).round().min(255.0) as u8;
            let red = over(color[0], bg.red()).min(alpha);
            let green = over(color[1], bg.green()).min(alpha);
            let blue = over(color[2], bg.blue()).min(alpha);
            if let Some(px) = PremultipliedColorU8::from_rgba(red, green, blue, alpha) {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}
