use anyhow::{Result, anyhow};
use psyscene_core::Drawable;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

use crate::compose::blit_centered;

/// A plus-shaped fixation mark at the canvas center.
pub struct FixationCross {
    pixmap: Pixmap,
}

impl FixationCross {
    /// `size` is the full extent of each bar, `thickness` its width.
    pub fn new(size: u32, thickness: f32, color: [u8; 4]) -> Result<Self> {
        let mut pm = Pixmap::new(size.max(1), size.max(1))
            .ok_or_else(|| anyhow!("Failed to create fixation pixmap"))?;

        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.set_color(Color::from_rgba8(color[0], color[1], color[2], color[3]));

        let extent = size as f32;
        let bars = [
            Rect::from_xywh(0.0, (extent - thickness) * 0.5, extent, thickness),
            Rect::from_xywh((extent - thickness) * 0.5, 0.0, thickness, extent),
        ];
        for bar in bars.into_iter().flatten() {
            pm.fill_rect(bar, &paint, Transform::identity(), None);
        }

        Ok(Self { pixmap: pm })
    }

    /// White 40px cross with 2px bars.
    pub fn standard() -> Result<Self> {
        Self::new(40, 2.0, [255, 255, 255, 255])
    }
}

impl Drawable for FixationCross {
    fn draw(&self, canvas: &mut Pixmap) {
        blit_centered(canvas, &self.pixmap, (0.0, 0.0));
    }
}
