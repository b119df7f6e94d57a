use anyhow::{Result, anyhow};
use psyscene_core::Drawable;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::compose::blit_centered;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Circle {
        radius: f32,
        color: [u8; 4],
    },
    Rectangle {
        width: f32,
        height: f32,
        color: [u8; 4],
    },
    Arrow {
        direction: ArrowDirection,
        size: f32,
        color: [u8; 4],
    },
}

impl ShapeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Rectangle { .. } => "rectangle",
            ShapeKind::Arrow { .. } => "arrow",
        }
    }

    fn extent(&self) -> (u32, u32) {
        match self {
            ShapeKind::Circle { radius, .. } => {
                let size = (radius * 2.0).ceil() as u32;
                (size, size)
            }
            ShapeKind::Rectangle { width, height, .. } => {
                (width.ceil() as u32, height.ceil() as u32)
            }
            ShapeKind::Arrow { size, .. } => {
                let size = (size * 2.0).ceil() as u32;
                (size, size)
            }
        }
    }
}

/// A filled shape, rasterised once and blitted every frame.
pub struct ShapeStim {
    kind: ShapeKind,
    offset: (f32, f32),
    pixmap: Pixmap,
}

impl ShapeStim {
    pub fn new(kind: ShapeKind) -> Result<Self> {
        Self::at(kind, (0.0, 0.0))
    }

    /// `offset` is in pixels from the canvas center.
    pub fn at(kind: ShapeKind, offset: (f32, f32)) -> Result<Self> {
        let pixmap = rasterize(&kind)?;
        Ok(Self {
            kind,
            offset,
            pixmap,
        })
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }
}

impl Drawable for ShapeStim {
    fn draw(&self, canvas: &mut Pixmap) {
        blit_centered(canvas, &self.pixmap, self.offset);
    }
}

fn rasterize(kind: &ShapeKind) -> Result<Pixmap> {
    let (width, height) = kind.extent();
    let mut pixmap = Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow!("Failed to create {} pixmap", kind.label()))?;
    let mut paint = Paint::default();
    paint.anti_alias = false;

    match kind {
        ShapeKind::Circle { radius, color } => {
            paint.set_color(rgba(color));
            let mut pb = PathBuilder::new();
            pb.push_circle(*radius, *radius, *radius);
            if let Some(path) = pb.finish() {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        ShapeKind::Rectangle {
            width: w,
            height: h,
            color,
        } => {
            paint.set_color(rgba(color));
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, *w, *h) {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
        ShapeKind::Arrow {
            direction,
            size,
            color,
        } => {
            paint.set_color(rgba(color));
            let (c, s) = (*size, *size);
            let mut pb = PathBuilder::new();
            match direction {
                ArrowDirection::Right => {
                    pb.move_to(c + s, c);
                    pb.line_to(c, c - s);
                    pb.line_to(c, c + s);
                }
                ArrowDirection::Left => {
                    pb.move_to(c - s, c);
                    pb.line_to(c, c - s);
                    pb.line_to(c, c + s);
                }
                ArrowDirection::Up => {
                    pb.move_to(c, c - s);
                    pb.line_to(c - s, c);
                    pb.line_to(c + s, c);
                }
                ArrowDirection::Down => {
                    pb.move_to(c, c + s);
                    pb.line_to(c - s, c);
                    pb.line_to(c + s, c);
                }
            }
            pb.close();
            if let Some(path) = pb.finish() {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
    }

    Ok(pixmap)
}

fn rgba(color: &[u8; 4]) -> Color {
    Color::from_rgba8(color[0], color[1], color[2], color[3])
}
