use psyscene_core::Drawable;
use tiny_skia::{Color, IntRect, Pixmap, PixmapPaint, Transform};

/// Clears the canvas to `background` and paints every drawable in order.
pub fn compose(canvas: &mut Pixmap, background: Color, drawables: &[Box<dyn Drawable>]) {
    canvas.fill(background);
    for drawable in drawables {
        drawable.draw(canvas);
    }
}

/// Blends `pixmap` onto `canvas` with its center at `offset` pixels from the
/// canvas center.
pub fn blit_centered(canvas: &mut Pixmap, pixmap: &Pixmap, offset: (f32, f32)) {
    let cx = canvas.width() as f32 * 0.5 + offset.0;
    let cy = canvas.height() as f32 * 0.5 + offset.1;
    let x0 = (cx - pixmap.width() as f32 * 0.5).floor() as i32;
    let y0 = (cy - pixmap.height() as f32 * 0.5).floor() as i32;

    // Crop whatever hangs off the top or left so the draw origin is never
    // negative.
    let sx = x0.min(0).unsigned_abs();
    let sy = y0.min(0).unsigned_abs();
    if sx >= pixmap.width() || sy >= pixmap.height() {
        return;
    }
    let cropped;
    let source = if sx == 0 && sy == 0 {
        pixmap
    } else {
        let Some(visible) = IntRect::from_xywh(
            sx as i32,
            sy as i32,
            pixmap.width() - sx,
            pixmap.height() - sy,
        )
        .and_then(|rect| pixmap.clone_rect(rect)) else {
            return;
        };
        cropped = visible;
        &cropped
    };

    canvas.draw_pixmap(
        x0.max(0),
        y0.max(0),
        source.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}
