use anyhow::{Result, anyhow};
use psyscene_core::{Drawable, Surface};
use psyscene_timing::{Clock, HighPrecisionTimer, Timer};
use tiny_skia::{Color, Pixmap};

use crate::compose::compose;

/// A surface without a display: frames are composed into an in-memory
/// pixmap and paced to a fixed refresh rate with the high-precision timer.
pub struct OffscreenSurface {
    canvas: Pixmap,
    background: Color,
    timer: HighPrecisionTimer,
    refresh_rate: f64,
    next_flip: Option<f64>,
    frames: u64,
}

impl OffscreenSurface {
    pub fn new(width: u32, height: u32, refresh_rate: f64, timer: HighPrecisionTimer) -> Result<Self> {
        if refresh_rate <= 0.0 {
            return Err(anyhow!("refresh rate must be positive, got {refresh_rate}"));
        }
        let canvas = Pixmap::new(width, height).ok_or_else(|| anyhow!("Failed to create pixmap"))?;
        Ok(Self {
            canvas,
            background: Color::BLACK,
            timer,
            refresh_rate,
            next_flip: None,
            frames: 0,
        })
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn timer(&self) -> &HighPrecisionTimer {
        &self.timer
    }
}

impl Surface for OffscreenSurface {
    fn present(&mut self, drawables: &[Box<dyn Drawable>]) -> Result<()> {
        let started = self.timer.now();
        compose(&mut self.canvas, self.background, drawables);
        let render_time = self.timer.elapsed(started);
        self.timer.record_frame(render_time);

        // Wait for the next simulated vertical blank.
        let period = self.frame_period();
        let now = self.timer.seconds();
        let flip = match self.next_flip {
            Some(deadline) if deadline > now => deadline,
            _ => now,
        };
        self.timer.sleep_until(flip);
        self.next_flip = Some(flip + period);
        self.frames += 1;

        if self.frames % 600 == 0 {
            let stats = self.timer.calibration_stats();
            tracing::debug!(
                frames = self.frames,
                avg_compose_ms = stats.average_frame_time_ns / 1e6,
                jitter_ms = stats.jitter_ns / 1e6,
                "offscreen surface timing"
            );
        }
        Ok(())
    }

    fn frame_period(&self) -> f64 {
        1.0 / self.refresh_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixation::FixationCross;

    #[test]
    fn frames_are_paced_to_refresh_rate() {
        let timer = HighPrecisionTimer::new();
        let mut surface = OffscreenSurface::new(64, 64, 200.0, timer.clone()).unwrap();
        let start = timer.seconds();
        for _ in 0..5 {
            surface.present(&[]).unwrap();
        }
        // first flip is immediate, the next four wait ~5ms each
        assert!(timer.seconds() - start >= 4.0 * 0.005 - 1e-3);
        assert_eq!(surface.frames(), 5);
        assert!((surface.frame_period() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn presented_frame_holds_drawables() {
        let mut surface = OffscreenSurface::new(100, 100, 1000.0, HighPrecisionTimer::new()).unwrap();
        let cross: Vec<Box<dyn Drawable>> = vec![Box::new(FixationCross::standard().unwrap())];
        surface.present(&cross).unwrap();
        assert_eq!(surface.canvas().pixel(50, 50).unwrap().red(), 255);
        surface.present(&[]).unwrap();
        assert_eq!(surface.canvas().pixel(50, 50).unwrap().red(), 0);
    }

    #[test]
    fn rejects_non_positive_refresh_rate() {
        assert!(OffscreenSurface::new(8, 8, 0.0, HighPrecisionTimer::new()).is_err());
    }
}
