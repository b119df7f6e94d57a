//! Devices a scene drives: the window it paints on and the input sources it
//! polls. Implementations must return promptly; `present` may block for one
//! vertical sync and nothing else.

use crate::event::{KeyPress, MouseButton};
use crate::stimulus::Drawable;

pub trait Surface {
    /// Paints every drawable onto a fresh frame and flips it.
    fn present(&mut self, drawables: &[Box<dyn Drawable>]) -> anyhow::Result<()>;

    /// Refresh interval of the display in seconds.
    fn frame_period(&self) -> f64;
}

pub trait Keyboard {
    /// Drops every buffered key press.
    fn clear_events(&mut self);

    /// Restarts the clock that key press `rt`s are measured against.
    fn reset_clock(&mut self);

    /// Key presses received since the previous call, oldest first.
    fn get_keys(&mut self) -> Vec<KeyPress>;
}

/// Held buttons and the time each was pressed, ordered left, middle, right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonState {
    pub pressed: [bool; 3],
    pub times: [f64; 3],
}

impl ButtonState {
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed[button.index()]
    }

    pub fn time(&self, button: MouseButton) -> f64 {
        self.times[button.index()]
    }
}

pub trait Pointer {
    /// Restarts the clock that press times are measured against.
    fn click_reset(&mut self);

    fn get_pressed(&mut self) -> ButtonState;
}
