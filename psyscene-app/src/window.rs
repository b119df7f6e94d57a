use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use pixels::{Pixels, SurfaceTexture};
use psyscene_core::{ButtonState, Drawable, KeyPress, Keyboard, MouseButton, Pointer, Surface};
use psyscene_render::compose;
use psyscene_timing::{Clock, HighPrecisionTimer, Timer};
use tiny_skia::{Color, Pixmap};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowId},
};

const OPEN_ATTEMPTS: usize = 500;

/// Input seen by the window since the sources last drained it, stamped on
/// the shared timer.
#[derive(Debug, Default)]
struct InputQueue {
    keys: Vec<(String, f64)>,
    held_since: [Option<f64>; 3],
    /// Set by `clear_events`; presses still inside winit are dropped after
    /// the next pump.
    discard_pending: bool,
}

impl InputQueue {
    /// Runs after every pump, before the frame is drawn.
    fn settle(&mut self) {
        if self.discard_pending {
            self.keys.clear();
            self.discard_pending = false;
        }
    }
}

type SharedInput = Rc<RefCell<InputQueue>>;

/// Borderless fullscreen window. The event loop is pumped on every present,
/// so input is collected at frame rate while a scene runs.
pub struct WindowSurface {
    event_loop: EventLoop<()>,
    app: WindowApp,
    timer: HighPrecisionTimer,
}

struct WindowApp {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    canvas: Option<Pixmap>,
    refresh_rate: Option<f64>,
    background: Color,
    input: SharedInput,
    timer: HighPrecisionTimer,
    failure: Option<anyhow::Error>,
}

pub struct WindowKeyboard {
    input: SharedInput,
    timer: HighPrecisionTimer,
    origin: f64,
}

pub struct WindowPointer {
    input: SharedInput,
    timer: HighPrecisionTimer,
    origin: f64,
}

impl WindowSurface {
    /// Opens the window and returns it with the keyboard and pointer reading
    /// its events.
    pub fn open(timer: HighPrecisionTimer) -> Result<(Self, WindowKeyboard, WindowPointer)> {
        let event_loop = EventLoop::new()?;
        let input = SharedInput::default();
        let mut surface = Self {
            event_loop,
            app: WindowApp {
                window: None,
                pixels: None,
                canvas: None,
                refresh_rate: None,
                background: Color::BLACK,
                input: Rc::clone(&input),
                timer: timer.clone(),
                failure: None,
            },
            timer: timer.clone(),
        };

        for _ in 0..OPEN_ATTEMPTS {
            surface.pump(Some(Duration::from_millis(10)))?;
            if surface.app.window.is_some() {
                let keyboard = WindowKeyboard {
                    input: Rc::clone(&input),
                    timer: timer.clone(),
                    origin: 0.0,
                };
                let pointer = WindowPointer {
                    input,
                    timer,
                    origin: 0.0,
                };
                return Ok((surface, keyboard, pointer));
            }
        }
        bail!("window did not open")
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Result<()> {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.app) {
            bail!("window event loop exited with code {code}");
        }
        match self.app.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Surface for WindowSurface {
    fn present(&mut self, drawables: &[Box<dyn Drawable>]) -> Result<()> {
        self.pump(Some(Duration::ZERO))?;
        self.app.input.borrow_mut().settle();
        let started = self.timer.now();
        self.app.draw(drawables)?;
        let frame_time = self.timer.elapsed(started);
        self.timer.record_frame(frame_time);
        Ok(())
    }

    fn frame_period(&self) -> f64 {
        self.app
            .refresh_rate
            .map(|hz| 1.0 / hz)
            .or_else(|| self.timer.calibration_stats().frame_period())
            .unwrap_or(1.0 / 60.0)
    }
}

impl WindowApp {
    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow!("No monitor available"))?;

        self.refresh_rate = primary_monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let window_attributes = Window::default_attributes()
            .with_title("psyscene")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor.clone()))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();
        tracing::info!(
            width = size.width,
            height = size.height,
            scale_factor = window.scale_factor(),
            refresh_rate = ?self.refresh_rate,
            "display configured"
        );

        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface_texture)?);
        self.canvas = Pixmap::new(size.width, size.height);

        window.set_cursor_visible(false);
        self.window = Some(window);
        Ok(())
    }

    fn draw(&mut self, drawables: &[Box<dyn Drawable>]) -> Result<()> {
        let (Some(pixels), Some(canvas)) = (self.pixels.as_mut(), self.canvas.as_mut()) else {
            bail!("window is not open");
        };
        compose(canvas, self.background, drawables);
        let frame = pixels.frame_mut();
        if frame.len() != canvas.data().len() {
            bail!("frame buffer and canvas sizes differ");
        }
        frame.copy_from_slice(canvas.data());
        pixels.render()?;
        Ok(())
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if let Some(pixels) = &mut self.pixels {
            pixels.resize_surface(size.width, size.height)?;
            pixels.resize_buffer(size.width, size.height)?;
        }
        self.canvas = Pixmap::new(size.width, size.height);
        tracing::info!(width = size.width, height = size.height, "display resized");
        Ok(())
    }

    fn push_key(&self, name: String) {
        let now = self.timer.seconds();
        self.input.borrow_mut().keys.push((name, now));
    }
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                self.failure = Some(e.context("Failed to create window and surface"));
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            // Treated like the abort key so a running session can stop.
            WindowEvent::CloseRequested => self.push_key("escape".to_string()),
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && !event.repeat =>
            {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(name) = key_name(code) {
                        self.push_key(name);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = mouse_button(button) {
                    let now = self.timer.seconds();
                    let mut input = self.input.borrow_mut();
                    let slot = &mut input.held_since[button.index()];
                    *slot = match state {
                        ElementState::Pressed => slot.or(Some(now)),
                        ElementState::Released => None,
                    };
                }
            }
            WindowEvent::Resized(size) => {
                if let Err(e) = self.handle_resize(size) {
                    self.failure = Some(e);
                }
            }
            _ => {}
        }
    }
}

impl Keyboard for WindowKeyboard {
    fn clear_events(&mut self) {
        let mut input = self.input.borrow_mut();
        input.keys.clear();
        input.discard_pending = true;
    }

    fn reset_clock(&mut self) {
        self.origin = self.timer.seconds();
    }

    fn get_keys(&mut self) -> Vec<KeyPress> {
        self.input
            .borrow_mut()
            .keys
            .drain(..)
            .map(|(name, at)| KeyPress::new(name, at - self.origin))
            .collect()
    }
}

impl Pointer for WindowPointer {
    fn click_reset(&mut self) {
        self.origin = self.timer.seconds();
    }

    fn get_pressed(&mut self) -> ButtonState {
        let input = self.input.borrow();
        let mut state = ButtonState::default();
        for (i, held) in input.held_since.iter().enumerate() {
            if let Some(at) = held {
                state.pressed[i] = true;
                // Held since before the reset counts as pressed at the reset.
                state.times[i] = (at - self.origin).max(0.0);
            }
        }
        state
    }
}

fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

/// Listener token for a physical key: letters and digits by themselves,
/// keypad keys with a `num_` prefix, a few named keys.
fn key_name(code: KeyCode) -> Option<String> {
    let named = match code {
        KeyCode::Space => "space",
        KeyCode::Escape => "escape",
        KeyCode::Enter => "return",
        KeyCode::Tab => "tab",
        KeyCode::Backspace => "backspace",
        KeyCode::ArrowLeft => "left",
        KeyCode::ArrowRight => "right",
        KeyCode::ArrowUp => "up",
        KeyCode::ArrowDown => "down",
        _ => {
            let debug = format!("{code:?}");
            if let Some(letter) = debug.strip_prefix("Key") {
                return Some(letter.to_ascii_lowercase());
            }
            if let Some(digit) = debug.strip_prefix("Digit") {
                return Some(digit.to_string());
            }
            if let Some(pad) = debug.strip_prefix("Numpad") {
                return Some(format!("num_{}", pad.to_ascii_lowercase()));
            }
            return None;
        }
    };
    Some(named.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use psyscene_core::EventName;

    #[test]
    fn key_names_are_valid_listener_tokens() {
        for (code, expected) in [
            (KeyCode::Space, "space"),
            (KeyCode::KeyF, "f"),
            (KeyCode::Digit7, "7"),
            (KeyCode::Numpad3, "num_3"),
            (KeyCode::NumpadEnter, "num_enter"),
            (KeyCode::ArrowLeft, "left"),
        ] {
            let name = key_name(code).unwrap();
            assert_eq!(name, expected);
            assert!(EventName::parse(&format!("key_{name}")).is_ok());
        }
        assert_eq!(key_name(KeyCode::F1), None);
    }

    #[test]
    fn pointer_reports_press_time_since_reset() {
        let timer = HighPrecisionTimer::new();
        let input = SharedInput::default();
        let mut pointer = WindowPointer {
            input: Rc::clone(&input),
            timer: timer.clone(),
            origin: 0.0,
        };
        pointer.click_reset();
        let origin = pointer.origin;
        input.borrow_mut().held_since[MouseButton::Right.index()] = Some(origin + 0.25);

        let state = pointer.get_pressed();
        assert!(state.is_pressed(MouseButton::Right));
        assert!(!state.is_pressed(MouseButton::Left));
        assert!((state.time(MouseButton::Right) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn press_held_across_reset_reports_zero() {
        let input = SharedInput::default();
        let mut pointer = WindowPointer {
            input: Rc::clone(&input),
            timer: HighPrecisionTimer::new(),
            origin: 0.0,
        };
        pointer.click_reset();
        input.borrow_mut().held_since[MouseButton::Left.index()] = Some(pointer.origin - 1.0);

        let state = pointer.get_pressed();
        assert!(state.is_pressed(MouseButton::Left));
        assert_eq!(state.time(MouseButton::Left), 0.0);
    }

    #[test]
    fn presses_pumped_after_clear_are_dropped() {
        let timer = HighPrecisionTimer::new();
        let input = SharedInput::default();
        let mut keyboard = WindowKeyboard {
            input: Rc::clone(&input),
            timer,
            origin: 0.0,
        };
        input.borrow_mut().keys.push(("a".to_string(), 0.0));
        keyboard.clear_events();
        keyboard.reset_clock();

        // Arrives with the first pump of the new run.
        input.borrow_mut().keys.push(("space".to_string(), keyboard.origin));
        input.borrow_mut().settle();
        assert!(keyboard.get_keys().is_empty());

        // Later pumps are kept.
        input.borrow_mut().keys.push(("space".to_string(), keyboard.origin + 0.3));
        input.borrow_mut().settle();
        let keys = keyboard.get_keys();
        assert_eq!(keys.len(), 1);
        assert!((keys[0].rt - 0.3).abs() < 1e-9);
    }
}
