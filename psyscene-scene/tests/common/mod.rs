#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use psyscene_core::{ButtonState, Drawable, KeyPress, Keyboard, MouseButton, Pointer, Surface};
use psyscene_scene::Context;
use psyscene_timing::{Clock, SimulatedClock};
use tiny_skia::Pixmap;

pub const FRAME: f64 = 1.0 / 60.0;

/// What the fake window saw, shared with the test body.
#[derive(Debug, Default)]
pub struct Presented {
    /// Drawable count of every presented frame.
    pub frames: Vec<usize>,
    /// Clock reading after every present.
    pub times: Vec<f64>,
}

/// A window that flips instantly and moves the clock one frame forward.
pub struct FakeSurface {
    clock: SimulatedClock,
    canvas: Pixmap,
    log: Rc<RefCell<Presented>>,
}

impl Surface for FakeSurface {
    fn present(&mut self, drawables: &[Box<dyn Drawable>]) -> anyhow::Result<()> {
        for drawable in drawables {
            drawable.draw(&mut self.canvas);
        }
        self.clock.advance(FRAME);
        let mut log = self.log.borrow_mut();
        log.frames.push(drawables.len());
        log.times.push(self.clock.seconds());
        Ok(())
    }

    fn frame_period(&self) -> f64 {
        FRAME
    }
}

/// Key presses scheduled in seconds after the keyboard clock reset.
pub struct ScriptedKeyboard {
    clock: SimulatedClock,
    origin: f64,
    script: Vec<(f64, String)>,
    /// Presses already buffered before the scene starts.
    stale: Vec<KeyPress>,
}

impl Keyboard for ScriptedKeyboard {
    fn clear_events(&mut self) {
        self.stale.clear();
    }

    fn reset_clock(&mut self) {
        self.origin = self.clock.seconds();
    }

    fn get_keys(&mut self) -> Vec<KeyPress> {
        let now = self.clock.seconds() - self.origin;
        let mut keys: Vec<KeyPress> = self.stale.drain(..).collect();
        let due = self.script.iter().take_while(|(t, _)| *t <= now).count();
        keys.extend(
            self.script
                .drain(..due)
                .map(|(t, name)| KeyPress::new(name, t)),
        );
        keys
    }
}

/// Buttons held over `[from, to)` seconds after the click reset.
pub struct ScriptedPointer {
    clock: SimulatedClock,
    origin: f64,
    holds: Vec<(MouseButton, f64, f64)>,
}

impl Pointer for ScriptedPointer {
    fn click_reset(&mut self) {
        self.origin = self.clock.seconds();
    }

    fn get_pressed(&mut self) -> ButtonState {
        let now = self.clock.seconds() - self.origin;
        let mut state = ButtonState::default();
        for &(button, from, to) in &self.holds {
            if from <= now && now < to {
                state.pressed[button.index()] = true;
                state.times[button.index()] = from;
            }
        }
        state
    }
}

pub struct Harness {
    pub clock: SimulatedClock,
    pub presented: Rc<RefCell<Presented>>,
    pub ctx: Context,
}

#[derive(Default)]
pub struct Script {
    pub keys: Vec<(f64, &'static str)>,
    pub stale_keys: Vec<&'static str>,
    pub holds: Vec<(MouseButton, f64, f64)>,
}

pub fn harness(script: Script) -> Harness {
    let clock = SimulatedClock::new();
    let presented = Rc::new(RefCell::new(Presented::default()));
    let surface = FakeSurface {
        clock: clock.clone(),
        canvas: Pixmap::new(64, 64).unwrap(),
        log: Rc::clone(&presented),
    };
    let keyboard = ScriptedKeyboard {
        clock: clock.clone(),
        origin: 0.0,
        script: script
            .keys
            .into_iter()
            .map(|(t, name)| (t, name.to_string()))
            .collect(),
        stale: script
            .stale_keys
            .into_iter()
            .map(|name| KeyPress::new(name, 0.0))
            .collect(),
    };
    let pointer = ScriptedPointer {
        clock: clock.clone(),
        origin: 0.0,
        holds: script.holds,
    };
    let ctx = Context::new(surface, keyboard, pointer, clock.clone());
    Harness {
        clock,
        presented,
        ctx,
    }
}

/// A drawable that paints nothing.
pub struct Dot;

impl Drawable for Dot {
    fn draw(&self, _canvas: &mut Pixmap) {}
}
