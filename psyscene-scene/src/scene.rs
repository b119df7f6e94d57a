use psyscene_core::{Drawable, Event, MouseButton, Result, SceneError, Stimuli};

use crate::config::SceneConfig;
use crate::context::Devices;
use crate::data::{DataCollector, Datum, EVENTS, SHOW_TIME};
use crate::emitter::EventEmitter;

const SCENE_SETUP: &str = "scene_setup";
const SCENE_DRAWN: &str = "scene_drawn";
const SCENE_FRAME: &str = "scene_frame";
const KEY_ANY: &str = "key_any";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
}

/// The part of a scene its listeners may touch.
pub struct SceneState {
    status: Status,
    duration: Option<f64>,
    drawables: Vec<Box<dyn Drawable>>,
    data: DataCollector,
}

impl SceneState {
    fn new() -> Self {
        Self {
            status: Status::Idle,
            duration: None,
            drawables: Vec::new(),
            data: DataCollector::new(),
        }
    }

    /// Ends the current run. Fails if the scene is not running.
    pub fn close(&mut self) -> Result<()> {
        if self.status != Status::Running {
            return Err(SceneError::AlreadyClosed);
        }
        self.status = Status::Idle;
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration;
    }

    pub fn drawables(&self) -> &[Box<dyn Drawable>] {
        &self.drawables
    }

    /// Drawables painted on the next redraw.
    pub fn drawables_mut(&mut self) -> &mut Vec<Box<dyn Drawable>> {
        &mut self.drawables
    }

    pub fn set_drawables(&mut self, stimuli: impl Into<Stimuli>) {
        self.drawables = stimuli.into().into_vec();
    }

    pub fn data(&self) -> &DataCollector {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataCollector {
        &mut self.data
    }

    pub fn get(&self, key: &str) -> Result<&Datum> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Datum>) -> &mut Self {
        self.data.set(key, value);
        self
    }
}

impl std::fmt::Debug for SceneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneState")
            .field("status", &self.status)
            .field("duration", &self.duration)
            .field("drawables", &self.drawables.len())
            .field("data", &self.data)
            .finish()
    }
}

type SetupFn<A> = Box<dyn FnMut(A) -> anyhow::Result<Stimuli>>;

/// One timed presentation: a setup producing drawables, a frame loop that
/// redraws them and dispatches input to listeners, and the data the run
/// collected.
///
/// `A` is the argument [`show`](Scene::show) passes to the setup.
pub struct Scene<'ctx, A = ()> {
    devices: &'ctx Devices,
    emitter: EventEmitter<SceneState>,
    setup: Option<SetupFn<A>>,
    state: SceneState,
    frames: u64,
}

impl<'ctx, A> Scene<'ctx, A> {
    pub(crate) fn new(devices: &'ctx Devices) -> Self {
        Self {
            devices,
            emitter: EventEmitter::new(),
            setup: None,
            state: SceneState::new(),
            frames: 0,
        }
    }

    /// Registers `setup` as this scene's `scene_setup`; `show` then takes
    /// the setup's argument.
    pub fn setup<B, S, F>(self, mut setup: F) -> Result<Scene<'ctx, B>>
    where
        F: FnMut(B) -> anyhow::Result<S> + 'static,
        S: Into<Stimuli>,
    {
        if self.setup.is_some() || self.emitter.contains(SCENE_SETUP) {
            return Err(SceneError::DuplicateListener(SCENE_SETUP.to_string()));
        }
        Ok(Scene {
            devices: self.devices,
            emitter: self.emitter,
            setup: Some(Box::new(move |args: B| -> anyhow::Result<Stimuli> {
                setup(args).map(Into::into)
            })),
            state: self.state,
            frames: self.frames,
        })
    }

    pub fn on<F>(&mut self, name: &str, listener: F) -> Result<&mut Self>
    where
        F: FnMut(&mut SceneState) -> anyhow::Result<()> + 'static,
    {
        if name == SCENE_SETUP && self.setup.is_some() {
            return Err(SceneError::DuplicateListener(name.to_string()));
        }
        self.emitter.on(name, listener)?;
        Ok(self)
    }

    pub fn off(&mut self, name: &str) -> &mut Self {
        if name == SCENE_SETUP {
            self.setup = None;
        }
        self.emitter.off(name);
        self
    }

    pub fn emit(&mut self, name: &str) -> Result<&mut Self> {
        self.emitter.emit(name, &mut self.state)?;
        Ok(self)
    }

    /// Applies a [`SceneConfig`]: overwrites the duration, binds `close`
    /// to every `close_on` event and registers each `on_<event>` listener.
    pub fn config(&mut self, config: SceneConfig) -> Result<&mut Self> {
        let (duration, close_on, listeners) = config.into_parts();
        self.state.duration = duration;
        for name in close_on {
            self.on(&name, |state| {
                state.close()?;
                Ok(())
            })?;
        }
        for (param, listener) in listeners {
            let Some(name) = param.strip_prefix("on_") else {
                return Err(SceneError::InvalidListenerParam(param.clone()));
            };
            self.on(name, listener)?;
        }
        Ok(self)
    }

    /// Runs the scene until it is closed, by a listener or by its duration.
    ///
    /// Listener and device failures abort the run and leave the scene
    /// `Running`; call [`close`](Scene::close) before showing it again.
    pub fn show(&mut self, args: A) -> Result<&mut Self> {
        if self.state.is_running() {
            return Err(SceneError::AlreadyShown);
        }
        if self.setup.is_none() && !self.emitter.contains(SCENE_SETUP) {
            return Err(SceneError::SetupMissing);
        }
        self.state.status = Status::Running;
        self.state.data.clear();
        self.state.drawables.clear();
        self.frames = 0;
        self.devices.keyboard.borrow_mut().clear_events();

        match self.setup.as_mut() {
            Some(setup) => {
                let stimuli = setup(args).map_err(|e| SceneError::from_listener(SCENE_SETUP, e))?;
                self.state.drawables = stimuli.into_vec();
            }
            None => {
                self.emitter.emit(SCENE_SETUP, &mut self.state)?;
            }
        }

        // Zero point for every rt of this run.
        self.devices.keyboard.borrow_mut().reset_clock();
        self.devices.pointer.borrow_mut().click_reset();

        self.present()?;
        let show_time = self.devices.clock.seconds();
        self.state.data.set(SHOW_TIME, show_time);
        self.state.data.set(EVENTS, Vec::<Event>::new());
        tracing::debug!(
            show_time,
            drawables = self.state.drawables.len(),
            duration = ?self.state.duration,
            "scene shown"
        );
        self.emit(SCENE_DRAWN)?;

        while self.state.is_running() {
            self.emit(SCENE_FRAME)?;
            self.present()?;
            self.frames += 1;

            let buttons = self.devices.pointer.borrow_mut().get_pressed();
            let keys = self.devices.keyboard.borrow_mut().get_keys();

            for key in keys {
                let name = format!("key_{}", key.name);
                tracing::trace!(key = %key.name, rt = key.rt, "key event");
                self.state.data.push_event(Event::key(key));
                self.emit(&name)?;
                self.emit(KEY_ANY)?;
            }
            for button in MouseButton::ALL {
                if buttons.is_pressed(button) {
                    let rt = buttons.time(button);
                    tracing::trace!(button = button.name(), rt, "mouse event");
                    self.state.data.push_event(Event::button(button, rt));
                    self.emit(&format!("mouse_{}", button.name()))?;
                }
            }

            if let Some(duration) = self.state.duration {
                let elapsed = self.devices.clock.seconds() - show_time;
                let tolerance = self.devices.window.borrow().frame_period() / 2.0;
                if self.state.is_running() && elapsed >= duration - tolerance {
                    tracing::trace!(elapsed, duration, "duration reached");
                    self.state.close()?;
                }
            }
        }

        tracing::debug!(
            frames = self.frames,
            elapsed = self.devices.clock.seconds() - show_time,
            "scene closed"
        );
        Ok(self)
    }

    pub fn close(&mut self) -> Result<&mut Self> {
        self.state.close()?;
        Ok(self)
    }

    fn present(&self) -> Result<()> {
        self.devices
            .window
            .borrow_mut()
            .present(&self.state.drawables)
            .map_err(SceneError::Device)
    }

    pub fn get(&self, key: &str) -> Result<&Datum> {
        self.state.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Datum>) -> &mut Self {
        self.state.data.set(key, value);
        self
    }

    pub fn data(&self) -> &DataCollector {
        &self.state.data
    }

    /// Captured input events of the last run.
    pub fn events(&self) -> Result<&[Event]> {
        self.state.data.get_events(EVENTS)
    }

    /// Seconds on the context clock at which the last run first appeared.
    pub fn show_time(&self) -> Result<f64> {
        self.state.data.get_number(SHOW_TIME)
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn is_shown(&self) -> bool {
        self.state.is_running()
    }

    pub fn duration(&self) -> Option<f64> {
        self.state.duration
    }

    /// Redraws performed by the frame loop of the last run.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn has_listener(&self, name: &str) -> bool {
        self.emitter.contains(name) || (name == SCENE_SETUP && self.setup.is_some())
    }
}

impl<A> std::fmt::Debug for Scene<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("state", &self.state)
            .field("listeners", &self.emitter)
            .field("setup", &self.setup.is_some())
            .field("frames", &self.frames)
            .finish()
    }
}
