use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;

use ab_glyph::FontArc;
use psyscene_core::{Keyboard, Pointer, Result, SceneError, Stimuli, Surface};
use psyscene_render::{FixationCross, TextStim, TextStyle};
use psyscene_timing::Clock;

use crate::config::SceneConfig;
use crate::data::Datum;
use crate::experiment::ExperimentLog;
use crate::scene::Scene;

/// The window and input sources every scene of a context shares.
///
/// Scenes borrow these for the length of one `show`; running two scenes of
/// the same context at once panics.
pub struct Devices {
    pub window: RefCell<Box<dyn Surface>>,
    pub keyboard: RefCell<Box<dyn Keyboard>>,
    pub pointer: RefCell<Box<dyn Pointer>>,
    pub clock: Box<dyn Clock>,
}

/// Shared environment of an experiment: devices, the row log and the
/// factories for common scenes.
pub struct Context {
    devices: Devices,
    exp: RefCell<ExperimentLog>,
    font: Option<FontArc>,
    text_style: TextStyle,
}

impl Context {
    pub fn new(
        window: impl Surface + 'static,
        keyboard: impl Keyboard + 'static,
        pointer: impl Pointer + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            devices: Devices {
                window: RefCell::new(Box::new(window)),
                keyboard: RefCell::new(Box::new(keyboard)),
                pointer: RefCell::new(Box::new(pointer)),
                clock: Box::new(clock),
            },
            exp: RefCell::new(ExperimentLog::new()),
            font: None,
            text_style: TextStyle::default(),
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Style used by [`text`](Self::text).
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn font(&self) -> Option<&FontArc> {
        self.font.as_ref()
    }

    /// A scene with no setup yet.
    pub fn scene(&self) -> Scene<'_> {
        Scene::new(&self.devices)
    }

    /// A scene showing `content` in the default text style.
    pub fn text(&self, content: &str) -> Result<Scene<'_>> {
        self.text_styled(content, self.text_style)
    }

    pub fn text_styled(&self, content: &str, style: TextStyle) -> Result<Scene<'_>> {
        let font = self.font.as_ref().ok_or(SceneError::FontMissing)?;
        let stim = Rc::new(TextStim::new(font, content, style).map_err(SceneError::Device)?);
        self.scene()
            .setup(move |_: ()| Ok(Stimuli::one(Rc::clone(&stim))))
    }

    /// A fixation cross shown for `duration` seconds, or until closed.
    pub fn fixation(&self, duration: impl Into<Option<f64>>) -> Result<Scene<'_>> {
        let cross = Rc::new(FixationCross::standard().map_err(SceneError::Device)?);
        let mut scene = self
            .scene()
            .setup(move |_: ()| Ok(Stimuli::one(Rc::clone(&cross))))?;
        scene.config(SceneConfig::new().duration(duration))?;
        Ok(scene)
    }

    /// An empty screen shown for `duration` seconds, or until closed.
    pub fn blank(&self, duration: impl Into<Option<f64>>) -> Result<Scene<'_>> {
        let mut scene = self.scene().setup(|_: ()| Ok(Stimuli::none()))?;
        scene.config(SceneConfig::new().duration(duration))?;
        Ok(scene)
    }

    /// Records one row of fields and starts the next.
    pub fn add_row<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Datum>,
    {
        let mut exp = self.exp.borrow_mut();
        for (key, value) in fields {
            exp.add_data(key, value);
        }
        exp.next_entry();
    }

    pub fn experiment(&self) -> Ref<'_, ExperimentLog> {
        self.exp.borrow()
    }

    pub fn save_results(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.exp.borrow().save_json(path)
    }
}
