use crate::emitter::Listener;
use crate::scene::SceneState;

/// Event names a scene closes on: one name or several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseOn(pub Vec<String>);

impl From<&str> for CloseOn {
    fn from(name: &str) -> Self {
        CloseOn(vec![name.to_string()])
    }
}

impl From<String> for CloseOn {
    fn from(name: String) -> Self {
        CloseOn(vec![name])
    }
}

impl From<Vec<&str>> for CloseOn {
    fn from(names: Vec<&str>) -> Self {
        CloseOn(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for CloseOn {
    fn from(names: Vec<String>) -> Self {
        CloseOn(names)
    }
}

impl<const N: usize> From<[&str; N]> for CloseOn {
    fn from(names: [&str; N]) -> Self {
        CloseOn(names.into_iter().map(str::to_string).collect())
    }
}

/// Declarative scene setup, applied with [`Scene::config`](crate::Scene::config).
///
/// ```ignore
/// scene.config(
///     SceneConfig::new()
///         .duration(1.0)
///         .close_on("key_escape")
///         .listener("on_key_space", |_| Ok(())),
/// )?;
/// ```
#[derive(Default)]
pub struct SceneConfig {
    duration: Option<f64>,
    close_on: Vec<String>,
    listeners: Vec<(String, Listener<SceneState>)>,
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds the scene stays up; `None` keeps it up until closed.
    pub fn duration(mut self, secs: impl Into<Option<f64>>) -> Self {
        self.duration = secs.into();
        self
    }

    pub fn close_on(mut self, names: impl Into<CloseOn>) -> Self {
        self.close_on.extend(names.into().0);
        self
    }

    /// `param` must be `on_<event name>`; it is checked when the config is
    /// applied.
    pub fn listener<F>(mut self, param: impl Into<String>, listener: F) -> Self
    where
        F: FnMut(&mut SceneState) -> anyhow::Result<()> + 'static,
    {
        self.listeners.push((param.into(), Box::new(listener)));
        self
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<f64>,
        Vec<String>,
        Vec<(String, Listener<SceneState>)>,
    ) {
        (self.duration, self.close_on, self.listeners)
    }
}

impl std::fmt::Debug for SceneConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneConfig")
            .field("duration", &self.duration)
            .field("close_on", &self.close_on)
            .field(
                "listeners",
                &self.listeners.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}
