use thiserror::Error;

/// Usage and configuration failures raised by scenes and their parts.
///
/// Every variant is raised at the call that breaks the rule; nothing in the
/// scene loop catches or retries them.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("`{0}` is already defined")]
    DuplicateListener(String),
    #[error("`{0}` is not a valid listener name")]
    InvalidEventName(String),
    #[error("`{0}` should start with `on_`")]
    InvalidListenerParam(String),
    #[error("`{0}` is not in the data collector")]
    MissingKey(String),
    #[error("`scene_setup` is not defined")]
    SetupMissing,
    #[error("scene has already been shown")]
    AlreadyShown,
    #[error("scene has already been closed")]
    AlreadyClosed,
    #[error("no font is loaded for text stimuli")]
    FontMissing,
    #[error("listener for `{event}` failed")]
    Listener {
        event: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("device failure")]
    Device(#[source] anyhow::Error),
}

impl SceneError {
    /// Wraps a listener failure, passing scene errors raised inside the
    /// listener (e.g. a `close` binding) through unchanged.
    pub fn from_listener(event: &str, source: anyhow::Error) -> Self {
        match source.downcast::<SceneError>() {
            Ok(inner) => inner,
            Err(source) => SceneError::Listener {
                event: event.to_string(),
                source,
            },
        }
    }
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
