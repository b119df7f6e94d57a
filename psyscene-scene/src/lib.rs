pub mod config;
pub mod context;
pub mod data;
pub mod emitter;
pub mod experiment;
pub mod scene;

pub use config::{CloseOn, SceneConfig};
pub use context::{Context, Devices};
pub use data::{DataCollector, Datum};
pub use emitter::{EventEmitter, Listener};
pub use experiment::{ExperimentLog, Row};
pub use scene::{Scene, SceneState, Status};

pub use psyscene_core::{
    ButtonState, Drawable, Event, EventName, EventValue, KeyPress, Keyboard, MouseButton, Pointer,
    Result, SceneError, Stimuli, Surface,
};
