pub mod device;
pub mod error;
pub mod event;
pub mod name;
pub mod stimulus;

pub use device::{ButtonState, Keyboard, Pointer, Surface};
pub use error::{Result, SceneError};
pub use event::{Event, EventValue, KeyPress, MouseButton};
pub use name::EventName;
pub use stimulus::{Drawable, Stimuli};
