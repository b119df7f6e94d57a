pub mod compose;
pub mod fixation;
pub mod shape;
pub mod surface;
pub mod text;

pub use compose::{blit_centered, compose};
pub use fixation::FixationCross;
pub use shape::{ArrowDirection, ShapeKind, ShapeStim};
pub use surface::OffscreenSurface;
pub use text::{load_font, render_text_pixmap, TextStim, TextStyle};
