pub mod clock;
pub mod timer;

pub use clock::{Clock, SimulatedClock};
pub use timer::{CalibrationStats, HighPrecisionTimer, Timer};
