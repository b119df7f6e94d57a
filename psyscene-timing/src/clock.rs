use std::cell::Cell;
use std::rc::Rc;

/// Monotonic seconds since an arbitrary origin.
pub trait Clock {
    fn seconds(&self) -> f64;
}

/// A clock that only moves when told to. Clones share the same time, so a
/// fake display can advance it while input sources read it.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now: Rc<Cell<f64>>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }
}

impl Clock for SimulatedClock {
    fn seconds(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn seconds(&self) -> f64 {
        (**self).seconds()
    }
}
