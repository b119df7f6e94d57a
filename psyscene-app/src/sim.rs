use psyscene_core::{ButtonState, KeyPress, Keyboard, Pointer};
use psyscene_timing::{Clock, HighPrecisionTimer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;

/// A participant that presses space once per keyboard reset, after a random
/// delay, unless it misses the trial.
pub struct SimulatedKeyboard {
    timer: HighPrecisionTimer,
    rng: StdRng,
    rt_range_ms: (u64, u64),
    miss_rate: f64,
    origin: f64,
    pending: Option<f64>,
}

impl SimulatedKeyboard {
    pub fn new(timer: HighPrecisionTimer, config: &SimulationConfig, seed: u64) -> Self {
        Self {
            timer,
            rng: StdRng::seed_from_u64(seed),
            rt_range_ms: config.rt_range_ms,
            miss_rate: config.miss_rate,
            origin: 0.0,
            pending: None,
        }
    }
}

impl Keyboard for SimulatedKeyboard {
    fn clear_events(&mut self) {
        self.pending = None;
    }

    fn reset_clock(&mut self) {
        self.origin = self.timer.seconds();
        self.pending = if self.rng.random_bool(self.miss_rate) {
            None
        } else {
            let (lo, hi) = self.rt_range_ms;
            Some(self.rng.random_range(lo..=hi) as f64 / 1000.0)
        };
    }

    fn get_keys(&mut self) -> Vec<KeyPress> {
        let elapsed = self.timer.seconds() - self.origin;
        match self.pending {
            Some(rt) if elapsed >= rt => {
                self.pending = None;
                vec![KeyPress::new("space", rt)]
            }
            _ => Vec::new(),
        }
    }
}

/// A pointer nobody touches.
#[derive(Debug, Default)]
pub struct IdlePointer;

impl Pointer for IdlePointer {
    fn click_reset(&mut self) {}

    fn get_pressed(&mut self) -> ButtonState {
        ButtonState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard(rt_range_ms: (u64, u64), miss_rate: f64) -> SimulatedKeyboard {
        let config = SimulationConfig {
            rt_range_ms,
            miss_rate,
            ..SimulationConfig::default()
        };
        SimulatedKeyboard::new(HighPrecisionTimer::new(), &config, 7)
    }

    #[test]
    fn answers_once_per_reset() {
        let mut kb = keyboard((0, 0), 0.0);
        kb.reset_clock();
        let keys = kb.get_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "space");
        assert_eq!(keys[0].rt, 0.0);
        assert!(kb.get_keys().is_empty());
    }

    #[test]
    fn waits_for_the_drawn_rt() {
        let mut kb = keyboard((60_000, 60_000), 0.0);
        kb.reset_clock();
        assert!(kb.get_keys().is_empty());
        kb.clear_events();
        assert!(kb.pending.is_none());
    }

    #[test]
    fn misses_never_answer() {
        let mut kb = keyboard((0, 0), 1.0);
        kb.reset_clock();
        assert!(kb.get_keys().is_empty());
    }
}
