use anyhow::Result;
use psyscene_core::{Drawable, Stimuli};
use psyscene_render::{ArrowDirection, ShapeKind, ShapeStim, TextStim, TextStyle};
use psyscene_scene::{Context, Datum, Row, Scene, SceneConfig, SceneState};
use rand::Rng;

use crate::config::SessionConfig;

const ABORT_KEY: &str = "key_escape";

/// Aggregate of the rows a session recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub trials: usize,
    pub responses: usize,
    pub aborted: bool,
    pub mean_rt_ms: Option<f64>,
    pub min_rt_ms: Option<f64>,
    pub max_rt_ms: Option<f64>,
}

impl Summary {
    pub fn from_rows(rows: &[Row], aborted: bool) -> Self {
        let times: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get("rt").and_then(Datum::as_number))
            .map(|rt| rt * 1000.0)
            .collect();
        let mean = (!times.is_empty()).then(|| times.iter().sum::<f64>() / times.len() as f64);
        let min = times.iter().copied().reduce(f64::min);
        let max = times.iter().copied().reduce(f64::max);
        Self {
            trials: rows.len(),
            responses: times.len(),
            aborted,
            mean_rt_ms: mean,
            min_rt_ms: min,
            max_rt_ms: max,
        }
    }

    pub fn response_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.responses as f64 / self.trials as f64 * 100.0
        }
    }

    pub fn log(&self) {
        tracing::info!(
            trials = self.trials,
            aborted = self.aborted,
            "response rate {:.1}%",
            self.response_rate()
        );
        if let (Some(mean), Some(min), Some(max)) = (self.mean_rt_ms, self.min_rt_ms, self.max_rt_ms)
        {
            tracing::info!("reaction times: mean {mean:.3} ms, min {min:.3} ms, max {max:.3} ms");
        }
    }
}

/// Runs the reaction-time session: fixation, stimulus, feedback per trial,
/// one row per completed trial. `ESC` ends the session after the current
/// scene.
pub fn run<R: Rng>(ctx: &Context, config: &SessionConfig, rng: &mut R) -> Result<Summary> {
    let mut fixation = ctx.fixation(None)?;
    fixation.config(SceneConfig::new().close_on(ABORT_KEY))?;

    let mut stimulus = ctx
        .scene()
        .setup(|stim: Box<dyn Drawable>| Ok(Stimuli::Single(stim)))?;
    stimulus.config(
        SceneConfig::new()
            .duration(config.response_window())
            .listener("on_key_space", respond)
            .listener("on_key_escape", close_if_running),
    )?;

    let mut aborted = false;
    for trial in 1..=config.trials {
        let (lo, hi) = config.fixation_range_ms;
        let fixation_secs = rng.random_range(lo..=hi) as f64 / 1000.0;
        fixation.config(SceneConfig::new().duration(fixation_secs))?;
        fixation.show(())?;
        if pressed(&fixation, "escape") {
            aborted = true;
            break;
        }

        let (label, stim) = make_stimulus(ctx, rng)?;
        stimulus.show(stim)?;
        if pressed(&stimulus, "escape") {
            aborted = true;
            break;
        }
        let rt = stimulus.data().get_number("rt").ok();
        tracing::debug!(trial, stimulus = label, ?rt, "trial finished");

        ctx.add_row([
            ("trial", Datum::from(trial)),
            ("stimulus", Datum::from(label)),
            ("rt", Datum::from(rt)),
            ("responded", Datum::from(rt.is_some())),
        ]);

        let message = match rt {
            Some(rt) => format!("{:.0} ms", rt * 1000.0),
            None => "Too slow".to_string(),
        };
        let mut feedback = feedback_scene(ctx, &message)?;
        feedback.config(
            SceneConfig::new()
                .duration(config.feedback_duration())
                .close_on(ABORT_KEY),
        )?;
        feedback.show(())?;
        if pressed(&feedback, "escape") {
            aborted = true;
            break;
        }
    }

    if aborted {
        tracing::info!("session aborted");
    }
    Ok(Summary::from_rows(ctx.experiment().rows(), aborted))
}

fn respond(state: &mut SceneState) -> Result<()> {
    if !state.is_running() {
        return Ok(());
    }
    let rt = state.data().get_events("events")?.last().map(|e| e.rt);
    state.set("rt", rt).close()?;
    Ok(())
}

fn close_if_running(state: &mut SceneState) -> Result<()> {
    if state.is_running() {
        state.close()?;
    }
    Ok(())
}

fn pressed<A>(scene: &Scene<'_, A>, key: &str) -> bool {
    scene
        .events()
        .map(|events| events.iter().any(|e| e.label() == key))
        .unwrap_or(false)
}

fn feedback_scene<'ctx>(ctx: &'ctx Context, message: &str) -> Result<Scene<'ctx>> {
    Ok(match ctx.font() {
        Some(_) => ctx.text(message)?,
        None => ctx.blank(None)?,
    })
}

fn make_stimulus<R: Rng>(ctx: &Context, rng: &mut R) -> Result<(&'static str, Box<dyn Drawable>)> {
    if let Some(font) = ctx.font() {
        if rng.random_bool(0.25) {
            let go = TextStim::new(font, "GO", TextStyle::default())?;
            return Ok(("text", Box::new(go)));
        }
    }
    let kind = match rng.random_range(0..3) {
        0 => ShapeKind::Circle {
            radius: rng.random_range(20.0..50.0),
            color: [255, 0, 0, 255],
        },
        1 => ShapeKind::Rectangle {
            width: rng.random_range(40.0..80.0),
            height: rng.random_range(40.0..80.0),
            color: [0, 255, 0, 255],
        },
        _ => ShapeKind::Arrow {
            direction: match rng.random_range(0..4) {
                0 => ArrowDirection::Up,
                1 => ArrowDirection::Down,
                2 => ArrowDirection::Left,
                _ => ArrowDirection::Right,
            },
            size: rng.random_range(30.0..60.0),
            color: [0, 0, 255, 255],
        },
    };
    let label = kind.label();
    Ok((label, Box::new(ShapeStim::new(kind)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::sim::{IdlePointer, SimulatedKeyboard};
    use psyscene_render::OffscreenSurface;
    use psyscene_timing::HighPrecisionTimer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn simulated(miss_rate: f64) -> (Context, SessionConfig) {
        let config = SessionConfig {
            trials: 3,
            fixation_range_ms: (5, 10),
            response_window_ms: 60,
            feedback_duration_ms: 5,
            simulation: SimulationConfig {
                width: 64,
                height: 64,
                refresh_rate: 500.0,
                rt_range_ms: (10, 20),
                miss_rate,
            },
            ..SessionConfig::default()
        };
        let timer = HighPrecisionTimer::new();
        let surface = OffscreenSurface::new(64, 64, 500.0, timer.clone()).unwrap();
        let keyboard = SimulatedKeyboard::new(timer.clone(), &config.simulation, 1);
        (Context::new(surface, keyboard, IdlePointer, timer), config)
    }

    #[test]
    fn every_trial_writes_a_row() {
        let (ctx, config) = simulated(0.0);
        let summary = run(&ctx, &config, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(summary.trials, 3);
        assert_eq!(summary.responses, 3);
        assert!(!summary.aborted);
        let rows = ctx.experiment();
        for (i, row) in rows.rows().iter().enumerate() {
            assert_eq!(row.get("trial"), Some(&Datum::Integer((i + 1) as i64)));
            assert_eq!(row.get("responded"), Some(&Datum::Bool(true)));
            let rt = row.get("rt").and_then(Datum::as_number).unwrap();
            assert!((0.010..=0.020).contains(&rt), "rt {rt}");
        }
    }

    #[test]
    fn missed_trials_record_null_rt() {
        let (ctx, config) = simulated(1.0);
        let summary = run(&ctx, &config, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(summary.responses, 0);
        assert_eq!(summary.mean_rt_ms, None);
        assert!(ctx.experiment().rows().iter().all(|row| row.get("rt") == Some(&Datum::Null)));
    }

    #[test]
    fn summary_over_mixed_rows() {
        let mut log = psyscene_scene::ExperimentLog::new();
        for rt in [Some(0.2), None, Some(0.4)] {
            log.add_data("rt", rt);
            log.next_entry();
        }
        let summary = Summary::from_rows(log.rows(), false);
        assert_eq!(summary.responses, 2);
        assert!((summary.response_rate() - 66.666).abs() < 0.01);
        assert!((summary.mean_rt_ms.unwrap() - 300.0).abs() < 1e-9);
        assert!((summary.min_rt_ms.unwrap() - 200.0).abs() < 1e-9);
        assert!((summary.max_rt_ms.unwrap() - 400.0).abs() < 1e-9);
    }
}
