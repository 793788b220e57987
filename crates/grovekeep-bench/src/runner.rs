use std::time::Instant;

use glam::Vec2;
use grovekeep_sim::{Intents, Session, SimConfig};
use grovekeep_world::WorldMap;

/// Simulated seconds per tick.
const TICK_DT: f32 = 1.0 / 60.0;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub tick_count: u32,
    pub peak_entities: usize,
    pub peak_streamed: usize,
    pub final_enemies: usize,
    pub allocated_chunks: usize,
    pub timings: TimingSeries,
}

/// Drives a [`Session`] headlessly and times each frame.
pub struct BenchmarkRunner {
    tick_count: u32,
    config: SimConfig,
    seed: u64,
}

impl BenchmarkRunner {
    pub fn new(tick_count: u32, config: SimConfig, seed: u64) -> Self {
        Self {
            tick_count,
            config,
            seed,
        }
    }

    /// Scripted input: walk in a slow circle, swinging every half second.
    fn intents_for(tick: u32) -> Intents {
        let angle = tick as f32 * TICK_DT * 0.5;
        Intents {
            move_dir: Vec2::from_angle(angle),
            attack: tick % 30 == 0,
        }
    }

    pub fn run_map(&self, name: &str, map: WorldMap) -> BenchmarkResult {
        log::info!("Running scene '{}' ({}x{} tiles)...", name, map.width(), map.height());

        let mut session = match Session::new(map, self.config.clone(), self.seed) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Scene '{name}' could not start: {e}");
                return BenchmarkResult {
                    scene_name: name.to_string(),
                    tick_count: 0,
                    peak_entities: 0,
                    peak_streamed: 0,
                    final_enemies: 0,
                    allocated_chunks: 0,
                    timings: compute_timings(&[]),
                };
            }
        };

        let mut frame_times = Vec::with_capacity(self.tick_count as usize);
        let mut peak_entities = 0;
        let mut peak_streamed = 0;

        for tick in 0..self.tick_count {
            session.set_intents(Self::intents_for(tick));

            let frame_start = Instant::now();
            session.update(TICK_DT);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);

            peak_entities = peak_entities.max(session.world().entity_count());
            peak_streamed = peak_streamed.max(session.streamed_count());
            if session.game_state() == grovekeep_sim::GameState::GameOver {
                log::info!("  Player died at tick {tick}, restarting");
                session.reset();
            }
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.3}ms, p95={:.3}ms, peak entities={}",
            timings.mean_ms,
            timings.p95_ms,
            peak_entities
        );

        BenchmarkResult {
            scene_name: name.to_string(),
            tick_count: self.tick_count,
            peak_entities,
            peak_streamed,
            final_enemies: session.enemy_count(),
            allocated_chunks: session.map().allocated_chunks(),
            timings,
        }
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
