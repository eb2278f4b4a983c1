/// Decorative particle field — ambient dots with randomized, looping drift.

use serde::{Deserialize, Serialize};

use crate::core::motion;
use crate::core::sampler::{range, RandomSource};

/// Tuning for particle generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Offsets are drawn from `[-drift, drift)`.
    pub drift: f32,
    pub min_cycle_secs: f32,
    /// Cycle length is `min_cycle_secs + U[0, cycle_spread_secs)`.
    pub cycle_spread_secs: f32,
    pub max_delay_secs: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 30,
            drift: 50.0,
            min_cycle_secs: 3.0,
            cycle_spread_secs: 4.0,
            max_delay_secs: 3.0,
        }
    }
}

/// One decorative dot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: usize,
    pub drift_x: f32,
    pub drift_y: f32,
    /// Origin as a percentage of the display width, `[0, 100)`.
    pub origin_x_pct: f32,
    /// Origin as a percentage of the display height, `[0, 100)`.
    pub origin_y_pct: f32,
    pub cycle_secs: f32,
    pub delay_secs: f32,
}

/// A particle's displacement and size at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleFrame {
    pub dx: f32,
    pub dy: f32,
    pub scale: f32,
}

impl Particle {
    /// Position and scale `t_secs` after mount.
    ///
    /// Rests at the origin with zero scale until the delay passes, then
    /// loops forever, running backwards on every odd iteration.
    pub fn sample(&self, t_secs: f32) -> ParticleFrame {
        let local = t_secs - self.delay_secs;
        if local < 0.0 || self.cycle_secs <= 0.0 {
            return ParticleFrame {
                dx: 0.0,
                dy: 0.0,
                scale: 0.0,
            };
        }

        let cycles = local / self.cycle_secs;
        let iteration = cycles.floor() as u64;
        let mut t = cycles.fract();
        if iteration % 2 == 1 {
            t = 1.0 - t;
        }

        let eased = motion::ease_in_out(t);
        ParticleFrame {
            dx: self.drift_x * eased,
            dy: self.drift_y * eased,
            scale: motion::ease_in_out(motion::pulse(t)),
        }
    }
}

/// Generate a fresh particle set.
pub fn mount<S: RandomSource + ?Sized>(config: &ParticleConfig, source: &mut S) -> Vec<Particle> {
    (0..config.count)
        .map(|id| Particle {
            id,
            drift_x: range(source, -config.drift as f64, config.drift as f64) as f32,
            drift_y: range(source, -config.drift as f64, config.drift as f64) as f32,
            origin_x_pct: range(source, 0.0, 100.0) as f32,
            origin_y_pct: range(source, 0.0, 100.0) as f32,
            cycle_secs: (config.min_cycle_secs as f64
                + range(source, 0.0, config.cycle_spread_secs as f64))
                as f32,
            delay_secs: range(source, 0.0, config.max_delay_secs as f64) as f32,
        })
        .collect()
}

/// A particle set that is randomized once, after construction, and then
/// held for its lifetime.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: ParticleConfig,
    particles: Option<Vec<Particle>>,
}

impl ParticleField {
    /// A pending field: nothing to draw until [`ParticleField::randomize`].
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            particles: None,
        }
    }

    /// Generate the particle set. No-op once the field is ready.
    pub fn randomize<S: RandomSource + ?Sized>(&mut self, source: &mut S) {
        if self.particles.is_none() {
            self.particles = Some(mount(&self.config, source));
        }
    }

    pub fn is_ready(&self) -> bool {
        self.particles.is_some()
    }

    /// The particle set, empty while pending.
    pub fn particles(&self) -> &[Particle] {
        self.particles.as_deref().unwrap_or(&[])
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }
}
