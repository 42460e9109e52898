//! The particle system: a fixed pool of particles sharing one flow field.
//!
//! [`ParticleSystem`] owns the pool, the current [`FlowConfig`], and the
//! single [`FlowGrid`]. The grid lives behind an `Arc` and is swapped whole
//! on every rebuild, so a snapshot taken before a rebuild stays consistent.
//! Every mutator replaces the config wholesale.

use crate::particle::{Outcome, Particle};
use crate::region::Region;
use flowfield_core::{FlowConfig, FlowError, FlowGrid, NoiseKind, Simulation, Toggle, Xorshift64};
use glam::DVec2;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Per-outcome tallies for one [`ParticleSystem::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub moved: usize,
    pub stalled: usize,
    pub fading: usize,
    pub expired: usize,
    pub escaped: usize,
}

impl StepStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Moved => self.moved += 1,
            Outcome::Stalled => self.stalled += 1,
            Outcome::Fading => self.fading += 1,
            Outcome::Expired => self.expired += 1,
            Outcome::Escaped => self.escaped += 1,
        }
    }

    /// Particles re-seeded during the step.
    pub fn resets(&self) -> usize {
        self.expired + self.escaped
    }
}

/// A pool of trailing particles advected through a shared flow field.
pub struct ParticleSystem {
    config: FlowConfig,
    grid: Arc<FlowGrid>,
    region: Region,
    particles: Vec<Particle>,
    rng: Xorshift64,
    since_regeneration: Duration,
    regenerations: u64,
    last_step: StepStats,
}

impl ParticleSystem {
    /// Builds the flow field and fills the pool with `config.particles`
    /// freshly reset particles.
    ///
    /// Returns `FlowError::InvalidParameter` if the config fails validation.
    /// An empty pool or a viewport smaller than one cell is valid.
    pub fn new(config: FlowConfig) -> Result<Self, FlowError> {
        config.validate()?;
        let grid = Arc::new(build_grid(&config));
        let region = region_for(&config);
        let mut rng = Xorshift64::new(config.seed);
        let particles = (0..config.particles)
            .map(|_| {
                let mut p = Particle::new(DVec2::ZERO, config.trail_length, config.speed);
                p.reset(&region, &mut rng);
                p
            })
            .collect();
        log::debug!(
            "initialized {} particles in {}x{} viewport",
            config.particles,
            config.width,
            config.height
        );
        Ok(Self {
            config,
            grid,
            region,
            particles,
            rng,
            since_regeneration: Duration::ZERO,
            regenerations: 0,
            last_step: StepStats::default(),
        })
    }

    /// Updates every particle exactly once, in pool order.
    pub fn step(&mut self) {
        let grid = &*self.grid;
        let mut stats = StepStats::default();
        for particle in &mut self.particles {
            stats.record(particle.update(grid, &self.region, &mut self.rng));
        }
        if stats.resets() > 0 {
            log::trace!(
                "step reset {} particles ({} expired, {} escaped)",
                stats.resets(),
                stats.expired,
                stats.escaped
            );
        }
        self.last_step = stats;
    }

    /// One frame: [`step`](Self::step), then the dynamic-mode clock.
    ///
    /// The clock is zeroed every time it reaches the cadence interval. If
    /// dynamic mode is on at that moment, the field is regenerated.
    pub fn tick(&mut self, dt: Duration) {
        self.step();
        self.since_regeneration = self.since_regeneration.saturating_add(dt);
        if self.since_regeneration >= self.interval() {
            self.since_regeneration = Duration::ZERO;
            if self.config.dynamic {
                self.regenerate_field();
            }
        }
    }

    /// Slides the gradient slice forward by one increment and swaps in the
    /// rebuilt field. Particles keep their state.
    ///
    /// Periodic fields have no time axis; returns `false` and does nothing.
    pub fn regenerate_field(&mut self) -> bool {
        if self.config.noise != NoiseKind::Gradient {
            return false;
        }
        let z_offset = self.config.z_offset + self.config.increment;
        self.config = self.config.with_z_offset(z_offset);
        self.grid = Arc::new(build_grid(&self.config));
        self.regenerations += 1;
        log::debug!("regenerated field at z_offset {z_offset}");
        true
    }

    /// Rebuilds the field and region from the current config and resets
    /// every particle in place.
    pub fn rebuild(&mut self) {
        self.grid = Arc::new(build_grid(&self.config));
        self.region = region_for(&self.config);
        for particle in &mut self.particles {
            particle.reset(&self.region, &mut self.rng);
        }
    }

    /// Adjusts the active strategy's resolution knob and rebuilds.
    ///
    /// Gradient: cell size by `delta * 20`, clamped to [8, 100].
    /// Periodic: zoom by `delta`, clamped to [0.0001, 30].
    pub fn set_zoom(&mut self, delta: f64) {
        self.config = self.config.with_zoom_delta(delta);
        log::debug!(
            "zoom adjusted: cell size {}, periodic zoom {}",
            self.config.cell_size,
            self.config.zoom
        );
        self.rebuild();
    }

    /// Adjusts the dynamic-mode cadence by `delta` seconds, clamped to
    /// [0.01, 3.0]. Does not rebuild.
    pub fn set_speed(&mut self, delta: f64) {
        self.config = self.config.with_interval_delta(delta);
    }

    /// Switches noise strategy and rebuilds. Each strategy keeps its own
    /// tunables across switches.
    pub fn set_noise_type(&mut self, noise: NoiseKind) {
        self.config = self.config.with_noise(noise);
        log::debug!("noise type set to {noise}");
        self.rebuild();
    }

    /// New viewport size; rebuilds the field and the active region.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.config = self.config.with_viewport(width, height);
        log::debug!("resized to {}x{}", self.config.width, self.config.height);
        self.rebuild();
    }

    pub fn toggle_grid(&mut self) {
        self.toggle(Toggle::Grid);
    }

    pub fn toggle_arrows(&mut self) {
        self.toggle(Toggle::Arrows);
    }

    pub fn toggle_noise(&mut self) {
        self.toggle(Toggle::Noise);
    }

    pub fn toggle_dynamic(&mut self) {
        self.toggle(Toggle::Dynamic);
    }

    fn toggle(&mut self, toggle: Toggle) {
        self.config = self.config.toggled(toggle);
    }

    fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.config.dynamic_interval)
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// The field particles are currently steered by.
    pub fn flow_grid(&self) -> &FlowGrid {
        &self.grid
    }

    /// A shared handle to the current field, unaffected by later rebuilds.
    pub fn flow_grid_snapshot(&self) -> Arc<FlowGrid> {
        Arc::clone(&self.grid)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Every particle's trail, in pool order.
    pub fn trails(&self) -> impl Iterator<Item = &VecDeque<DVec2>> + '_ {
        self.particles.iter().map(Particle::trail)
    }

    /// Number of dynamic regenerations so far.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Outcome tallies from the most recent step.
    pub fn last_step(&self) -> StepStats {
        self.last_step
    }
}

impl Simulation for ParticleSystem {
    fn step(&mut self) {
        ParticleSystem::step(self);
    }

    fn tick(&mut self, dt: Duration) {
        ParticleSystem::tick(self, dt);
    }

    fn flow_grid(&self) -> &FlowGrid {
        ParticleSystem::flow_grid(self)
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        FlowConfig::schema()
    }
}

fn build_grid(config: &FlowConfig) -> FlowGrid {
    FlowGrid::build(
        config.width,
        config.height,
        config.cell_size,
        &config.noise_params(),
    )
}

fn region_for(config: &FlowConfig) -> Region {
    Region::inset(config.width, config.height, config.margin)
}
