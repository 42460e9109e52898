//! Immutable configuration for a flow-field run.
//!
//! A [`FlowConfig`] captures every tunable: viewport, pool size, noise
//! strategy and its parameters, trail and motion settings, dynamic-mode
//! cadence and overlay toggles. Mutations never happen in place; each
//! `with_*` method returns a new value, so a system swaps its whole
//! configuration at once.

use crate::error::FlowError;
use crate::noise::{NoiseKind, NoiseParams};
use crate::params::{param_bool, param_f64, param_f64_clamped, param_string, param_u64, param_usize};
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;
pub const DEFAULT_PARTICLES: usize = 1000;
pub const DEFAULT_CELL_SIZE: f64 = 20.0;
pub const DEFAULT_ZOOM: f64 = 0.01;
pub const DEFAULT_CURVE: f64 = 1.0;
pub const DEFAULT_Z_OFFSET: f64 = 0.01;
pub const DEFAULT_INCREMENT: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SPEED: f64 = 3.0;
pub const DEFAULT_TRAIL_LENGTH: usize = 300;
pub const DEFAULT_MARGIN: f64 = 50.0;
/// Seconds between automatic regenerations in dynamic mode.
pub const DEFAULT_DYNAMIC_INTERVAL: f64 = 0.5;

/// Cell-size range for gradient fields.
pub const CELL_SIZE_RANGE: (f64, f64) = (8.0, 100.0);
/// Zoom range for periodic fields.
pub const ZOOM_RANGE: (f64, f64) = (0.0001, 30.0);
/// Dynamic-mode cadence range, in seconds.
pub const DYNAMIC_INTERVAL_RANGE: (f64, f64) = (0.01, 3.0);
/// Gradient cell size changes by `delta * ZOOM_CELL_FACTOR` per zoom step.
pub const ZOOM_CELL_FACTOR: f64 = 20.0;
/// Largest accepted viewport edge, in world units.
pub const MAX_VIEWPORT_EXTENT: f64 = 16_384.0;
/// Largest accepted trail capacity.
pub const MAX_TRAIL_LENGTH: usize = 10_000;

/// A boolean switch flipped by [`FlowConfig::toggled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Grid-line overlay.
    Grid,
    /// Per-cell direction arrows.
    Arrows,
    /// Greyscale noise intensity fill.
    Noise,
    /// Periodic field regeneration.
    Dynamic,
}

/// Full parameter set for a flow-field system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub width: f64,
    pub height: f64,
    /// Size of the particle pool.
    pub particles: usize,
    /// World units per grid cell. The resolution knob for gradient noise.
    pub cell_size: f64,
    pub noise: NoiseKind,
    /// Periodic frequency. The resolution knob for periodic noise.
    pub zoom: f64,
    /// Periodic amplitude.
    pub curve: f64,
    /// Depth of the gradient noise slice.
    pub z_offset: f64,
    /// Amount added to `z_offset` on each dynamic regeneration.
    pub increment: f64,
    /// Run seed: drives particle placement and the gradient noise seed.
    pub seed: u64,
    /// Distance a particle travels per tick.
    pub speed: f64,
    /// Trail capacity `L`.
    pub trail_length: usize,
    /// Inset of the active region from each viewport edge.
    pub margin: f64,
    pub dynamic: bool,
    pub dynamic_interval: f64,
    pub show_grid: bool,
    pub show_arrows: bool,
    pub show_noise: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            particles: DEFAULT_PARTICLES,
            cell_size: DEFAULT_CELL_SIZE,
            noise: NoiseKind::default(),
            zoom: DEFAULT_ZOOM,
            curve: DEFAULT_CURVE,
            z_offset: DEFAULT_Z_OFFSET,
            increment: DEFAULT_INCREMENT,
            seed: DEFAULT_SEED,
            speed: DEFAULT_SPEED,
            trail_length: DEFAULT_TRAIL_LENGTH,
            margin: DEFAULT_MARGIN,
            dynamic: false,
            dynamic_interval: DEFAULT_DYNAMIC_INTERVAL,
            show_grid: false,
            show_arrows: true,
            show_noise: false,
        }
    }
}

impl FlowConfig {
    /// Reads a config from a JSON object, falling back to defaults for
    /// missing keys and clamping tunables into their ranges.
    ///
    /// Fails with `UnknownNoise` for an unrecognized `noise` name, or with
    /// `InvalidParameter` if the result does not pass [`FlowConfig::validate`].
    pub fn from_json(params: &Value) -> Result<Self, FlowError> {
        let d = Self::default();
        let noise = param_string(params, "noise", d.noise.name()).parse()?;
        let config = Self {
            width: param_f64(params, "width", d.width),
            height: param_f64(params, "height", d.height),
            particles: param_usize(params, "particles", d.particles),
            cell_size: param_f64_clamped(
                params,
                "cell_size",
                d.cell_size,
                CELL_SIZE_RANGE.0,
                CELL_SIZE_RANGE.1,
            ),
            noise,
            zoom: param_f64_clamped(params, "zoom", d.zoom, ZOOM_RANGE.0, ZOOM_RANGE.1),
            curve: param_f64(params, "curve", d.curve),
            z_offset: param_f64(params, "z_offset", d.z_offset),
            increment: param_f64(params, "increment", d.increment),
            seed: param_u64(params, "seed", d.seed),
            speed: param_f64(params, "speed", d.speed),
            trail_length: param_usize(params, "trail_length", d.trail_length),
            margin: param_f64(params, "margin", d.margin),
            dynamic: param_bool(params, "dynamic", d.dynamic),
            dynamic_interval: param_f64_clamped(
                params,
                "dynamic_interval",
                d.dynamic_interval,
                DYNAMIC_INTERVAL_RANGE.0,
                DYNAMIC_INTERVAL_RANGE.1,
            ),
            show_grid: param_bool(params, "show_grid", d.show_grid),
            show_arrows: param_bool(params, "show_arrows", d.show_arrows),
            show_noise: param_bool(params, "show_noise", d.show_noise),
        };
        config.validate()?;
        Ok(config)
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Rejects values that clamping cannot repair.
    ///
    /// Zero-sized viewports and empty pools are valid and produce empty
    /// output; non-finite numbers and non-positive scales are not. Viewport
    /// edges above [`MAX_VIEWPORT_EXTENT`], cells smaller than the bottom of
    /// [`CELL_SIZE_RANGE`] and trails longer than [`MAX_TRAIL_LENGTH`] are
    /// rejected so the grid and trail buffers stay bounded.
    pub fn validate(&self) -> Result<(), FlowError> {
        let non_negative = [
            ("width", self.width),
            ("height", self.height),
            ("speed", self.speed),
            ("margin", self.margin),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, value));
            }
        }
        let positive = [
            ("cell_size", self.cell_size),
            ("zoom", self.zoom),
            ("dynamic_interval", self.dynamic_interval),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name, value));
            }
        }
        let finite = [
            ("curve", self.curve),
            ("z_offset", self.z_offset),
            ("increment", self.increment),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(name, value));
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value > MAX_VIEWPORT_EXTENT {
                return Err(invalid(name, value));
            }
        }
        // Bounds the grid at (16384 / 8)^2 cells for every reachable viewport.
        if self.cell_size < CELL_SIZE_RANGE.0 {
            return Err(invalid("cell_size", self.cell_size));
        }
        if self.trail_length == 0 || self.trail_length > MAX_TRAIL_LENGTH {
            return Err(invalid("trail_length", self.trail_length as f64));
        }
        Ok(())
    }

    /// Perlin seed derived from the run seed.
    pub fn noise_seed(&self) -> u32 {
        Xorshift64::new(self.seed).next_u32()
    }

    /// Noise parameters for the active strategy.
    pub fn noise_params(&self) -> NoiseParams {
        match self.noise {
            NoiseKind::Periodic => NoiseParams::Periodic {
                zoom: self.zoom,
                curve: self.curve,
            },
            NoiseKind::Gradient => NoiseParams::Gradient {
                z_offset: self.z_offset,
                increment: self.increment,
                seed: self.noise_seed(),
            },
        }
    }

    /// Ticks a particle lives: twice the trail capacity, enough to fill
    /// the trail and then drain it.
    pub fn max_lifetime(&self) -> i64 {
        i64::try_from(self.trail_length)
            .unwrap_or(i64::MAX)
            .saturating_mul(2)
    }

    /// Adjusts the active strategy's resolution knob.
    ///
    /// Gradient fields move `cell_size` by `delta * 20` within
    /// [`CELL_SIZE_RANGE`]; periodic fields move `zoom` by `delta` within
    /// [`ZOOM_RANGE`] and keep the cell size.
    pub fn with_zoom_delta(&self, delta: f64) -> Self {
        let mut next = self.clone();
        match self.noise {
            NoiseKind::Gradient => {
                next.cell_size = clamp_or_keep(
                    self.cell_size + delta * ZOOM_CELL_FACTOR,
                    self.cell_size,
                    CELL_SIZE_RANGE,
                );
            }
            NoiseKind::Periodic => {
                next.zoom = clamp_or_keep(self.zoom + delta, self.zoom, ZOOM_RANGE);
            }
        }
        next
    }

    /// Adjusts the dynamic-mode cadence (seconds) within [`DYNAMIC_INTERVAL_RANGE`].
    pub fn with_interval_delta(&self, delta: f64) -> Self {
        Self {
            dynamic_interval: clamp_or_keep(
                self.dynamic_interval + delta,
                self.dynamic_interval,
                DYNAMIC_INTERVAL_RANGE,
            ),
            ..self.clone()
        }
    }

    pub fn with_noise(&self, noise: NoiseKind) -> Self {
        Self {
            noise,
            ..self.clone()
        }
    }

    /// New viewport size. Negative or non-finite extents become zero and
    /// each edge is capped at [`MAX_VIEWPORT_EXTENT`].
    pub fn with_viewport(&self, width: f64, height: f64) -> Self {
        Self {
            width: viewport_extent(width),
            height: viewport_extent(height),
            ..self.clone()
        }
    }

    pub fn with_z_offset(&self, z_offset: f64) -> Self {
        Self {
            z_offset,
            ..self.clone()
        }
    }

    /// Flips one boolean switch.
    pub fn toggled(&self, toggle: Toggle) -> Self {
        let mut next = self.clone();
        match toggle {
            Toggle::Grid => next.show_grid = !next.show_grid,
            Toggle::Arrows => next.show_arrows = !next.show_arrows,
            Toggle::Noise => next.show_noise = !next.show_noise,
            Toggle::Dynamic => next.dynamic = !next.dynamic,
        }
        next
    }

    /// Parameter schema: type, default, range and description per key.
    pub fn schema() -> Value {
        json!({
            "width": {"type": "number", "default": DEFAULT_WIDTH, "min": 0.0,
                "max": MAX_VIEWPORT_EXTENT,
                "description": "Viewport width in world units"},
            "height": {"type": "number", "default": DEFAULT_HEIGHT, "min": 0.0,
                "max": MAX_VIEWPORT_EXTENT,
                "description": "Viewport height in world units"},
            "particles": {"type": "integer", "default": DEFAULT_PARTICLES, "min": 0,
                "description": "Size of the particle pool"},
            "cell_size": {"type": "number", "default": DEFAULT_CELL_SIZE,
                "min": CELL_SIZE_RANGE.0, "max": CELL_SIZE_RANGE.1,
                "description": "World units per grid cell (gradient zoom)"},
            "noise": {"type": "string", "default": NoiseKind::default().name(),
                "enum": NoiseKind::list_names(),
                "description": "Noise strategy"},
            "zoom": {"type": "number", "default": DEFAULT_ZOOM,
                "min": ZOOM_RANGE.0, "max": ZOOM_RANGE.1,
                "description": "Periodic noise frequency"},
            "curve": {"type": "number", "default": DEFAULT_CURVE,
                "description": "Periodic noise amplitude"},
            "z_offset": {"type": "number", "default": DEFAULT_Z_OFFSET,
                "description": "Depth of the gradient noise slice"},
            "increment": {"type": "number", "default": DEFAULT_INCREMENT,
                "description": "Slice advance per dynamic regeneration"},
            "seed": {"type": "integer", "default": DEFAULT_SEED,
                "description": "Run seed for particle placement and gradient noise"},
            "speed": {"type": "number", "default": DEFAULT_SPEED, "min": 0.0,
                "description": "Distance travelled per tick"},
            "trail_length": {"type": "integer", "default": DEFAULT_TRAIL_LENGTH, "min": 1, "max": MAX_TRAIL_LENGTH,
                "description": "Maximum trail points per particle"},
            "margin": {"type": "number", "default": DEFAULT_MARGIN, "min": 0.0,
                "description": "Inset of the active region from each edge"},
            "dynamic": {"type": "boolean", "default": false,
                "description": "Regenerate the gradient field on a timer"},
            "dynamic_interval": {"type": "number", "default": DEFAULT_DYNAMIC_INTERVAL,
                "min": DYNAMIC_INTERVAL_RANGE.0, "max": DYNAMIC_INTERVAL_RANGE.1,
                "description": "Seconds between dynamic regenerations"},
            "show_grid": {"type": "boolean", "default": false,
                "description": "Draw grid lines"},
            "show_arrows": {"type": "boolean", "default": true,
                "description": "Draw per-cell direction arrows"},
            "show_noise": {"type": "boolean", "default": false,
                "description": "Fill cells with noise intensity"},
        })
    }
}

fn invalid(name: &str, value: f64) -> FlowError {
    FlowError::InvalidParameter {
        name: name.to_string(),
        value,
    }
}

/// Clamps `value` into `range`; a NaN result keeps `current`.
fn clamp_or_keep(value: f64, current: f64, range: (f64, f64)) -> f64 {
    if value.is_nan() {
        current
    } else {
        value.clamp(range.0, range.1)
    }
}

fn viewport_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v.min(MAX_VIEWPORT_EXTENT)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FlowConfig::default().validate().is_ok());
    }

    #[test]
    fn max_lifetime_is_twice_trail_length() {
        let config = FlowConfig {
            trail_length: 40,
            ..FlowConfig::default()
        };
        assert_eq!(config.max_lifetime(), 80);
    }

    #[test]
    fn from_json_empty_object_gives_defaults() {
        let config = FlowConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, FlowConfig::default());
    }

    #[test]
    fn from_json_reads_custom_values() {
        let config = FlowConfig::from_json(&json!({
            "width": 320,
            "height": 240.5,
            "particles": 12,
            "noise": "periodic",
            "zoom": 0.5,
            "dynamic": true,
            "seed": 7,
        }))
        .unwrap();
        assert_eq!(config.width, 320.0);
        assert_eq!(config.height, 240.5);
        assert_eq!(config.particles, 12);
        assert_eq!(config.noise, NoiseKind::Periodic);
        assert_eq!(config.zoom, 0.5);
        assert!(config.dynamic);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn from_json_clamps_tunables() {
        let config = FlowConfig::from_json(&json!({
            "cell_size": 2.0,
            "zoom": 99.0,
            "dynamic_interval": 0.0,
        }))
        .unwrap();
        assert_eq!(config.cell_size, 8.0);
        assert_eq!(config.zoom, 30.0);
        assert_eq!(config.dynamic_interval, 0.01);
    }

    #[test]
    fn from_json_rejects_unknown_noise() {
        let result = FlowConfig::from_json(&json!({"noise": "voronoi"}));
        assert!(matches!(result, Err(FlowError::UnknownNoise(_))));
    }

    #[test]
    fn from_json_rejects_negative_speed() {
        let result = FlowConfig::from_json(&json!({"speed": -1.0}));
        assert!(matches!(
            result,
            Err(FlowError::InvalidParameter { ref name, .. }) if name == "speed"
        ));
    }

    #[test]
    fn validate_rejects_zero_trail_length() {
        let config = FlowConfig {
            trail_length: 0,
            ..FlowConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_json_rejects_oversized_viewport() {
        let result = FlowConfig::from_json(&json!({"particles": 1, "width": 1e12, "height": 1e12}));
        assert!(matches!(
            result,
            Err(FlowError::InvalidParameter { ref name, .. }) if name == "width"
        ));
    }

    #[test]
    fn validate_rejects_cell_size_below_range() {
        let config = FlowConfig {
            width: MAX_VIEWPORT_EXTENT,
            height: MAX_VIEWPORT_EXTENT,
            cell_size: 1.0,
            ..FlowConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FlowError::InvalidParameter { ref name, .. }) if name == "cell_size"
        ));
        let coarse = FlowConfig {
            cell_size: 8.0,
            ..config
        };
        assert!(coarse.validate().is_ok());
    }

    #[test]
    fn from_json_rejects_huge_trail_length() {
        let result = FlowConfig::from_json(&json!({"trail_length": 1u64 << 62}));
        assert!(matches!(
            result,
            Err(FlowError::InvalidParameter { ref name, .. }) if name == "trail_length"
        ));
        let config = FlowConfig {
            trail_length: MAX_TRAIL_LENGTH,
            ..FlowConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn with_viewport_caps_extent() {
        let config = FlowConfig::default().with_viewport(1e12, f64::INFINITY);
        assert_eq!(config.width, MAX_VIEWPORT_EXTENT);
        assert_eq!(config.height, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let config = FlowConfig {
            curve: f64::INFINITY,
            ..FlowConfig::default()
        };
        assert!(config.validate().is_err());
        let config = FlowConfig {
            cell_size: f64::NAN,
            ..FlowConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_allows_empty_viewport_and_pool() {
        let config = FlowConfig {
            width: 0.0,
            height: 0.0,
            particles: 0,
            ..FlowConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let config = FlowConfig::default()
            .with_noise(NoiseKind::Periodic)
            .toggled(Toggle::Grid);
        let json = serde_json::to_string(&config).unwrap();
        let restored: FlowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn to_json_has_every_schema_key() {
        let values = FlowConfig::default().to_json();
        let schema = FlowConfig::schema();
        for key in schema.as_object().unwrap().keys() {
            assert!(values.get(key).is_some(), "to_json missing {key}");
        }
    }

    // -- Zoom --

    #[test]
    fn gradient_zoom_moves_cell_size_by_twenty_per_unit() {
        let config = FlowConfig::default().with_zoom_delta(0.5);
        assert_eq!(config.cell_size, 30.0);
        assert_eq!(config.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn gradient_zoom_converges_to_minimum_cell_size() {
        let mut config = FlowConfig::default();
        for _ in 0..5 {
            config = config.with_zoom_delta(-100.0);
            assert!(config.cell_size >= 8.0);
        }
        assert_eq!(config.cell_size, 8.0);
    }

    #[test]
    fn gradient_zoom_caps_at_maximum_cell_size() {
        let config = FlowConfig::default().with_zoom_delta(100.0);
        assert_eq!(config.cell_size, 100.0);
    }

    #[test]
    fn periodic_zoom_moves_zoom_and_keeps_cell_size() {
        let config = FlowConfig::default()
            .with_noise(NoiseKind::Periodic)
            .with_zoom_delta(0.01);
        assert!((config.zoom - 0.02).abs() < 1e-12);
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
    }

    #[test]
    fn periodic_zoom_clamps_both_ends() {
        let low = FlowConfig::default()
            .with_noise(NoiseKind::Periodic)
            .with_zoom_delta(-1.0);
        assert_eq!(low.zoom, 0.0001);
        let high = low.with_zoom_delta(1000.0);
        assert_eq!(high.zoom, 30.0);
    }

    #[test]
    fn nan_zoom_delta_leaves_config_unchanged() {
        let config = FlowConfig::default();
        assert_eq!(config.with_zoom_delta(f64::NAN), config);
    }

    // -- Cadence --

    #[test]
    fn interval_delta_clamps_to_range() {
        let config = FlowConfig::default();
        assert_eq!(config.with_interval_delta(-10.0).dynamic_interval, 0.01);
        assert_eq!(config.with_interval_delta(10.0).dynamic_interval, 3.0);
        assert!((config.with_interval_delta(0.25).dynamic_interval - 0.75).abs() < 1e-12);
    }

    // -- Noise params --

    #[test]
    fn noise_params_follow_selected_kind() {
        let config = FlowConfig::default();
        assert!(matches!(
            config.noise_params(),
            NoiseParams::Gradient { z_offset, increment, .. }
                if z_offset == DEFAULT_Z_OFFSET && increment == DEFAULT_INCREMENT
        ));
        let periodic = config.with_noise(NoiseKind::Periodic);
        assert_eq!(
            periodic.noise_params(),
            NoiseParams::Periodic {
                zoom: DEFAULT_ZOOM,
                curve: DEFAULT_CURVE
            }
        );
    }

    #[test]
    fn strategy_tunables_survive_switching() {
        let config = FlowConfig::default()
            .with_zoom_delta(0.5)
            .with_noise(NoiseKind::Periodic)
            .with_zoom_delta(0.1)
            .with_noise(NoiseKind::Gradient);
        assert_eq!(config.cell_size, 30.0);
        assert!((config.zoom - 0.11).abs() < 1e-12);
    }

    #[test]
    fn noise_seed_is_stable_for_run_seed() {
        let a = FlowConfig::default();
        let b = FlowConfig::default();
        assert_eq!(a.noise_seed(), b.noise_seed());
        let c = FlowConfig {
            seed: 43,
            ..FlowConfig::default()
        };
        assert_ne!(a.noise_seed(), c.noise_seed());
    }

    // -- Viewport and toggles --

    #[test]
    fn with_viewport_sanitizes_extents() {
        let config = FlowConfig::default().with_viewport(-5.0, f64::NAN);
        assert_eq!(config.width, 0.0);
        assert_eq!(config.height, 0.0);
        let config = config.with_viewport(1024.0, 768.0);
        assert_eq!((config.width, config.height), (1024.0, 768.0));
    }

    #[test]
    fn toggled_flips_only_its_switch() {
        let base = FlowConfig::default();
        let grid = base.toggled(Toggle::Grid);
        assert!(grid.show_grid);
        assert_eq!(grid.show_arrows, base.show_arrows);
        assert!(!base.toggled(Toggle::Arrows).show_arrows);
        assert!(base.toggled(Toggle::Noise).show_noise);
        assert!(base.toggled(Toggle::Dynamic).dynamic);
        assert_eq!(grid.toggled(Toggle::Grid), base);
    }
}
