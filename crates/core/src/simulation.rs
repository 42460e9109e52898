//! The `Simulation` trait driven by an external frame loop.
//!
//! The trait is object-safe so a host can hold a `Box<dyn Simulation>` and
//! drive it without knowing the concrete system type.

use crate::flow_grid::FlowGrid;
use serde_json::Value;
use std::time::Duration;

/// A frame-driven simulation over a flow field.
///
/// There is no internal timer thread: the host calls [`Simulation::tick`]
/// once per frame with the elapsed wall-clock time, and every mutation
/// happens inside that call.
pub trait Simulation {
    /// Advances every agent by exactly one update.
    fn step(&mut self);

    /// One frame: a [`Simulation::step`] followed by time-based
    /// housekeeping such as dynamic field regeneration.
    fn tick(&mut self, dt: Duration);

    /// The field agents are currently steered by.
    fn flow_grid(&self) -> &FlowGrid;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter's type, range and default.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseParams;
    use serde_json::json;

    /// Minimal simulation that counts calls, to check object safety.
    struct CountingSimulation {
        grid: FlowGrid,
        steps: usize,
        elapsed: Duration,
    }

    impl CountingSimulation {
        fn new() -> Self {
            Self {
                grid: FlowGrid::build(
                    40.0,
                    40.0,
                    10.0,
                    &NoiseParams::Periodic {
                        zoom: 1.0,
                        curve: 1.0,
                    },
                ),
                steps: 0,
                elapsed: Duration::ZERO,
            }
        }
    }

    impl Simulation for CountingSimulation {
        fn step(&mut self) {
            self.steps += 1;
        }

        fn tick(&mut self, dt: Duration) {
            self.step();
            self.elapsed += dt;
        }

        fn flow_grid(&self) -> &FlowGrid {
            &self.grid
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps})
        }

        fn param_schema(&self) -> Value {
            json!({"steps": {"type": "integer", "default": 0}})
        }
    }

    #[test]
    fn simulation_trait_is_object_safe() {
        let sim: Box<dyn Simulation> = Box::new(CountingSimulation::new());
        assert_eq!(sim.flow_grid().columns(), 4);
        assert_eq!(sim.flow_grid().rows(), 4);
    }

    #[test]
    fn tick_steps_once_and_accumulates_time() {
        let mut sim = CountingSimulation::new();
        let driver: &mut dyn Simulation = &mut sim;
        driver.tick(Duration::from_millis(16));
        driver.tick(Duration::from_millis(16));
        assert_eq!(driver.params()["steps"], 2);
        assert_eq!(sim.elapsed, Duration::from_millis(32));
    }

    #[test]
    fn param_schema_reachable_through_dyn() {
        let sim = CountingSimulation::new();
        let sim_ref: &dyn Simulation = &sim;
        assert_eq!(sim_ref.param_schema()["steps"]["type"], "integer");
    }
}
