//! A single trailing particle advected through a [`FlowGrid`].
//!
//! Each particle counts down a lifetime. While alive it follows the angle of
//! the cell it sits in and records its path in a capped FIFO trail. Once the
//! lifetime runs out, the trail drains one point per tick and the particle
//! is then re-seeded. Leaving the active region re-seeds it at once.

use crate::region::Region;
use flowfield_core::{FlowGrid, Xorshift64};
use glam::DVec2;
use std::collections::VecDeque;

/// What a single [`Particle::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Followed the flow and extended the trail.
    Moved,
    /// Alive, but its cell was outside the grid; no motion this tick.
    Stalled,
    /// Lifetime spent; the oldest trail point was dropped.
    Fading,
    /// Lifetime spent and trail drained; re-seeded.
    Expired,
    /// Left the active region; re-seeded.
    Escaped,
}

impl Outcome {
    /// True when the update ended in a reset.
    pub fn is_reset(self) -> bool {
        matches!(self, Outcome::Expired | Outcome::Escaped)
    }
}

/// An agent with a position, a heading, a bounded trail and a lifetime.
#[derive(Debug, Clone)]
pub struct Particle {
    position: DVec2,
    velocity: DVec2,
    trail: VecDeque<DVec2>,
    trail_capacity: usize,
    speed: f64,
    time_to_live: i64,
}

impl Particle {
    /// Creates a particle at `position` with a one-point trail and a full
    /// lifetime.
    ///
    /// `trail_capacity` is clamped to at least 1 so a reset trail always fits.
    /// The trail buffer grows on demand rather than up front.
    pub fn new(position: DVec2, trail_capacity: usize, speed: f64) -> Self {
        let trail_capacity = trail_capacity.max(1);
        let mut trail = VecDeque::new();
        trail.push_back(position);
        Self {
            position,
            velocity: DVec2::ZERO,
            trail,
            trail_capacity,
            speed,
            time_to_live: lifetime_for(trail_capacity),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Last heading, scaled to unit length. Zero until the first move.
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Recorded positions, oldest first.
    pub fn trail(&self) -> &VecDeque<DVec2> {
        &self.trail
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Remaining ticks of motion. Goes below zero while the trail drains.
    pub fn time_to_live(&self) -> i64 {
        self.time_to_live
    }

    /// Lifetime restored on reset: enough to fill the trail and drain it.
    pub fn max_lifetime(&self) -> i64 {
        lifetime_for(self.trail_capacity)
    }

    pub fn is_active(&self) -> bool {
        self.time_to_live >= 1
    }

    /// Advances the particle by one tick.
    ///
    /// A particle that is active when the tick begins follows the flow
    /// angle of its current cell. If that cell is off the grid it holds
    /// still for the tick. An expired particle drains its trail and is
    /// re-seeded once one point remains. Finally, a particle outside
    /// `region` is re-seeded whatever its lifetime.
    pub fn update(&mut self, grid: &FlowGrid, region: &Region, rng: &mut Xorshift64) -> Outcome {
        let was_active = self.is_active();
        self.time_to_live -= 1;

        let outcome = if was_active {
            match grid.lookup(self.position.x, self.position.y) {
                Ok(angle) => {
                    self.advance(angle);
                    Outcome::Moved
                }
                Err(_) => Outcome::Stalled,
            }
        } else if self.trail.len() > 1 {
            self.trail.pop_front();
            Outcome::Fading
        } else {
            self.reset(region, rng);
            Outcome::Expired
        };

        if !region.contains(self.position) {
            self.reset(region, rng);
            return Outcome::Escaped;
        }
        outcome
    }

    /// Re-seeds the particle at a random point in `region` with a
    /// one-point trail and a full lifetime.
    pub fn reset(&mut self, region: &Region, rng: &mut Xorshift64) {
        self.position = region.random_point(rng);
        self.trail.clear();
        self.trail.push_back(self.position);
        self.time_to_live = self.max_lifetime();
    }

    fn advance(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        self.velocity = DVec2::new(cos, sin);
        self.position += self.velocity * self.speed;
        self.trail.push_back(self.position);
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
    }
}

fn lifetime_for(trail_capacity: usize) -> i64 {
    i64::try_from(trail_capacity)
        .unwrap_or(i64::MAX)
        .saturating_mul(2)
}
