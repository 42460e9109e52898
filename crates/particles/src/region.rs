//! The active region: the viewport inset by a margin on every edge.

use flowfield_core::Xorshift64;
use glam::DVec2;

/// Axis-aligned area inside which particles are alive.
///
/// Bounds are inclusive: a point exactly on the far edge is still inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    origin: DVec2,
    size: DVec2,
}

impl Region {
    /// Insets a `width x height` viewport by `margin` on all four sides.
    ///
    /// When the margins overlap, the region collapses to zero size at
    /// `(margin, margin)` instead of going negative.
    pub fn inset(width: f64, height: f64, margin: f64) -> Self {
        Self {
            origin: DVec2::splat(margin),
            size: DVec2::new(
                (width - 2.0 * margin).max(0.0),
                (height - 2.0 * margin).max(0.0),
            ),
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// True when `p` lies inside the inclusive bounds. NaN is never inside.
    pub fn contains(&self, p: DVec2) -> bool {
        let far = self.origin + self.size;
        p.x >= self.origin.x && p.x <= far.x && p.y >= self.origin.y && p.y <= far.y
    }

    /// A uniformly random point on whole-unit offsets from the origin.
    pub fn random_point(&self, rng: &mut Xorshift64) -> DVec2 {
        let x = (rng.next_f64() * self.size.x).floor() + self.origin.x;
        let y = (rng.next_f64() * self.size.y).floor() + self.origin.y;
        DVec2::new(x, y)
    }
}
