//! Ground-plane regions and rejection sampling
//!
//! The pitch catalog is three fixed shapes:
//! - C1: half-disk of radius 3.8 around (3, 0), restricted to x <= 3
//! - C2: half-disk of radius 2.2 around (3, 0), restricted to x <= 3
//! - C3: disk of radius 0.8 around the origin
//!
//! Sampling draws uniformly inside an axis-aligned box and retries until the
//! point satisfies the region combination. There is no retry cap: every
//! combination used on the pitch has non-zero area inside its box.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

const HALF_DISK_CENTER: DVec2 = DVec2::new(3.0, 0.0);
const C1_RADIUS: f64 = 3.8;
const C2_RADIUS: f64 = 2.2;
const C3_RADIUS: f64 = 0.8;

/// A named area of the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    C1,
    C2,
    C3,
}

impl Region {
    #[inline]
    pub fn contains(self, p: DVec2) -> bool {
        match self {
            Region::C1 => in_half_disk(p, C1_RADIUS),
            Region::C2 => in_half_disk(p, C2_RADIUS),
            Region::C3 => p.length_squared() <= C3_RADIUS * C3_RADIUS,
        }
    }
}

#[inline]
fn in_half_disk(p: DVec2, radius: f64) -> bool {
    (p - HALF_DISK_CENTER).length_squared() <= radius * radius && p.x <= HALF_DISK_CENTER.x
}

/// Axis-aligned sampling box (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub const fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            min: DVec2::new(x.0, y.0),
            max: DVec2::new(x.1, y.1),
        }
    }

    /// True if the box has no area to draw from
    pub fn is_degenerate(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y)
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// One uniform draw inside the box
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }
}

/// Inclusion/exclusion rule over the region catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionRule {
    pub bounds: Bounds,
    pub include: &'static [Region],
    pub exclude: &'static [Region],
}

impl RegionRule {
    pub fn accepts(&self, p: DVec2) -> bool {
        self.include.iter().all(|r| r.contains(p)) && !self.exclude.iter().any(|r| r.contains(p))
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        sample_in(rng, self.include, self.exclude, &self.bounds)
    }
}

/// Draw a point inside every `include` region and outside every `exclude` region
pub fn sample_in<R: Rng + ?Sized>(
    rng: &mut R,
    include: &[Region],
    exclude: &[Region],
    bounds: &Bounds,
) -> DVec2 {
    sample_where(rng, bounds, |p| {
        include.iter().all(|r| r.contains(p)) && !exclude.iter().any(|r| r.contains(p))
    })
}

/// Rejection-sample inside `bounds` until `accept` holds
pub fn sample_where<R, F>(rng: &mut R, bounds: &Bounds, accept: F) -> DVec2
where
    R: Rng + ?Sized,
    F: Fn(DVec2) -> bool,
{
    debug_assert!(!bounds.is_degenerate(), "degenerate sampling bounds {bounds:?}");
    loop {
        let p = bounds.draw(rng);
        if accept(p) {
            return p;
        }
    }
}
