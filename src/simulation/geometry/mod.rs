//! Region descriptors that seed particles on a regular lattice.
//!
//! Along an edge of length `L` a region uses `n = floor(L / dx)` intervals and places lattice
//! points at `i / n` of the edge, so the realized spacing is `L / n` and never smaller than `dx`.
//! A region whose edge is shorter than `dx` collapses onto its origin along that edge.

use std::ops::RangeInclusive;

use crate::V3D;

mod cube;
mod rect;

pub use self::{cube::Cube, rect::Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: V3D,
    pub mass: f64,
}

impl Particle {
    pub fn new(position: V3D, mass: f64) -> Particle {
        Particle { position, mass }
    }
}

pub trait Object {
    fn part_mass(&self) -> f64;
    fn part_mass_mut(&mut self) -> &mut f64;

    /// Mass of a particle occupying a `dx`-sized lattice cell.
    fn set_part_mass(&mut self, dx: f64, rest_density: f64) {
        *self.part_mass_mut() = dx * dx * dx * rest_density;
    }

    /// Stores the material tag in the mass slot instead of a physical mass.
    fn set_part_mass_tag(&mut self, material: u16) {
        *self.part_mass_mut() = material as f64;
    }

    /// Fill the whole region. `include_boundary` keeps the lattice points lying on the
    /// region's own edges (rect) or faces (cube).
    fn fill(&self, points: &mut Vec<Particle>, dx: f64, include_boundary: bool) -> usize;

    /// Number of particles `fill` would emit.
    fn fill_count(&self, dx: f64, include_boundary: bool) -> usize;
}

pub(crate) fn lattice_intervals(len: f64, dx: f64) -> usize {
    if !(dx > 0.) || !dx.is_finite() || !len.is_finite() {
        return 0;
    }
    (len / dx).floor() as usize
}

pub(crate) fn lattice_fraction(i: usize, n: usize) -> f64 {
    if n == 0 {
        0.
    } else {
        i as f64 / n as f64
    }
}

/// Lattice indices `0..=n`, or only the inner ones `1..=n-1`.
#[allow(clippy::reversed_empty_ranges)]
pub(crate) fn lattice_range(n: usize, include_ends: bool) -> RangeInclusive<usize> {
    if include_ends {
        0..=n
    } else if n >= 2 {
        1..=n - 1
    } else {
        1..=0
    }
}
