use super::{lattice_fraction, lattice_intervals, lattice_range, Object, Particle};
use crate::V3D;

/// Planar parallelogram spanned by `vx` and `vy` at `origin`.
#[derive(Debug, Clone)]
pub struct Rect {
    origin: V3D,
    vx: V3D,
    vy: V3D,
    mass: f64,
}

impl Rect {
    pub fn new(origin: V3D, vx: V3D, vy: V3D) -> Rect {
        Rect {
            origin,
            vx,
            vy,
            mass: 0.,
        }
    }

    pub fn origin(&self) -> V3D {
        self.origin
    }

    pub fn area(&self) -> f64 {
        self.vx.cross(&self.vy).norm()
    }

    fn for_each_fill_point(&self, dx: f64, include_edges: bool, mut f: impl FnMut(V3D)) {
        let nx = lattice_intervals(self.vx.norm(), dx);
        let ny = lattice_intervals(self.vy.norm(), dx);
        for i in lattice_range(nx, include_edges) {
            for j in lattice_range(ny, include_edges) {
                f(self.origin + self.vx * lattice_fraction(i, nx) + self.vy * lattice_fraction(j, ny));
            }
        }
    }

    /// Walks the perimeter edge by edge. Every edge owns its start corner and stops one
    /// lattice step before the next corner.
    fn for_each_border_point(&self, dx: f64, mut f: impl FnMut(V3D)) {
        let edges = [
            (self.origin, self.vx),
            (self.origin + self.vx, self.vy),
            (self.origin + self.vx + self.vy, -self.vx),
            (self.origin + self.vy, -self.vy),
        ];

        for (start, dir) in edges {
            let n = lattice_intervals(dir.norm(), dx);
            for i in 0..n {
                f(start + dir * lattice_fraction(i, n));
            }
        }
    }

    pub fn fill_border(&self, points: &mut Vec<Particle>, dx: f64) -> usize {
        let len_before = points.len();
        let mass = self.mass;
        self.for_each_border_point(dx, |p| points.push(Particle::new(p, mass)));
        points.len() - len_before
    }

    pub fn fill_border_count(&self, dx: f64) -> usize {
        let mut count = 0;
        self.for_each_border_point(dx, |_| count += 1);
        count
    }
}

impl Object for Rect {
    fn part_mass(&self) -> f64 {
        self.mass
    }

    fn part_mass_mut(&mut self) -> &mut f64 {
        &mut self.mass
    }

    fn fill(&self, points: &mut Vec<Particle>, dx: f64, include_edges: bool) -> usize {
        let len_before = points.len();
        let mass = self.mass;
        self.for_each_fill_point(dx, include_edges, |p| points.push(Particle::new(p, mass)));
        points.len() - len_before
    }

    fn fill_count(&self, dx: f64, include_edges: bool) -> usize {
        let mut count = 0;
        self.for_each_fill_point(dx, include_edges, |_| count += 1);
        count
    }
}
