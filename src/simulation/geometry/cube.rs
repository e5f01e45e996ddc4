use super::{lattice_fraction, lattice_intervals, lattice_range, Object, Particle};
use crate::V3D;

/// Parallelepiped spanned by `vx`, `vy` and `vz` at `origin`. `vz` points "up": the face at
/// `origin + vz` is the top face.
#[derive(Debug, Clone)]
pub struct Cube {
    origin: V3D,
    vx: V3D,
    vy: V3D,
    vz: V3D,
    mass: f64,
}

impl Cube {
    pub fn new(origin: V3D, vx: V3D, vy: V3D, vz: V3D) -> Cube {
        Cube {
            origin,
            vx,
            vy,
            vz,
            mass: 0.,
        }
    }

    pub fn axis_aligned(origin: V3D, size: V3D) -> Cube {
        Cube::new(
            origin,
            [size.x, 0., 0.].into(),
            [0., size.y, 0.].into(),
            [0., 0., size.z].into(),
        )
    }

    pub fn origin(&self) -> V3D {
        self.origin
    }

    pub fn volume(&self) -> f64 {
        self.vx.dot(&self.vy.cross(&self.vz)).abs()
    }

    pub fn surface_area(&self, close_top: bool) -> f64 {
        let xy = self.vx.cross(&self.vy).norm();
        let xz = self.vx.cross(&self.vz).norm();
        let yz = self.vy.cross(&self.vz).norm();
        2. * (xz + yz) + if close_top { 2. * xy } else { xy }
    }

    /// True if `p` lies inside or on the surface (within `eps`). Projects onto each edge, so the
    /// edges must be mutually orthogonal.
    pub fn contains(&self, p: V3D, eps: f64) -> bool {
        let rel = p - self.origin;
        [self.vx, self.vy, self.vz].iter().all(|axis| {
            let len_sq = axis.norm_squared();
            if len_sq == 0. {
                return rel.dot(axis).abs() <= eps;
            }
            let t = rel.dot(axis) / len_sq.sqrt();
            t >= -eps && t <= len_sq.sqrt() + eps
        })
    }

    fn for_each_fill_point(&self, dx: f64, include_faces: bool, mut f: impl FnMut(V3D)) {
        let nx = lattice_intervals(self.vx.norm(), dx);
        let ny = lattice_intervals(self.vy.norm(), dx);
        let nz = lattice_intervals(self.vz.norm(), dx);
        for i in lattice_range(nx, include_faces) {
            for j in lattice_range(ny, include_faces) {
                for k in lattice_range(nz, include_faces) {
                    f(self.origin
                        + self.vx * lattice_fraction(i, nx)
                        + self.vy * lattice_fraction(j, ny)
                        + self.vz * lattice_fraction(k, nz));
                }
            }
        }
    }

    /// The four side faces each own their starting vertical edge and the full height
    /// including bottom and top rim. Bottom and (optional) top faces only add their interior,
    /// so no edge or corner is visited twice.
    fn for_each_border_point(&self, dx: f64, close_top: bool, mut f: impl FnMut(V3D)) {
        let nx = lattice_intervals(self.vx.norm(), dx);
        let ny = lattice_intervals(self.vy.norm(), dx);
        let nz = lattice_intervals(self.vz.norm(), dx);

        let sides = [
            (self.origin, self.vx, nx),
            (self.origin + self.vx, self.vy, ny),
            (self.origin + self.vx + self.vy, -self.vx, nx),
            (self.origin + self.vy, -self.vy, ny),
        ];
        for (start, dir, n) in sides {
            for i in 0..n {
                for k in lattice_range(nz, true) {
                    f(start + dir * lattice_fraction(i, n) + self.vz * lattice_fraction(k, nz));
                }
            }
        }

        let mut caps = vec![self.origin];
        if close_top {
            caps.push(self.origin + self.vz);
        }
        for cap_origin in caps {
            for i in lattice_range(nx, false) {
                for j in lattice_range(ny, false) {
                    f(cap_origin + self.vx * lattice_fraction(i, nx) + self.vy * lattice_fraction(j, ny));
                }
            }
        }
    }

    pub fn fill_border(&self, points: &mut Vec<Particle>, dx: f64, close_top: bool) -> usize {
        let len_before = points.len();
        let mass = self.mass;
        self.for_each_border_point(dx, close_top, |p| points.push(Particle::new(p, mass)));
        points.len() - len_before
    }

    pub fn fill_border_count(&self, dx: f64, close_top: bool) -> usize {
        let mut count = 0;
        self.for_each_border_point(dx, close_top, |_| count += 1);
        count
    }
}

impl Object for Cube {
    fn part_mass(&self) -> f64 {
        self.mass
    }

    fn part_mass_mut(&mut self) -> &mut f64 {
        &mut self.mass
    }

    fn fill(&self, points: &mut Vec<Particle>, dx: f64, include_faces: bool) -> usize {
        let len_before = points.len();
        let mass = self.mass;
        self.for_each_fill_point(dx, include_faces, |p| points.push(Particle::new(p, mass)));
        points.len() - len_before
    }

    fn fill_count(&self, dx: f64, include_faces: bool) -> usize {
        let mut count = 0;
        self.for_each_fill_point(dx, include_faces, |_| count += 1);
        count
    }
}
