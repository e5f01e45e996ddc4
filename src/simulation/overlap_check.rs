use rayon::iter::ParallelIterator;
use rstar::{primitives::GeomWithData, Point, RTree};

use crate::{concurrency::into_par_iter, particle_class::ParticleClass, particle_set::ParticleSet, V3D};

#[derive(Debug, PartialEq, Clone, Copy)]
struct CustomRTreePoint {
    p: V3D,
}

impl Point for CustomRTreePoint {
    type Scalar = f64;

    const DIMENSIONS: usize = 3;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        CustomRTreePoint {
            p: V3D::from_iterator((0..3).map(|d| generator(d))),
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        self.p[index]
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        &mut self.p[index]
    }
}

impl From<V3D> for CustomRTreePoint {
    fn from(p: V3D) -> Self {
        CustomRTreePoint { p }
    }
}

type CustomRTreeElem = GeomWithData<CustomRTreePoint, (usize, ParticleClass)>;

/// Two particles of different classes closer than the tolerance. Slots are packing slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    pub first: (usize, ParticleClass),
    pub second: (usize, ParticleClass),
    pub distance: f64,
}

/// Finds all particle pairs of different classes that are closer than `tolerance`.
/// Pairs within one class are not reported.
pub fn find_cross_class_overlaps(set: &ParticleSet, tolerance: f64) -> Vec<Overlap> {
    let all: Vec<(usize, ParticleClass, V3D)> = set
        .iter()
        .enumerate()
        .map(|(slot, (class, particle))| (slot, class, particle.position))
        .collect();

    let rtree_elems: Vec<CustomRTreeElem> = all
        .iter()
        .map(|&(slot, class, p)| CustomRTreeElem::new(CustomRTreePoint::from(p), (slot, class)))
        .collect();
    let rtree = RTree::<CustomRTreeElem>::bulk_load(rtree_elems);

    let max_dist_sq = tolerance * tolerance;

    let mut overlaps: Vec<Overlap> = into_par_iter(0..all.len())
        .flat_map(|k| {
            let (slot, class, p) = all[k];
            rtree
                .locate_within_distance(CustomRTreePoint::from(p), max_dist_sq)
                .filter(|neigh| {
                    let (neigh_slot, neigh_class) = neigh.data;
                    neigh_slot > slot && neigh_class != class
                })
                .map(|neigh| Overlap {
                    first: (slot, class),
                    second: neigh.data,
                    distance: (neigh.geom().p - p).norm(),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    overlaps.sort_by_key(|o| (o.first.0, o.second.0));
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Particle, vec3d};

    #[test]
    fn reports_only_cross_class_pairs_once() {
        let set = ParticleSet {
            boundary: vec![
                Particle::new(vec3d(0., 0., 0.), 1.),
                Particle::new(vec3d(1., 0., 0.), 1.),
            ],
            gate: vec![Particle::new(vec3d(1., 0., 0.), 1.)],
            obstacle: vec![],
            fluid: vec![
                Particle::new(vec3d(0.5, 0.5, 0.5), 1.),
                Particle::new(vec3d(0.5, 0.5, 0.5), 1.),
            ],
        };

        let overlaps = find_cross_class_overlaps(&set, 1e-6);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].first, (1, ParticleClass::Boundary));
        assert_eq!(overlaps[0].second, (2, ParticleClass::Gate));
        assert_eq!(overlaps[0].distance, 0.);
    }

    #[test]
    fn separated_classes_have_no_overlaps() {
        let set = ParticleSet {
            boundary: vec![Particle::new(vec3d(0., 0., 0.), 1.)],
            fluid: vec![Particle::new(vec3d(0.015, 0., 0.), 1.)],
            ..Default::default()
        };
        assert!(find_cross_class_overlaps(&set, 1e-6).is_empty());
        assert_eq!(find_cross_class_overlaps(&set, 0.02).len(), 1);
    }
}
