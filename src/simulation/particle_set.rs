use std::ops::Range;

use crate::{geometry::Particle, particle_class::ParticleClass};

/// Particles of every class as produced by the scenario builder, before packing.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    pub boundary: Vec<Particle>,
    pub gate: Vec<Particle>,
    pub obstacle: Vec<Particle>,
    pub fluid: Vec<Particle>,
}

impl ParticleSet {
    pub fn get(&self, class: ParticleClass) -> &[Particle] {
        match class {
            ParticleClass::Boundary => &self.boundary,
            ParticleClass::Gate => &self.gate,
            ParticleClass::Obstacle => &self.obstacle,
            ParticleClass::Fluid => &self.fluid,
        }
    }

    pub fn get_mut(&mut self, class: ParticleClass) -> &mut Vec<Particle> {
        match class {
            ParticleClass::Boundary => &mut self.boundary,
            ParticleClass::Gate => &mut self.gate,
            ParticleClass::Obstacle => &mut self.obstacle,
            ParticleClass::Fluid => &mut self.fluid,
        }
    }

    pub fn total(&self) -> usize {
        ParticleClass::PACKING_ORDER.iter().map(|&c| self.get(c).len()).sum()
    }

    pub fn class_ranges(&self) -> ClassRanges {
        let mut ranges: [Range<usize>; 4] = Default::default();
        let mut offset = 0;
        for class in ParticleClass::PACKING_ORDER {
            let len = self.get(class).len();
            ranges[class.packing_position()] = offset..offset + len;
            offset += len;
        }
        ClassRanges { ranges }
    }

    /// Iterates `(class, particle)` in packing order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleClass, &Particle)> + '_ {
        ParticleClass::PACKING_ORDER
            .into_iter()
            .flat_map(move |class| self.get(class).iter().map(move |p| (class, p)))
    }

    pub fn clear(&mut self) {
        for class in ParticleClass::PACKING_ORDER {
            let list = self.get_mut(class);
            list.clear();
            list.shrink_to_fit();
        }
    }
}

/// Slot range of every class inside the packed buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRanges {
    ranges: [Range<usize>; 4],
}

impl ClassRanges {
    pub fn get(&self, class: ParticleClass) -> Range<usize> {
        self.ranges[class.packing_position()].clone()
    }

    pub fn total(&self) -> usize {
        self.ranges[3].end
    }

    pub fn class_of(&self, slot: usize) -> Option<ParticleClass> {
        ParticleClass::PACKING_ORDER
            .into_iter()
            .find(|&class| self.get(class).contains(&slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3d;

    fn particles(n: usize) -> Vec<Particle> {
        (0..n).map(|i| Particle::new(vec3d(i as f64, 0., 0.), 1.)).collect()
    }

    #[test]
    fn ranges_are_contiguous_in_packing_order() {
        let set = ParticleSet {
            boundary: particles(5),
            gate: particles(0),
            obstacle: particles(2),
            fluid: particles(7),
        };
        let ranges = set.class_ranges();
        assert_eq!(ranges.get(ParticleClass::Boundary), 0..5);
        assert_eq!(ranges.get(ParticleClass::Gate), 5..5);
        assert_eq!(ranges.get(ParticleClass::Obstacle), 5..7);
        assert_eq!(ranges.get(ParticleClass::Fluid), 7..14);
        assert_eq!(ranges.total(), set.total());
        assert_eq!(ranges.class_of(5), Some(ParticleClass::Obstacle));
        assert_eq!(ranges.class_of(14), None);
        assert_eq!(set.iter().count(), 14);
    }

    #[test]
    fn clear_releases_all_lists() {
        let mut set = ParticleSet {
            boundary: particles(3),
            gate: particles(3),
            obstacle: particles(3),
            fluid: particles(3),
        };
        set.clear();
        assert_eq!(set.total(), 0);
    }
}
