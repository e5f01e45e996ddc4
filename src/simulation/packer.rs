use tracing::info;

use crate::{
    buffers::BufferList,
    concurrency::par_iter_mut4,
    floating_type_mod::FT,
    hashing::SpatialHasher,
    particle_class::{ParticleClass, ParticleInfo},
    particle_set::{ClassRanges, ParticleSet},
};

/// Writes all particles into `buffers`, class after class in [`ParticleClass::PACKING_ORDER`].
///
/// The slot of a particle is its global id. Velocities start at zero with the rest density in
/// the fourth component; positions and hashes come from `hasher`.
///
/// Panics if `buffers` was not sized to `set.total()`.
pub fn pack_buffers(
    set: &ParticleSet,
    rest_density: f64,
    buffers: &mut BufferList,
    hasher: &impl SpatialHasher,
) -> ClassRanges {
    let ranges = set.class_ranges();
    assert_eq!(
        buffers.len(),
        ranges.total(),
        "buffers were sized for {} particles but the particle set holds {}",
        buffers.len(),
        ranges.total()
    );
    assert!(ranges.total() <= u32::MAX as usize);

    let mut writer = buffers.writer();
    for class in ParticleClass::PACKING_ORDER {
        let range = ranges.get(class);
        let offset = range.start;
        let particles = set.get(class);
        info!("{} parts: {}", class.as_str(), particles.len());

        par_iter_mut4(
            &mut writer.pos[range.clone()],
            &mut writer.hash[range.clone()],
            &mut writer.vel[range.clone()],
            &mut writer.info[range.clone()],
            |i, pos, hash, vel, info| {
                *vel = [0., 0., 0., rest_density as FT];
                *info = ParticleInfo::for_class(class, (offset + i) as u32);
                let (p, h) = hasher.localpos_and_hash(&particles[i], info);
                *pos = p;
                *hash = h;
            },
        );

        if !range.is_empty() {
            info!("{} part mass: {}", class.as_str(), writer.pos[range.end - 1][3]);
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buffers::{HashBuffer, InfoBuffer, PosBuffer, VelBuffer},
        geometry::Particle,
        hashing::UniformGridHasher,
        particle_class::{BOUNDARY_PART, FLUID_PART, GATE_PART},
        vec3d,
    };

    fn line(n: usize, y: f64, mass: f64) -> Vec<Particle> {
        (0..n)
            .map(|i| Particle::new(vec3d(0.05 + i as f64 * 0.1, y, 0.5), mass))
            .collect()
    }

    fn sample_set() -> ParticleSet {
        ParticleSet {
            boundary: line(4, 0.1, 1.),
            gate: line(3, 0.3, GATE_PART as f64),
            obstacle: line(2, 0.5, 1.),
            fluid: line(5, 0.7, 2.),
        }
    }

    fn hasher() -> UniformGridHasher {
        UniformGridHasher::new(vec3d(0., 0., 0.), vec3d(1., 1., 1.), 0.1)
    }

    #[test]
    fn metadata_ids_equal_slots_and_classes_are_ordered() {
        let set = sample_set();
        let mut buffers = BufferList::new(set.total());
        let ranges = pack_buffers(&set, 1000., &mut buffers, &hasher());

        let info = buffers.get::<InfoBuffer>();
        for (slot, record) in info.iter().enumerate() {
            assert_eq!(record.id as usize, slot);
            let class = ranges.class_of(slot).unwrap();
            assert_eq!(record.material, class.material());
            assert_eq!(record.object, class.object());
        }
        assert_eq!(info[0].material, BOUNDARY_PART);
        assert_eq!(info[4].material, GATE_PART);
        assert_eq!((info[7].material, info[7].object), (BOUNDARY_PART, 1));
        assert_eq!(info[9].material, FLUID_PART);
    }

    #[test]
    fn velocity_carries_rest_density_and_position_carries_mass() {
        let set = sample_set();
        let mut buffers = BufferList::new(set.total());
        pack_buffers(&set, 1000., &mut buffers, &hasher());

        assert!(buffers.get::<VelBuffer>().iter().all(|v| *v == [0., 0., 0., 1000.]));
        let pos = buffers.get::<PosBuffer>();
        assert_eq!(pos[0][3], 1.);
        assert_eq!(pos[4][3], GATE_PART as FT);
        assert_eq!(pos[13][3], 2.);
    }

    #[test]
    fn positions_roundtrip_through_hash() {
        let set = sample_set();
        let h = hasher();
        let mut buffers = BufferList::new(set.total());
        pack_buffers(&set, 1000., &mut buffers, &h);

        let pos = buffers.get::<PosBuffer>();
        let hash = buffers.get::<HashBuffer>();
        for (slot, (_, particle)) in set.iter().enumerate() {
            let world = h.world_position(hash[slot], pos[slot]);
            assert!((world - particle.position).norm() < 1e-5);
        }
    }

    #[test]
    fn empty_classes_are_skipped() {
        let set = ParticleSet {
            boundary: line(2, 0.1, 1.),
            fluid: line(2, 0.7, 1.),
            ..Default::default()
        };
        let mut buffers = BufferList::new(4);
        let ranges = pack_buffers(&set, 1000., &mut buffers, &hasher());
        assert!(ranges.get(ParticleClass::Gate).is_empty());
        assert_eq!(ranges.get(ParticleClass::Fluid), 2..4);
        assert_eq!(buffers.get::<InfoBuffer>()[2].material, FLUID_PART);
    }

    #[test]
    #[should_panic(expected = "buffers were sized")]
    fn undersized_buffers_are_fatal() {
        let set = sample_set();
        let mut buffers = BufferList::new(set.total() - 1);
        pack_buffers(&set, 1000., &mut buffers, &hasher());
    }
}
