//! Scenario variants. Each variant builds its particle classes from a [`ScenarioParams`],
//! packs them into the solver buffers and owns the kinematic state of its moving boundaries.

use enum_dispatch::enum_dispatch;
use tracing::{info, warn};

use crate::{
    buffers::BufferList,
    error::{Error, Result},
    geometry::{Cube, Object},
    hashing::{SpatialHasher, UniformGridHasher},
    kinematics::MovingBoundaryState,
    overlap_check::find_cross_class_overlaps,
    particle_set::{ClassRanges, ParticleSet},
    scenario_parameters::{ScenarioKind, ScenarioParams},
    vec3d,
};

mod dam_break;
mod dam_break_gate;

pub use dam_break::DamBreak;
pub use dam_break_gate::DamBreakGate;

#[enum_dispatch]
pub trait Problem {
    fn name(&self) -> &'static str;

    fn params(&self) -> &ScenarioParams;

    /// Fills all particle classes and returns the total number of particles, which is the
    /// length the buffers handed to [`Problem::pack_buffers`] must have.
    fn generate_particles(&mut self) -> Result<usize>;

    fn particle_set(&self) -> &ParticleSet;

    /// Drops the generated particle lists once they are packed.
    fn release_particles(&mut self);

    fn moving_boundaries(&self) -> &[MovingBoundaryState];

    fn moving_boundaries_mut(&mut self) -> &mut [MovingBoundaryState];

    fn pack_buffers(&self, buffers: &mut BufferList, hasher: &impl SpatialHasher) -> ClassRanges {
        crate::packer::pack_buffers(self.particle_set(), self.params().rest_density, buffers, hasher)
    }

    /// Advances the moving boundary `index` to time `t` with step `dt`.
    fn boundary_kinematics(&mut self, t: f64, dt: f64, index: usize) -> Result<&mut MovingBoundaryState> {
        let boundaries = self.moving_boundaries_mut();
        let count = boundaries.len();
        match boundaries.get_mut(index) {
            Some(state) => Ok(state.advance(t, dt)),
            None => Err(Error::UnknownBoundary { index, count }),
        }
    }

    /// Uniform grid over the simulated world with cells at least one influence radius wide.
    fn grid_hasher(&self) -> UniformGridHasher {
        let params = self.params();
        UniformGridHasher::new(params.origin, params.world_size, params.influence_radius())
    }
}

#[enum_dispatch(Problem)]
pub enum Scenario {
    DamBreakGate(DamBreakGate),
    DamBreak(DamBreak),
}

impl Scenario {
    /// Validates `params` and creates the variant selected by `params.scenario`.
    pub fn new(params: ScenarioParams) -> Result<Scenario> {
        params.validate()?;
        Ok(match params.scenario {
            ScenarioKind::DamBreakGate => DamBreakGate::new(params).into(),
            ScenarioKind::DamBreak => DamBreak::new(params).into(),
        })
    }
}

/// The experiment box, border-filled at the wall offset and open at the top.
fn walls(params: &ScenarioParams) -> Cube {
    let mut walls = Cube::axis_aligned(params.origin, params.box_size);
    walls.set_part_mass(params.r0(), params.rest_density);
    walls
}

/// Water column resting against the back wall, one wall offset away from every wall.
fn fluid_column(params: &ScenarioParams) -> Cube {
    let r0 = params.r0();
    let [length, height] = params.fluid_column;
    let mut column = Cube::axis_aligned(
        params.origin + vec3d(r0, r0, r0),
        vec3d(length, params.box_size.y - 2. * r0, height - r0),
    );
    column.set_part_mass(params.deltap, params.rest_density);
    column
}

fn check_overlaps(params: &ScenarioParams, set: &ParticleSet) -> Result<()> {
    if !params.check_overlaps {
        return Ok(());
    }

    let overlaps = find_cross_class_overlaps(set, params.overlap_tolerance);
    if let Some(first) = overlaps.first() {
        warn!(
            "{} overlapping particle pairs, first: {} slot {} and {} slot {}",
            overlaps.len(),
            first.first.1.as_str(),
            first.first.0,
            first.second.1.as_str(),
            first.second.0
        );
        return Err(Error::OverlappingParticles { count: overlaps.len() });
    }
    Ok(())
}

fn log_totals(name: &str, set: &ParticleSet) {
    info!(
        "{}: {} particles ({} boundary, {} gate, {} obstacle, {} fluid)",
        name,
        set.total(),
        set.boundary.len(),
        set.gate.len(),
        set.obstacle.len(),
        set.fluid.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::V;

    #[test]
    fn variant_follows_configuration() {
        let scenario = Scenario::new(ScenarioParams::dam_break_gate()).unwrap();
        assert_eq!(scenario.name(), "DamBreakGate");
        assert_eq!(scenario.moving_boundaries().len(), 1);

        let scenario = Scenario::new(ScenarioParams::dam_break()).unwrap();
        assert_eq!(scenario.name(), "DamBreak");
        assert!(scenario.moving_boundaries().is_empty());
    }

    #[test]
    fn invalid_configuration_fails_before_generation() {
        let params = ScenarioParams {
            deltap: 0.,
            ..ScenarioParams::dam_break_gate()
        };
        assert!(matches!(Scenario::new(params), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn unknown_boundary_index_is_an_error() {
        let mut scenario = Scenario::new(ScenarioParams::dam_break_gate()).unwrap();
        assert!(scenario.boundary_kinematics(0.3, 0.001, 0).is_ok());
        assert!(matches!(
            scenario.boundary_kinematics(0.3, 0.001, 1),
            Err(Error::UnknownBoundary { index: 1, count: 1 })
        ));
    }

    #[test]
    fn grid_hasher_spans_the_world() {
        let scenario = Scenario::new(ScenarioParams::dam_break_gate()).unwrap();
        let hasher = scenario.grid_hasher();
        assert_eq!(hasher.grid_size(), V::<u32, 3>::new(41, 17, 28));
    }
}
