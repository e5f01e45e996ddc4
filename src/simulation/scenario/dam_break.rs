use crate::{
    error::Result, geometry::Object, kinematics::MovingBoundaryState, particle_set::ParticleSet,
    scenario_parameters::ScenarioParams,
};

use super::{check_overlaps, fluid_column, log_totals, walls, Problem};

/// Water column collapsing in an open box. No gate, no obstacle, nothing moves.
pub struct DamBreak {
    params: ScenarioParams,
    particles: ParticleSet,
}

impl DamBreak {
    pub fn new(params: ScenarioParams) -> DamBreak {
        DamBreak {
            params,
            particles: ParticleSet::default(),
        }
    }
}

impl Problem for DamBreak {
    fn name(&self) -> &'static str {
        "DamBreak"
    }

    fn params(&self) -> &ScenarioParams {
        &self.params
    }

    fn generate_particles(&mut self) -> Result<usize> {
        let r0 = self.params.r0();
        let walls = walls(&self.params);
        let column = fluid_column(&self.params);

        let set = &mut self.particles;
        set.clear();
        set.boundary.reserve_exact(walls.fill_border_count(r0, false));
        set.fluid.reserve_exact(column.fill_count(self.params.deltap, true));

        walls.fill_border(&mut set.boundary, r0, false);
        column.fill(&mut set.fluid, self.params.deltap, true);

        check_overlaps(&self.params, &self.particles)?;
        log_totals(self.name(), &self.particles);

        Ok(self.particles.total())
    }

    fn particle_set(&self) -> &ParticleSet {
        &self.particles
    }

    fn release_particles(&mut self) {
        self.particles.clear();
    }

    fn moving_boundaries(&self) -> &[MovingBoundaryState] {
        &[]
    }

    fn moving_boundaries_mut(&mut self) -> &mut [MovingBoundaryState] {
        &mut []
    }
}
