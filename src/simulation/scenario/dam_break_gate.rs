use crate::{
    error::Result,
    geometry::{Cube, Object, Rect},
    kinematics::MovingBoundaryState,
    particle_class::ParticleClass,
    particle_set::ParticleSet,
    scenario_parameters::ScenarioParams,
    vec3d, V3D,
};

use super::{check_overlaps, fluid_column, log_totals, walls, Problem};

/// Dam break with a gate that is pulled up and an obstacle in the flow.
///
/// The water column fills the back of the box, the gate closes it off one wall offset behind
/// the column and the square obstacle stands on the floor downstream. With a wet bed, the
/// floor around the obstacle is covered by four thin slabs of water.
pub struct DamBreakGate {
    params: ScenarioParams,
    particles: ParticleSet,
    moving_boundaries: Vec<MovingBoundaryState>,
}

impl DamBreakGate {
    pub fn new(params: ScenarioParams) -> DamBreakGate {
        let gate = &params.gate;
        let mut gate_state = MovingBoundaryState::new(
            ParticleClass::Gate,
            gate_origin(&params),
            gate.t_start,
            gate.t_end,
            gate.rate,
            gate.direction.normalize(),
        );
        gate_state.advance(0., 0.);

        DamBreakGate {
            params,
            particles: ParticleSet::default(),
            moving_boundaries: vec![gate_state],
        }
    }

    /// Gate plane spanning the box cross section. Only its interior lattice is seeded, the
    /// perimeter would coincide with the floor and side walls.
    pub fn gate(&self) -> Rect {
        let box_size = self.params.box_size;
        let mut gate = Rect::new(
            gate_origin(&self.params),
            vec3d(0., box_size.y, 0.),
            vec3d(0., 0., box_size.z),
        );
        gate.set_part_mass_tag(ParticleClass::Gate.material());
        gate
    }

    /// Obstacle standing one wall offset above the floor and reaching up to the box rim.
    pub fn obstacle(&self) -> Cube {
        let params = &self.params;
        let r0 = params.r0();
        let [ox, oy] = params.obstacle.position;
        let [lx, ly] = params.obstacle.size;
        let mut obstacle = Cube::axis_aligned(
            params.origin + vec3d(ox, oy, r0),
            vec3d(lx, ly, params.box_size.z - r0),
        );
        obstacle.set_part_mass(r0, params.rest_density);
        obstacle
    }

    /// Slabs between gate and obstacle, behind the obstacle and on both of its sides. Every slab
    /// keeps one wall offset to the walls, the gate and the obstacle.
    pub fn wet_bed_slabs(&self) -> Vec<Cube> {
        let params = &self.params;
        let r0 = params.r0();
        let depth = params.wet_bed_depth;
        let gate_x = gate_origin(params).x - params.origin.x;
        let [ox, oy] = params.obstacle.position;
        let [lx, ly] = params.obstacle.size;
        let (box_x, box_y) = (params.box_size.x, params.box_size.y);

        let slabs = [
            (
                vec3d(gate_x + r0, r0, r0),
                vec3d(ox - gate_x - 2. * r0, box_y - 2. * r0, depth),
            ),
            (
                vec3d(ox + lx + r0, r0, r0),
                vec3d(box_x - (ox + lx) - 2. * r0, box_y - 2. * r0, depth),
            ),
            (vec3d(ox, r0, r0), vec3d(lx, oy - 2. * r0, depth)),
            (
                vec3d(ox, oy + ly + r0, r0),
                vec3d(lx, box_y - (oy + ly) - 2. * r0, depth),
            ),
        ];

        slabs
            .iter()
            .map(|&(origin, size)| {
                let mut slab = Cube::axis_aligned(params.origin + origin, size);
                slab.set_part_mass(params.deltap, params.rest_density);
                slab
            })
            .collect()
    }
}

fn gate_origin(params: &ScenarioParams) -> V3D {
    params.origin + vec3d(params.fluid_column[0] + 2. * params.r0(), 0., 0.)
}

impl Problem for DamBreakGate {
    fn name(&self) -> &'static str {
        "DamBreakGate"
    }

    fn params(&self) -> &ScenarioParams {
        &self.params
    }

    fn generate_particles(&mut self) -> Result<usize> {
        let r0 = self.params.r0();
        let dp = self.params.deltap;

        let walls = walls(&self.params);
        let gate = self.gate();
        let obstacle = self.obstacle();
        let column = fluid_column(&self.params);
        let slabs = if self.params.wet_bed {
            self.wet_bed_slabs()
        } else {
            Vec::new()
        };

        let set = &mut self.particles;
        set.clear();

        set.boundary.reserve_exact(walls.fill_border_count(r0, false));
        set.gate.reserve_exact(gate.fill_count(r0, false));
        set.obstacle.reserve_exact(obstacle.fill_border_count(r0, true));
        set.fluid.reserve_exact(
            column.fill_count(dp, true) + slabs.iter().map(|s| s.fill_count(dp, true)).sum::<usize>(),
        );

        walls.fill_border(&mut set.boundary, r0, false);
        gate.fill(&mut set.gate, r0, false);
        obstacle.fill_border(&mut set.obstacle, r0, true);
        column.fill(&mut set.fluid, dp, true);
        for slab in &slabs {
            slab.fill(&mut set.fluid, dp, true);
        }

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
        &self.moving_boundaries
    }

    fn moving_boundaries_mut(&mut self) -> &mut [MovingBoundaryState] {
        &mut self.moving_boundaries
    }
}
