use crate::{
    floating_type_mod::FT,
    geometry::Particle,
    particle_class::ParticleInfo,
    V, V3D,
};

pub type HashKey = u32;

/// Largest grid whose linear cell index still fits into a [`HashKey`].
pub const MAX_CELLS: u64 = HashKey::MAX as u64;

/// Turns a world-space particle into the solver's cell-relative position (mass in `w`) and the
/// hash of the cell it falls into. The neighbor search that consumes the hash lives in the solver.
pub trait SpatialHasher: Sync {
    fn localpos_and_hash(&self, particle: &Particle, info: &ParticleInfo) -> ([FT; 4], HashKey);
}

/// Uniform grid over the world box. Cells are at least one influence radius wide.
#[derive(Debug, Clone)]
pub struct UniformGridHasher {
    world_origin: V3D,
    cell_size: V3D,
    grid_size: V<u32, 3>,
}

impl UniformGridHasher {
    pub fn new(world_origin: V3D, world_size: V3D, influence_radius: f64) -> UniformGridHasher {
        let grid_size = Self::grid_size_for(world_size, influence_radius);
        assert!(
            Self::cell_count_for(world_size, influence_radius) <= MAX_CELLS,
            "grid {:?} has more cells than hash keys",
            grid_size.as_slice()
        );
        let cell_size = world_size.component_div(&grid_size.map(|n| n as f64));

        UniformGridHasher {
            world_origin,
            cell_size,
            grid_size,
        }
    }

    /// Cells per axis for a world box, each cell at least `influence_radius` wide.
    pub fn grid_size_for(world_size: V3D, influence_radius: f64) -> V<u32, 3> {
        world_size.map(|len| {
            if influence_radius > 0. && len.is_finite() {
                ((len / influence_radius).floor() as u32).max(1)
            } else {
                1
            }
        })
    }

    /// Total number of cells, computed without overflow. Hash keys only exist for grids of
    /// at most [`MAX_CELLS`] cells.
    pub fn cell_count_for(world_size: V3D, influence_radius: f64) -> u64 {
        Self::grid_size_for(world_size, influence_radius)
            .iter()
            .fold(1u64, |acc, &n| acc.saturating_mul(n as u64))
    }

    pub fn grid_size(&self) -> V<u32, 3> {
        self.grid_size
    }

    pub fn cell_size(&self) -> V3D {
        self.cell_size
    }

    pub fn num_cells(&self) -> usize {
        self.grid_size.iter().fold(1, |acc, &x| acc * x as usize)
    }

    /// Cell coordinates of `p`. Positions on or beyond the world box snap to the border cells.
    pub fn grid_pos(&self, p: V3D) -> V<u32, 3> {
        let rel = (p - self.world_origin).component_div(&self.cell_size);
        V::<u32, 3>::from_iterator((0..3).map(|d| {
            let cell = rel[d].floor();
            if cell.is_nan() || cell < 0. {
                0
            } else {
                (cell as u32).min(self.grid_size[d] - 1)
            }
        }))
    }

    pub fn grid_hash(&self, grid_pos: V<u32, 3>) -> HashKey {
        (grid_pos.z * self.grid_size.y + grid_pos.y) * self.grid_size.x + grid_pos.x
    }

    pub fn hash_to_grid_pos(&self, hash: HashKey) -> V<u32, 3> {
        let x = hash % self.grid_size.x;
        let y = (hash / self.grid_size.x) % self.grid_size.y;
        let z = hash / (self.grid_size.x * self.grid_size.y);
        [x, y, z].into()
    }

    pub fn cell_center(&self, grid_pos: V<u32, 3>) -> V3D {
        self.world_origin + (grid_pos.map(|x| x as f64) + V3D::repeat(0.5)).component_mul(&self.cell_size)
    }

    /// Inverse of `localpos_and_hash` (up to `FT` rounding).
    pub fn world_position(&self, hash: HashKey, local_pos: [FT; 4]) -> V3D {
        let local: V3D = [local_pos[0] as f64, local_pos[1] as f64, local_pos[2] as f64].into();
        self.cell_center(self.hash_to_grid_pos(hash)) + local
    }
}

impl SpatialHasher for UniformGridHasher {
    fn localpos_and_hash(&self, particle: &Particle, _info: &ParticleInfo) -> ([FT; 4], HashKey) {
        let grid_pos = self.grid_pos(particle.position);
        let local = particle.position - self.cell_center(grid_pos);
        (
            [local.x as FT, local.y as FT, local.z as FT, particle.mass as FT],
            self.grid_hash(grid_pos),
        )
    }
}
