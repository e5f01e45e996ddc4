use crate::{
    error::{Error, Result},
    hashing::{UniformGridHasher, MAX_CELLS},
    vec3d, V3D,
};
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Water column held back by a lifting gate, with an obstacle downstream.
    DamBreakGate,
    /// Plain water column in an open box.
    DamBreak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateParams {
    pub t_start: f64,
    pub t_end: f64,
    // velocity = direction * rate * (t - t_start)
    pub rate: f64,
    pub direction: V3D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleParams {
    // footprint in the xy-plane, the obstacle spans the full box height
    pub position: [f64; 2],
    pub size: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub scenario: ScenarioKind,

    pub origin: V3D,
    // the experiment box (walls), open at the top
    pub box_size: V3D,
    // the simulated world, usually taller than the box
    pub world_size: V3D,

    // fluid particle spacing
    pub deltap: f64,
    // boundary particle spacing and distance of the fluid to the walls, defaults to `deltap`
    #[serde(default)]
    pub wall_offset: Option<f64>,
    pub rest_density: f64,

    // smoothing length = smoothing_factor * deltap
    pub smoothing_factor: f64,
    // influence radius = kernel_radius * smoothing length
    pub kernel_radius: f64,

    // [length along x, height]
    pub fluid_column: [f64; 2],

    pub gate: GateParams,
    pub obstacle: ObstacleParams,

    #[serde(default)]
    pub wet_bed: bool,
    #[serde(default = "default_wet_bed_depth")]
    pub wet_bed_depth: f64,

    // time stepping of the driver loop
    pub dt: f64,
    pub t_end: f64,

    #[serde(default = "default_check_overlaps")]
    pub check_overlaps: bool,
    #[serde(default = "default_overlap_tolerance")]
    pub overlap_tolerance: f64,
}

fn default_wet_bed_depth() -> f64 {
    0.03
}

fn default_check_overlaps() -> bool {
    true
}

fn default_overlap_tolerance() -> f64 {
    1e-6
}

impl Default for ScenarioParams {
    fn default() -> Self {
        ScenarioParams::dam_break_gate()
    }
}

impl ScenarioParams {
    /// 1.6m x 0.67m x 0.4m tank with a 0.4m water column, a gate lifting between 0.2s and 0.6s
    /// and a 0.12m square obstacle.
    pub fn dam_break_gate() -> ScenarioParams {
        ScenarioParams {
            scenario: ScenarioKind::DamBreakGate,
            origin: vec3d(0., 0., 0.),
            box_size: vec3d(1.6, 0.67, 0.4),
            world_size: vec3d(1.6, 0.67, 0.4 + 0.7),
            deltap: 0.015,
            wall_offset: None,
            rest_density: 1000.,
            smoothing_factor: 1.3,
            kernel_radius: 2.,
            fluid_column: [0.4, 0.4],
            gate: GateParams {
                t_start: 0.2,
                t_end: 0.6,
                rate: 4.,
                direction: vec3d(0., 0., 1.),
            },
            obstacle: ObstacleParams {
                position: [0.9, 0.24],
                size: [0.12, 0.12],
            },
            wet_bed: false,
            wet_bed_depth: default_wet_bed_depth(),
            dt: 0.0001,
            t_end: 10.,
            check_overlaps: default_check_overlaps(),
            overlap_tolerance: default_overlap_tolerance(),
        }
    }

    pub fn dam_break() -> ScenarioParams {
        ScenarioParams {
            scenario: ScenarioKind::DamBreak,
            ..ScenarioParams::dam_break_gate()
        }
    }

    pub fn r0(&self) -> f64 {
        self.wall_offset.unwrap_or(self.deltap)
    }

    pub fn smoothing_length(&self) -> f64 {
        self.smoothing_factor * self.deltap
    }

    pub fn influence_radius(&self) -> f64 {
        self.kernel_radius * self.smoothing_length()
    }

    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f64) -> Result<()> {
            if v > 0. && v.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{} must be positive and finite, got {}", name, v)))
            }
        }

        positive("deltap", self.deltap)?;
        positive("wall_offset", self.r0())?;
        positive("rest_density", self.rest_density)?;
        positive("smoothing_factor", self.smoothing_factor)?;
        positive("kernel_radius", self.kernel_radius)?;
        positive("dt", self.dt)?;
        for d in 0..3 {
            positive("box_size", self.box_size[d])?;
            positive("world_size", self.world_size[d])?;
        }
        positive("fluid_column length", self.fluid_column[0])?;
        positive("fluid_column height", self.fluid_column[1])?;

        let min_extent = self.box_size.iter().cloned().fold(f64::INFINITY, f64::min);
        if self.deltap >= min_extent || self.r0() >= min_extent {
            return Err(Error::InvalidConfig(format!(
                "particle spacing (deltap={}, wall_offset={}) must be smaller than the smallest box extent {}",
                self.deltap,
                self.r0(),
                min_extent
            )));
        }

        let cells = UniformGridHasher::cell_count_for(self.world_size, self.influence_radius());
        if cells > MAX_CELLS {
            return Err(Error::InvalidConfig(format!(
                "world_size {:?} needs {} hash cells at influence radius {}, at most {} fit into a hash key",
                self.world_size.as_slice(),
                cells,
                self.influence_radius(),
                MAX_CELLS
            )));
        }

        if !self.origin.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidConfig("origin must be finite".to_string()));
        }

        if self.scenario == ScenarioKind::DamBreakGate {
            let gate = &self.gate;
            if !(gate.t_start <= gate.t_end) || !gate.t_start.is_finite() || !gate.t_end.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "gate motion window [{}, {}) is not ordered",
                    gate.t_start, gate.t_end
                )));
            }
            if !(gate.direction.norm() > 0.) || !gate.rate.is_finite() {
                return Err(Error::InvalidConfig(
                    "gate direction must be non-zero and rate finite".to_string(),
                ));
            }
            for d in 0..2 {
                positive("obstacle size", self.obstacle.size[d])?;
            }
            if self.wet_bed {
                positive("wet_bed_depth", self.wet_bed_depth)?;
            }
        }

        positive("overlap_tolerance", self.overlap_tolerance)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ScenarioParams::dam_break_gate().validate().unwrap();
        ScenarioParams::dam_break().validate().unwrap();
    }

    #[test]
    fn derived_lengths() {
        let params = ScenarioParams::dam_break_gate();
        assert_eq!(params.r0(), 0.015);
        assert!((params.influence_radius() - 0.039).abs() < 1e-12);

        let params = ScenarioParams {
            wall_offset: Some(0.01),
            ..ScenarioParams::dam_break_gate()
        };
        assert_eq!(params.r0(), 0.01);
    }

    #[test]
    fn spacing_not_below_extent_is_rejected() {
        let params = ScenarioParams {
            deltap: 0.5,
            ..ScenarioParams::dam_break_gate()
        };
        assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn non_positive_domain_is_rejected() {
        let mut params = ScenarioParams::dam_break_gate();
        params.box_size.y = 0.;
        assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));

        let mut params = ScenarioParams::dam_break_gate();
        params.deltap = -0.01;
        assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn world_too_large_for_hash_keys_is_rejected() {
        let mut params = ScenarioParams::dam_break_gate();
        params.world_size = vec3d(1000., 1000., 1000.);
        assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));

        // same world is fine once the cells are wide enough
        params.kernel_radius = 2000.;
        params.validate().unwrap();
    }

    #[test]
    fn reversed_gate_window_is_rejected() {
        let mut params = ScenarioParams::dam_break_gate();
        params.gate.t_start = 0.7;
        assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn yaml_roundtrip_keeps_optional_defaults() {
        let yaml = serde_yaml::to_string(&ScenarioParams::dam_break_gate()).unwrap();
        let params: ScenarioParams = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(params.scenario, ScenarioKind::DamBreakGate);
        assert_eq!(params.box_size, vec3d(1.6, 0.67, 0.4));
        assert!(!params.wet_bed);
        assert_eq!(params.wet_bed_depth, 0.03);

        let trimmed = yaml
            .lines()
            .filter(|l| !l.starts_with("check_overlaps") && !l.starts_with("wet_bed"))
            .collect::<Vec<_>>()
            .join("\n");
        let params: ScenarioParams = serde_yaml::from_str(&trimmed).unwrap();
        assert!(params.check_overlaps);
        assert_eq!(params.wet_bed_depth, 0.03);
    }
}
