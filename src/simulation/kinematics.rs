use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{particle_class::ParticleClass, V3D};

/// Prescribed motion of one boundary object. The velocity ramps up linearly inside
/// `[t_start, t_end)` and is zero outside of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingBoundaryState {
    pub class: ParticleClass,
    pub origin: V3D,
    pub t_start: f64,
    pub t_end: f64,
    /// Velocity gain per second of active motion.
    pub rate: f64,
    /// Unit direction of motion.
    pub direction: V3D,

    pub velocity: V3D,
    pub displacement: V3D,

    #[serde(skip)]
    last_time: Option<f64>,
}

impl MovingBoundaryState {
    pub fn new(class: ParticleClass, origin: V3D, t_start: f64, t_end: f64, rate: f64, direction: V3D) -> Self {
        MovingBoundaryState {
            class,
            origin,
            t_start,
            t_end,
            rate,
            direction,
            velocity: V3D::zeros(),
            displacement: V3D::zeros(),
            last_time: None,
        }
    }

    pub fn is_active(&self, t: f64) -> bool {
        t >= self.t_start && t < self.t_end
    }

    /// Explicit forward step: velocity is evaluated at `t`, then `displacement += velocity * dt`.
    ///
    /// Must be called once per integration step with non-decreasing `t`. An earlier `t` is
    /// applied as given; nothing is rolled back.
    pub fn advance(&mut self, t: f64, dt: f64) -> &mut Self {
        if let Some(last_time) = self.last_time {
            if t < last_time {
                warn!(
                    "moving boundary stepped back in time from {} to {}, keeping accumulated displacement",
                    last_time, t
                );
            }
        }
        self.last_time = Some(t);

        if self.is_active(t) {
            self.velocity = self.direction * (self.rate * (t - self.t_start));
            self.displacement += self.velocity * dt;
        } else {
            self.velocity = V3D::zeros();
        }

        self
    }

    /// Current position of a point that started at `p` on this boundary.
    pub fn moved_position(&self, p: V3D) -> V3D {
        p + self.displacement
    }
}
