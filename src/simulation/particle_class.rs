use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// The lower bits of the type word are reserved for the fluid number.
pub const MAX_FLUID_BITS: u16 = 4;

pub const FLUID_PART: u16 = 0;
pub const BOUNDARY_PART: u16 = 1 << MAX_FLUID_BITS;
pub const GATE_PART: u16 = 4 << MAX_FLUID_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleClass {
    Boundary,
    Gate,
    Obstacle,
    Fluid,
}

impl ParticleClass {
    /// Order of the classes inside the packed buffers. The solver derives its per-material
    /// dispatch ranges from this order.
    pub const PACKING_ORDER: [ParticleClass; 4] = [
        ParticleClass::Boundary,
        ParticleClass::Gate,
        ParticleClass::Obstacle,
        ParticleClass::Fluid,
    ];

    pub fn material(self) -> u16 {
        match self {
            ParticleClass::Boundary | ParticleClass::Obstacle => BOUNDARY_PART,
            ParticleClass::Gate => GATE_PART,
            ParticleClass::Fluid => FLUID_PART,
        }
    }

    /// Distinguishes several objects made of the same material.
    pub fn object(self) -> u16 {
        match self {
            ParticleClass::Obstacle => 1,
            _ => 0,
        }
    }

    pub fn packing_position(self) -> usize {
        match self {
            ParticleClass::Boundary => 0,
            ParticleClass::Gate => 1,
            ParticleClass::Obstacle => 2,
            ParticleClass::Fluid => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParticleClass::Boundary => "Boundary",
            ParticleClass::Gate => "Gate",
            ParticleClass::Obstacle => "Obstacle",
            ParticleClass::Fluid => "Fluid",
        }
    }
}

/// Per-particle metadata record as read by the GPU kernels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct ParticleInfo {
    pub material: u16,
    pub object: u16,
    pub id: u32,
}

impl ParticleInfo {
    pub fn new(material: u16, object: u16, id: u32) -> ParticleInfo {
        ParticleInfo { material, object, id }
    }

    pub fn for_class(class: ParticleClass, id: u32) -> ParticleInfo {
        ParticleInfo::new(class.material(), class.object(), id)
    }

    pub fn is_fluid(&self) -> bool {
        self.material >> MAX_FLUID_BITS == 0
    }
}
