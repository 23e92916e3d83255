use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Common math type re-exported for convenience.
pub use glam::DVec2 as Vec2;

/// Surface coefficients consumed by the (external) contact solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub friction: f64,
    /// Coefficient of bounce in `[0, 1]`.
    pub restitution: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.0,
        }
    }
}

impl Material {
    /// Builds a material, clamping friction to `>= 0` and restitution into `[0, 1]`.
    pub fn new(friction: f64, restitution: f64) -> Self {
        Self {
            friction: friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    pub fn ice() -> Self {
        Self::new(0.02, 0.05)
    }

    pub fn rubber() -> Self {
        Self::new(1.0, 0.8)
    }
}

/// Options shared by every body variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOptions {
    /// Explicit mass. When absent the mass is `density * area`.
    pub mass: Option<f64>,
    pub density: f64,
    pub material: Material,
    pub is_static: bool,
    /// Moves, but is not affected by forces.
    pub is_kinetic: bool,
    /// Collision filter bitmask.
    pub mask: u32,
    /// Where the centroid is moved to after construction.
    pub position: Option<Vec2>,
    /// Initial rotation applied about the centroid after construction.
    pub rotation: f64,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            mass: None,
            density: 1.0,
            material: Material::default(),
            is_static: false,
            is_kinetic: false,
            mask: u32::MAX,
            position: None,
            rotation: 0.0,
        }
    }
}

impl BodyOptions {
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_kinetic(mut self, is_kinetic: bool) -> Self {
        self.is_kinetic = is_kinetic;
        self
    }

    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(ConfigError::NonPositiveDensity(self.density));
        }
        if let Some(mass) = self.mass {
            ensure_mass(mass)?;
        }
        Ok(())
    }
}

pub(crate) fn ensure_mass(mass: f64) -> Result<f64, ConfigError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(ConfigError::NonPositiveMass(mass))
    }
}
