use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{
    bound::Bound,
    shapes::{Geometry, Polygon, Rectangle, Shape},
    types::{ensure_mass, BodyOptions, Material},
};
use crate::error::ConfigError;
use crate::utils::{allocator::BodyId, math::rotate_about};

/// Options for [`Body::rectangle`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleOptions {
    pub width: f64,
    pub height: f64,
    /// Top-left corner.
    #[serde(default)]
    pub origin: DVec2,
    #[serde(default)]
    pub body: BodyOptions,
}

impl RectangleOptions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin: DVec2::ZERO,
            body: BodyOptions::default(),
        }
    }

    pub fn with_origin(mut self, origin: DVec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_body(mut self, body: BodyOptions) -> Self {
        self.body = body;
        self
    }
}

/// Options for [`Body::polygon`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonOptions {
    pub vertices: Vec<DVec2>,
    #[serde(default)]
    pub body: BodyOptions,
}

/// Rigid 2D body: a primitive leaf shape or a composite of leaves.
///
/// Topology (`id`, `shape`, `parent`, `parts`) is fixed once the body is in a
/// [`BodySet`](crate::world::BodySet); the numeric state is public and is
/// mutated in place by transforms and by the host's integration step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    id: BodyId,
    shape: Shape,
    pub position: DVec2,
    pub rotation: f64,
    pub mass: f64,
    pub density: f64,
    pub area: f64,
    pub inertia: f64,
    pub inv_inertia: f64,
    pub material: Material,
    pub is_static: bool,
    pub is_kinetic: bool,
    pub mask: u32,
    pub bound: Bound,
    /// Pivot for rotations: the body's own centroid, or its composite's position.
    pub rotate_center: DVec2,
    pub(crate) parent: Option<BodyId>,
    pub(crate) parts: Vec<BodyId>,
}

/// `0` for static bodies and for zero inertia, `1 / inertia` otherwise.
pub fn inverse_inertia(inertia: f64, is_static: bool) -> f64 {
    if is_static || inertia == 0.0 {
        0.0
    } else {
        1.0 / inertia
    }
}

impl Body {
    pub fn rectangle(options: RectangleOptions) -> Result<Self, ConfigError> {
        let rect = Rectangle::new(options.width, options.height, options.origin)?;
        Self::leaf(rect, Shape::Rectangle, &options.body)
    }

    pub fn polygon(options: PolygonOptions) -> Result<Self, ConfigError> {
        let polygon = Polygon::new(options.vertices)?;
        Self::leaf(polygon, Shape::Polygon, &options.body)
    }

    fn leaf<G: Geometry>(
        geometry: G,
        wrap: fn(G) -> Shape,
        options: &BodyOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let (area, position, bound) = (geometry.area(), geometry.centroid(), geometry.bound());
        let mass = ensure_mass(options.mass.unwrap_or(options.density * area))?;

        let mut body = Self::with_shape(wrap(geometry), options);
        body.area = area;
        body.mass = mass;
        body.density = mass / area;
        body.position = position;
        body.rotate_center = position;
        body.bound = bound;
        body.inertia = body.inertia_about(position);
        body.refresh_inverse_inertia();

        if let Some(target) = options.position {
            body.translate_leaf(target - position);
            body.rotate_center = body.position;
        }
        if options.rotation != 0.0 {
            body.rotate_leaf(body.rotate_center, options.rotation);
        }
        Ok(body)
    }

    /// Blank body carrying only the caller-supplied flags.
    pub(crate) fn with_shape(shape: Shape, options: &BodyOptions) -> Self {
        Self {
            id: BodyId::default(),
            shape,
            position: DVec2::ZERO,
            rotation: 0.0,
            mass: options.mass.unwrap_or(0.0),
            density: options.density,
            area: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            material: Material::new(options.material.friction, options.material.restitution),
            is_static: options.is_static,
            is_kinetic: options.is_kinetic,
            mask: options.mask,
            bound: Bound::new(DVec2::ZERO, DVec2::ZERO),
            rotate_center: DVec2::ZERO,
            parent: None,
            parts: Vec::new(),
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
        if !self.is_composite() {
            self.parts = vec![id];
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_composite(&self) -> bool {
        self.shape.is_composite()
    }

    /// Owning composite, if this leaf has been merged into one.
    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    /// `[self]` for a leaf, the flattened leaves for a composite.
    pub fn parts(&self) -> &[BodyId] {
        &self.parts
    }

    /// Current vertices of a leaf; empty for composites.
    pub fn vertices(&self) -> &[DVec2] {
        self.shape
            .geometry()
            .map(|g| g.vertices())
            .unwrap_or_default()
    }

    /// Geometric centroid of a leaf. Composites report their cached position,
    /// use [`BodySet::centroid`](crate::world::BodySet::centroid) to re-derive it.
    pub fn centroid(&self) -> DVec2 {
        self.shape
            .geometry()
            .map_or(self.position, |g| g.centroid())
    }

    /// Inertia about `point`: own-centroid inertia plus `mass * d^2`.
    /// Composites return their stored inertia unchanged.
    pub fn inertia_about(&self, point: DVec2) -> f64 {
        match self.shape.geometry() {
            Some(geometry) => {
                geometry.inertia(self.mass) + self.mass * geometry.centroid().distance_squared(point)
            }
            None => self.inertia,
        }
    }

    pub fn refresh_inverse_inertia(&mut self) {
        self.inv_inertia = inverse_inertia(self.inertia, self.is_static);
    }

    /// Point containment for a leaf. Composites answer through the body set.
    pub fn contains_point(&self, point: DVec2) -> bool {
        self.shape
            .geometry()
            .is_some_and(|g| g.contains_point(point))
    }

    /// Rigidly shifts a leaf's position, geometry and bound.
    pub(crate) fn translate_leaf(&mut self, delta: DVec2) {
        self.position += delta;
        if let Some(geometry) = self.shape.geometry_mut() {
            geometry.translate(delta);
        }
        self.bound.translate(delta.x, delta.y);
    }

    /// Rotates a leaf about `pivot` and rebuilds its bound from the rotated vertices.
    pub(crate) fn rotate_leaf(&mut self, pivot: DVec2, radian: f64) {
        self.rotation += radian;
        self.position = rotate_about(self.position, pivot, radian);
        if let Some(geometry) = self.shape.geometry_mut() {
            geometry.rotate_about(pivot, radian);
            self.bound = geometry.bound();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rectangle_inertia_uses_thin_plate_formula() {
        let body = Body::rectangle(
            RectangleOptions::new(1.0, 1.0).with_body(BodyOptions::default().with_mass(12.0)),
        )
        .unwrap();
        assert_eq!(body.inertia, 2.0);
        assert_eq!(body.inv_inertia, 0.5);
    }

    #[test]
    fn mass_defaults_to_density_times_area() {
        let body = Body::rectangle(
            RectangleOptions::new(2.0, 3.0).with_body(BodyOptions::default().with_density(0.5)),
        )
        .unwrap();
        assert_eq!(body.area, 6.0);
        assert_eq!(body.mass, 3.0);
        assert_eq!(body.density, 0.5);
    }

    #[test]
    fn static_and_zero_inertia_have_no_inverse() {
        assert_eq!(inverse_inertia(0.0, false), 0.0);
        assert_eq!(inverse_inertia(4.0, true), 0.0);
        assert_eq!(inverse_inertia(4.0, false), 0.25);

        let body = Body::rectangle(
            RectangleOptions::new(1.0, 1.0).with_body(BodyOptions::default().with_static(true)),
        )
        .unwrap();
        assert!(body.inertia > 0.0);
        assert_eq!(body.inv_inertia, 0.0);
    }

    #[test]
    fn position_option_moves_centroid() {
        let body = Body::rectangle(
            RectangleOptions::new(2.0, 2.0)
                .with_body(BodyOptions::default().with_position(DVec2::new(10.0, 5.0))),
        )
        .unwrap();
        assert_eq!(body.position, DVec2::new(10.0, 5.0));
        assert_eq!(body.centroid(), DVec2::new(10.0, 5.0));
        assert_eq!(body.bound.min, DVec2::new(9.0, 4.0));
        assert_eq!(body.rotate_center, body.position);
    }

    #[test]
    fn rotation_option_swaps_rectangle_extents() {
        let body = Body::rectangle(
            RectangleOptions::new(4.0, 1.0)
                .with_body(BodyOptions::default().with_rotation(FRAC_PI_2)),
        )
        .unwrap();
        assert!((body.bound.width() - 1.0).abs() < 1e-9);
        assert!((body.bound.height() - 4.0).abs() < 1e-9);
        assert!((body.position - DVec2::new(2.0, 0.5)).length() < 1e-9);
        assert_eq!(body.rotation, FRAC_PI_2);
    }

    #[test]
    fn inertia_about_applies_parallel_axis() {
        let body = Body::rectangle(
            RectangleOptions::new(1.0, 1.0).with_body(BodyOptions::default().with_mass(12.0)),
        )
        .unwrap();
        let shifted = body.inertia_about(body.position + DVec2::new(3.0, 4.0));
        assert!((shifted - (2.0 + 12.0 * 25.0)).abs() < 1e-9);
    }
}
