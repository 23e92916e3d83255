//! Composite bodies: several leaves welded into one rigid aggregate.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    body::{inverse_inertia, Body},
    compose,
    shapes::{CompositeShape, Shape},
    types::{ensure_mass, BodyOptions, Material},
};
use crate::{
    error::{ConfigError, Result},
    utils::allocator::BodyId,
    world::BodySet,
};

/// Options for [`BodySet::insert_composite`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeOptions {
    /// Constituents; composites among them contribute their leaves.
    pub bodies: Vec<BodyId>,
    /// Push the composite's mass, friction and restitution down onto the
    /// leaves instead of aggregating the leaves' own values.
    #[serde(default)]
    pub use_parent_props: bool,
    #[serde(default)]
    pub body: BodyOptions,
}

impl CompositeOptions {
    pub fn new(bodies: Vec<BodyId>) -> Self {
        Self {
            bodies,
            ..Self::default()
        }
    }

    pub fn with_parent_props(mut self, use_parent_props: bool) -> Self {
        self.use_parent_props = use_parent_props;
        self
    }

    pub fn with_body(mut self, body: BodyOptions) -> Self {
        self.body = body;
        self
    }
}

impl BodySet {
    /// Builds a composite from existing bodies and returns its id.
    ///
    /// Bottom-up (default): mass is the sum of the leaves' masses and leaves
    /// keep their own mass, friction and restitution.
    ///
    /// Top-down (`use_parent_props`): the composite mass (explicit, or
    /// `density * area`) is spread over the leaves at uniform density, every
    /// leaf takes the composite's friction and restitution (its own values are
    /// discarded), and leaf inertias are re-expressed about the composite
    /// centroid.
    ///
    /// Either way every leaf is re-parented to the composite and inherits its
    /// pivot, static/kinetic flags and collision mask.
    pub fn insert_composite(&mut self, options: CompositeOptions) -> Result<BodyId> {
        options.body.validate()?;
        if options.bodies.is_empty() {
            return Err(ConfigError::EmptyComposite.into());
        }

        let mut parts = Vec::new();
        for &constituent in &options.bodies {
            for &leaf in self.body(constituent)?.parts() {
                if parts.contains(&leaf) {
                    return Err(ConfigError::SharedLeaf(leaf).into());
                }
                parts.push(leaf);
            }
        }

        let top_down = options.use_parent_props;
        let (area, bound, mass) = {
            let leaves = self.resolve(&parts)?;
            let area = compose::area(leaves.iter().copied());
            let bound = compose::bound(leaves.iter().copied());
            let mass = if top_down {
                options.body.mass.unwrap_or(options.body.density * area)
            } else {
                compose::mass(leaves.iter().copied())
            };
            (area, bound, ensure_mass(mass)?)
        };
        let density = mass / area;

        if top_down {
            let material = Material::new(
                options.body.material.friction,
                options.body.material.restitution,
            );
            debug!(
                "composite over {} leaves: density {density:.4}, overriding leaf friction/restitution",
                parts.len()
            );
            for &part in &parts {
                if let Some(leaf) = self.bodies.get_mut(part) {
                    leaf.mass = leaf.area * density;
                    leaf.density = density;
                    leaf.material = material;
                }
            }
        }

        let position = compose::centroid(self.resolve(&parts)?, mass);

        if top_down {
            for &part in &parts {
                if let Some(leaf) = self.bodies.get_mut(part) {
                    leaf.inertia = leaf.inertia_about(position);
                }
            }
        }
        let inertia = compose::inertia(self.resolve(&parts)?);

        let id = self.bodies.next_id();
        for &part in &parts {
            if let Some(leaf) = self.bodies.get_mut(part) {
                leaf.rotate_center = position;
                leaf.parent = Some(id);
                leaf.is_static = options.body.is_static;
                leaf.is_kinetic = options.body.is_kinetic;
                leaf.mask = options.body.mask;
                leaf.refresh_inverse_inertia();
            }
        }

        let shape = Shape::Composite(CompositeShape {
            use_parent_props: top_down,
        });
        let mut composite = Body::with_shape(shape, &options.body);
        composite.mass = mass;
        composite.area = area;
        composite.density = density;
        composite.position = position;
        composite.rotate_center = position;
        composite.inertia = inertia;
        composite.inv_inertia = inverse_inertia(inertia, composite.is_static);
        if let Some(bound) = bound {
            composite.bound = bound;
        }
        composite.parts = parts;

        let leaf_count = composite.parts.len();
        let id = self.insert(composite);
        debug!("composite {id}: {leaf_count} leaves, mass {mass:.4}, inertia {inertia:.4}");

        if let Some(target) = options.body.position {
            self.translate(id, target.x - position.x, target.y - position.y)?;
        }
        if options.body.rotation != 0.0 {
            self.rotate(id, options.body.rotation)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::body::RectangleOptions;
    use crate::error::KernelError;
    use glam::DVec2;

    fn rect(set: &mut BodySet, origin: DVec2, mass: f64) -> BodyId {
        let body = Body::rectangle(
            RectangleOptions::new(1.0, 1.0)
                .with_origin(origin)
                .with_body(BodyOptions::default().with_mass(mass)),
        )
        .unwrap();
        set.insert(body)
    }

    #[test]
    fn empty_composite_is_rejected() {
        let mut set = BodySet::new();
        let err = set.insert_composite(CompositeOptions::new(vec![])).unwrap_err();
        assert!(matches!(err, KernelError::Config(ConfigError::EmptyComposite)));
    }

    #[test]
    fn shared_leaf_is_rejected() {
        let mut set = BodySet::new();
        let a = rect(&mut set, DVec2::ZERO, 1.0);
        let err = set
            .insert_composite(CompositeOptions::new(vec![a, a]))
            .unwrap_err();
        assert!(matches!(err, KernelError::Config(ConfigError::SharedLeaf(leaf)) if leaf == a));
    }

    #[test]
    fn bottom_up_keeps_leaf_materials() {
        let mut set = BodySet::new();
        let a = rect(&mut set, DVec2::ZERO, 1.0);
        set.get_mut(a).unwrap().material = Material::rubber();
        let b = rect(&mut set, DVec2::new(1.0, 0.0), 3.0);

        let id = set
            .insert_composite(
                CompositeOptions::new(vec![a, b])
                    .with_body(BodyOptions::default().with_material(Material::ice())),
            )
            .unwrap();

        assert_eq!(set.get(a).unwrap().material, Material::rubber());
        assert_eq!(set.get(id).unwrap().mass, 4.0);
        assert_eq!(set.get(a).unwrap().parent(), Some(id));
    }

    #[test]
    fn top_down_overrides_leaf_materials() {
        let mut set = BodySet::new();
        let a = rect(&mut set, DVec2::ZERO, 1.0);
        set.get_mut(a).unwrap().material = Material::rubber();
        let b = rect(&mut set, DVec2::new(1.0, 0.0), 3.0);

        set.insert_composite(
            CompositeOptions::new(vec![a, b])
                .with_parent_props(true)
                .with_body(
                    BodyOptions::default()
                        .with_mass(10.0)
                        .with_material(Material::ice()),
                ),
        )
        .unwrap();

        for leaf in [a, b] {
            let leaf = set.get(leaf).unwrap();
            assert_eq!(leaf.material, Material::ice());
            assert!((leaf.mass - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn static_composite_zeroes_inverse_inertia() {
        let mut set = BodySet::new();
        let a = rect(&mut set, DVec2::ZERO, 1.0);
        let id = set
            .insert_composite(
                CompositeOptions::new(vec![a])
                    .with_body(BodyOptions::default().with_static(true).with_mask(0b10)),
            )
            .unwrap();

        let leaf = set.get(a).unwrap();
        assert!(leaf.is_static);
        assert_eq!(leaf.mask, 0b10);
        assert_eq!(leaf.inv_inertia, 0.0);
        assert_eq!(set.get(id).unwrap().inv_inertia, 0.0);
    }
}
