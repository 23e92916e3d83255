use glam::DVec2;
use log::debug;

use crate::{
    core::{body::Body, bound::Bound, compose},
    error::{KernelError, Result},
    utils::allocator::{Arena, BodyId},
};

/// Arena owning every body of a simulation.
///
/// Composites reference their leaves by [`BodyId`]; a leaf's `parent` is a
/// plain handle back into this set and never keeps anything alive.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    pub(crate) bodies: Arena<Body>,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a body and returns its id. A leaf becomes its own single part.
    ///
    /// Inserting a copy of an existing composite re-parents the shared leaves
    /// to the new copy.
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        let id = self.bodies.next_id();
        body.set_id(id);
        if body.is_composite() {
            for part in body.parts.clone() {
                if let Some(leaf) = self.bodies.get_mut(part) {
                    leaf.parent = Some(id);
                }
            }
        }
        let inserted = self.bodies.insert(body);
        debug_assert_eq!(inserted, id);
        inserted
    }

    /// Releases a body. Leaves of a removed composite are detached, not removed.
    ///
    /// A leaf still welded into a live composite cannot be removed on its own;
    /// remove the composite first.
    pub fn remove(&mut self, id: BodyId) -> Result<Body> {
        let body = self.body(id)?;
        if let Some(composite) = body.parent.filter(|&parent| self.bodies.contains(parent)) {
            return Err(KernelError::LeafInComposite { leaf: id, composite });
        }

        let body = self.bodies.remove(id).ok_or(KernelError::UnknownBody(id))?;
        if body.is_composite() {
            for &part in &body.parts {
                if let Some(leaf) = self.bodies.get_mut(part) {
                    if leaf.parent == Some(id) {
                        leaf.parent = None;
                        leaf.rotate_center = leaf.position;
                    }
                }
            }
        }
        debug!("released body {id}");
        Ok(body)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.ids()
    }

    pub(crate) fn body(&self, id: BodyId) -> Result<&Body> {
        self.bodies.get(id).ok_or(KernelError::UnknownBody(id))
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.bodies.get_mut(id).ok_or(KernelError::UnknownBody(id))
    }

    pub fn parts(&self, id: BodyId) -> Result<&[BodyId]> {
        Ok(self.body(id)?.parts())
    }

    /// Resolves the leaves of `id` (just the body itself for a leaf).
    pub fn leaves(&self, id: BodyId) -> Result<Vec<&Body>> {
        self.resolve(self.parts(id)?)
    }

    pub(crate) fn resolve(&self, ids: &[BodyId]) -> Result<Vec<&Body>> {
        ids.iter().map(|&part| self.body(part)).collect()
    }

    /// Area, re-derived from the leaves.
    pub fn area(&self, id: BodyId) -> Result<f64> {
        Ok(compose::area(self.leaves(id)?))
    }

    /// Mass-weighted centroid, re-derived from the leaves.
    pub fn centroid(&self, id: BodyId) -> Result<DVec2> {
        let body = self.body(id)?;
        if !body.is_composite() {
            return Ok(body.centroid());
        }
        Ok(compose::centroid(self.leaves(id)?, body.mass))
    }

    /// Sum of the leaves' stored inertias.
    pub fn inertia(&self, id: BodyId) -> Result<f64> {
        Ok(compose::inertia(self.leaves(id)?))
    }

    /// Union of the leaves' bounds.
    pub fn bound(&self, id: BodyId) -> Result<Bound> {
        let body = self.body(id)?;
        Ok(compose::bound(self.leaves(id)?).unwrap_or(body.bound))
    }

    /// Rigidly translates a body. For a composite every leaf moves with it and
    /// the composite bound is shifted rather than recomputed.
    pub fn translate(&mut self, id: BodyId, dx: f64, dy: f64) -> Result<()> {
        let delta = DVec2::new(dx, dy);
        let body = self.body(id)?;
        if !body.is_composite() {
            let detached = body.parent.is_none();
            let body = self.body_mut(id)?;
            body.translate_leaf(delta);
            if detached {
                body.rotate_center += delta;
            }
            return Ok(());
        }

        // Every part must resolve before any of them moves.
        let parts = body.parts.clone();
        self.resolve(&parts)?;
        for part in parts {
            let leaf = self.body_mut(part)?;
            leaf.translate_leaf(delta);
            leaf.rotate_center += delta;
        }

        let composite = self.body_mut(id)?;
        composite.position += delta;
        composite.rotate_center += delta;
        composite.bound.translate(dx, dy);
        Ok(())
    }

    /// Rotates a body by `radian`.
    ///
    /// A composite rotates rigidly about its current position: each leaf is
    /// turned about that pivot, then the composite bound is rebuilt from the
    /// leaf bounds. A leaf rotates about its `rotate_center`.
    pub fn rotate(&mut self, id: BodyId, radian: f64) -> Result<()> {
        let body = self.body(id)?;
        if !body.is_composite() {
            let pivot = body.rotate_center;
            self.body_mut(id)?.rotate_leaf(pivot, radian);
            return Ok(());
        }

        let pivot = body.position;
        let parts = body.parts.clone();
        self.resolve(&parts)?;
        for &part in &parts {
            self.body_mut(part)?.rotate_leaf(pivot, radian);
        }

        let bounds: Vec<Bound> = self.resolve(&parts)?.iter().map(|leaf| leaf.bound).collect();
        let composite = self.body_mut(id)?;
        composite.rotation += radian;
        composite.bound.update_by_bounds(&bounds);
        Ok(())
    }

    /// True when any leaf contains the point.
    pub fn contains_point(&self, id: BodyId, x: f64, y: f64) -> Result<bool> {
        let point = DVec2::new(x, y);
        for part in self.parts(id)? {
            if self.body(*part)?.contains_point(point) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{body::RectangleOptions, types::BodyOptions};
    use std::f64::consts::FRAC_PI_2;

    fn leaf(set: &mut BodySet, origin: DVec2) -> BodyId {
        let body = Body::rectangle(RectangleOptions::new(2.0, 1.0).with_origin(origin)).unwrap();
        set.insert(body)
    }

    #[test]
    fn leaf_is_its_own_part() {
        let mut set = BodySet::new();
        let id = leaf(&mut set, DVec2::ZERO);
        assert_eq!(set.parts(id).unwrap(), &[id]);
        assert_eq!(set.get(id).unwrap().id(), id);
    }

    #[test]
    fn leaf_translate_moves_pivot_when_detached() {
        let mut set = BodySet::new();
        let id = leaf(&mut set, DVec2::ZERO);
        set.translate(id, 3.0, 4.0).unwrap();
        let body = set.get(id).unwrap();
        assert_eq!(body.position, DVec2::new(4.0, 4.5));
        assert_eq!(body.rotate_center, body.position);
        assert_eq!(body.bound.min, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn leaf_rotates_in_place() {
        let mut set = BodySet::new();
        let id = leaf(&mut set, DVec2::ZERO);
        set.rotate(id, FRAC_PI_2).unwrap();
        let body = set.get(id).unwrap();
        assert!((body.position - DVec2::new(1.0, 0.5)).length() < 1e-12);
        assert!((body.bound.width() - 1.0).abs() < 1e-12);
        assert!((body.bound.height() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut set = BodySet::new();
        let id = leaf(&mut set, DVec2::ZERO);
        set.remove(id).unwrap();
        assert!(matches!(
            set.remove(id),
            Err(KernelError::UnknownBody(missing)) if missing == id
        ));
        assert!(matches!(
            set.translate(id, 1.0, 0.0),
            Err(KernelError::UnknownBody(missing)) if missing == id
        ));
        assert!(set.area(id).is_err());
    }

    #[test]
    fn contains_point_uses_geometry() {
        let mut set = BodySet::new();
        let body = Body::rectangle(
            RectangleOptions::new(1.0, 1.0).with_body(BodyOptions::default().with_mass(1.0)),
        )
        .unwrap();
        let id = set.insert(body);
        assert!(set.contains_point(id, 0.5, 0.5).unwrap());
        assert!(!set.contains_point(id, 1.5, 0.5).unwrap());
    }

    #[test]
    fn composite_transforms_leave_state_untouched_on_missing_part() {
        let mut set = BodySet::new();
        let a = leaf(&mut set, DVec2::ZERO);
        let b = leaf(&mut set, DVec2::new(2.0, 0.0));
        let composite = set
            .insert_composite(crate::core::CompositeOptions::new(vec![a, b]))
            .unwrap();
        set.bodies.remove(b);

        let before = set.get(a).unwrap().clone();
        assert!(set.translate(composite, 5.0, 0.0).is_err());
        assert!(set.rotate(composite, FRAC_PI_2).is_err());

        let after = set.get(a).unwrap();
        assert_eq!(after.position, before.position);
        assert_eq!(after.bound, before.bound);
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(set.get(composite).unwrap().position, DVec2::new(2.0, 0.5));
    }
}
