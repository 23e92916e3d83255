use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a body.
///
/// `min <= max` holds componentwise for every bound built through the
/// constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bound {
    /// Builds a bound from two opposite corners in any order.
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Tightest bound around `points`. Returns `None` for an empty slice.
    pub fn from_points(points: &[DVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bound = Self::new(*first, *first);
        for &p in rest {
            bound.min = bound.min.min(p);
            bound.max = bound.max.max(p);
        }
        Some(bound)
    }

    /// Smallest bound enclosing both `self` and `other`.
    pub fn union(&self, other: &Bound) -> Bound {
        Bound {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Shifts both corners. Only valid when the enclosed shape moved rigidly
    /// without rotating.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let delta = DVec2::new(dx, dy);
        self.min += delta;
        self.max += delta;
    }

    /// Recomputes this bound as the union of `bounds`, seeded from a copy of
    /// the first one. Leaves `self` untouched when `bounds` is empty.
    pub fn update_by_bounds<'a, I>(&mut self, bounds: I)
    where
        I: IntoIterator<Item = &'a Bound>,
    {
        let mut iter = bounds.into_iter();
        if let Some(first) = iter.next() {
            *self = iter.fold(*first, |acc, bound| acc.union(bound));
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let bound = Bound::new(DVec2::new(3.0, -1.0), DVec2::new(1.0, 2.0));
        assert_eq!(bound.min, DVec2::new(1.0, -1.0));
        assert_eq!(bound.max, DVec2::new(3.0, 2.0));
    }

    #[test]
    fn update_by_bounds_ignores_previous_extent() {
        let mut bound = Bound::new(DVec2::splat(-100.0), DVec2::splat(100.0));
        let children = [
            Bound::new(DVec2::ZERO, DVec2::ONE),
            Bound::new(DVec2::new(2.0, 0.5), DVec2::new(3.0, 4.0)),
        ];
        bound.update_by_bounds(&children);
        assert_eq!(bound.min, DVec2::ZERO);
        assert_eq!(bound.max, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn translate_keeps_extents() {
        let mut bound = Bound::new(DVec2::ZERO, DVec2::new(2.0, 1.0));
        bound.translate(5.0, -3.0);
        assert_eq!(bound.width(), 2.0);
        assert_eq!(bound.height(), 1.0);
        assert_eq!(bound.min, DVec2::new(5.0, -3.0));
    }

    #[test]
    fn center_and_containment() {
        let bound = Bound::from_points(&[DVec2::new(1.0, 3.0), DVec2::new(-1.0, 1.0), DVec2::ZERO]).unwrap();
        assert_eq!(bound.center(), DVec2::new(0.0, 1.5));
        assert!(bound.contains_point(DVec2::new(1.0, 3.0)));
        assert!(!bound.contains_point(DVec2::new(1.0, 3.5)));
    }

    #[test]
    fn from_points_rejects_empty_input() {
        assert!(Bound::from_points(&[]).is_none());
    }
}
