//! Aggregate mass properties over a flat collection of bodies.
//!
//! Every function here is pure and works on whatever slice of leaves it is
//! handed; composites call them on their flattened parts.

use glam::DVec2;

use super::{body::Body, bound::Bound};

pub fn mass<'a, I>(parts: I) -> f64
where
    I: IntoIterator<Item = &'a Body>,
{
    parts.into_iter().map(|part| part.mass).sum()
}

pub fn area<'a, I>(parts: I) -> f64
where
    I: IntoIterator<Item = &'a Body>,
{
    parts.into_iter().map(|part| part.area).sum()
}

/// Mass-weighted centroid; each part weighs `part.mass / total_mass`.
pub fn centroid<'a, I>(parts: I, total_mass: f64) -> DVec2
where
    I: IntoIterator<Item = &'a Body>,
{
    parts
        .into_iter()
        .fold(DVec2::ZERO, |acc, part| acc + part.centroid() * (part.mass / total_mass))
}

/// Sum of the parts' stored inertias. The caller is responsible for having
/// expressed them about a common point first.
pub fn inertia<'a, I>(parts: I) -> f64
where
    I: IntoIterator<Item = &'a Body>,
{
    parts.into_iter().map(|part| part.inertia).sum()
}

/// Union of the parts' bounds, seeded from a copy of the first one.
pub fn bound<'a, I>(parts: I) -> Option<Bound>
where
    I: IntoIterator<Item = &'a Body>,
{
    let mut iter = parts.into_iter();
    let seed = iter.next()?.bound;
    Some(iter.fold(seed, |acc, part| acc.union(&part.bound)))
}
