use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::bound::Bound;
use crate::error::{ensure_positive, ConfigError};
use crate::utils::math::{cross, rotate_about};

/// Geometry capabilities every primitive (leaf) shape provides.
pub trait Geometry {
    fn area(&self) -> f64;
    fn centroid(&self) -> DVec2;
    /// Rotational inertia about the shape's own centroid for the given mass.
    fn inertia(&self, mass: f64) -> f64;
    fn vertices(&self) -> &[DVec2];
    fn bound(&self) -> Bound;
    fn translate(&mut self, delta: DVec2);
    fn rotate_about(&mut self, pivot: DVec2, radian: f64);
    fn contains_point(&self, point: DVec2) -> bool;
}

/// Convex polygon described by its vertex list.
///
/// Construction rejects concave and self-overlapping outlines; containment
/// and the inertia formula both assume convexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Result<Self, ConfigError> {
        let count = vertices.len();
        if count < 3 || vertices.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::DegeneratePolygon(count));
        }
        let polygon = Self { vertices };

        // Area tolerance scales with the vertex extent.
        let extent = polygon.bound();
        let tolerance = f64::EPSILON * extent.width() * extent.height();
        if polygon.signed_area().abs() <= tolerance {
            return Err(ConfigError::DegeneratePolygon(count));
        }
        if !polygon.is_convex() {
            return Err(ConfigError::NonConvexPolygon(count));
        }
        Ok(polygon)
    }

    /// Every corner turns the same way and the outline winds exactly once.
    fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let mut turn = 0.0_f64;
        let mut swept = 0.0;
        for i in 0..n {
            let incoming = self.vertices[(i + 1) % n] - self.vertices[i];
            let outgoing = self.vertices[(i + 2) % n] - self.vertices[(i + 1) % n];
            let c = cross(incoming, outgoing);
            if c != 0.0 {
                if turn != 0.0 && turn != c.signum() {
                    return false;
                }
                turn = c.signum();
            }
            swept += c.atan2(incoming.dot(outgoing));
        }
        (swept.abs() - std::f64::consts::TAU).abs() < 1e-6
    }

    /// Shoelace area; positive for counter-clockwise winding in a Y-up frame.
    pub fn signed_area(&self) -> f64 {
        self.edges().map(|(a, b)| cross(a, b)).sum::<f64>() * 0.5
    }

    fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl Geometry for Polygon {
    fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn centroid(&self) -> DVec2 {
        let area = self.signed_area();
        let sum = self
            .edges()
            .fold(DVec2::ZERO, |acc, (a, b)| acc + (a + b) * cross(a, b));
        sum / (6.0 * area)
    }

    fn inertia(&self, mass: f64) -> f64 {
        let center = self.centroid();
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (a, b) in self.edges() {
            let (a, b) = (a - center, b - center);
            let c = cross(a, b);
            numerator += c * (a.dot(a) + a.dot(b) + b.dot(b));
            denominator += c;
        }
        if denominator == 0.0 {
            return 0.0;
        }
        mass * numerator / (6.0 * denominator)
    }

    fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    fn bound(&self) -> Bound {
        Bound::from_points(&self.vertices).unwrap_or_else(|| Bound::new(DVec2::ZERO, DVec2::ZERO))
    }

    fn translate(&mut self, delta: DVec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    fn rotate_about(&mut self, pivot: DVec2, radian: f64) {
        for v in &mut self.vertices {
            *v = rotate_about(*v, pivot, radian);
        }
    }

    fn contains_point(&self, point: DVec2) -> bool {
        let mut side = 0.0_f64;
        for (a, b) in self.edges() {
            let c = cross(b - a, point - a);
            if c == 0.0 {
                continue;
            }
            if side == 0.0 {
                side = c.signum();
            } else if side != c.signum() {
                return false;
            }
        }
        true
    }
}

/// Axis-aligned (at construction) rectangle anchored at its top-left `origin`.
///
/// Screen frame: Y grows downward, so the corners are generated as
/// top-left, top-right, bottom-right, bottom-left. Collision code relies on
/// that winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    width: f64,
    height: f64,
    hull: Polygon,
}

impl Rectangle {
    pub fn new(width: f64, height: f64, origin: DVec2) -> Result<Self, ConfigError> {
        ensure_positive("width", width)?;
        ensure_positive("height", height)?;
        if !origin.is_finite() {
            return Err(ConfigError::DegeneratePolygon(4));
        }
        // Positive sides already guarantee a non-degenerate convex hull.
        let hull = Polygon {
            vertices: Self::vertex_list(origin, width, height).to_vec(),
        };
        Ok(Self {
            width,
            height,
            hull,
        })
    }

    /// Corner list for a rectangle at `origin`: top-left, top-right, bottom-right, bottom-left.
    pub fn vertex_list(origin: DVec2, width: f64, height: f64) -> [DVec2; 4] {
        [
            origin,
            origin + DVec2::new(width, 0.0),
            origin + DVec2::new(width, height),
            origin + DVec2::new(0.0, height),
        ]
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Current position of the (originally top-left) anchor corner.
    pub fn origin(&self) -> DVec2 {
        self.hull.vertices[0]
    }
}

impl Geometry for Rectangle {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    // Midpoint of the diagonal: origin + (w/2, h/2) before any rotation.
    fn centroid(&self) -> DVec2 {
        (self.hull.vertices[0] + self.hull.vertices[2]) * 0.5
    }

    fn inertia(&self, mass: f64) -> f64 {
        mass * (self.width * self.width + self.height * self.height) / 12.0
    }

    fn vertices(&self) -> &[DVec2] {
        self.hull.vertices()
    }

    fn bound(&self) -> Bound {
        self.hull.bound()
    }

    fn translate(&mut self, delta: DVec2) {
        self.hull.translate(delta);
    }

    fn rotate_about(&mut self, pivot: DVec2, radian: f64) {
        self.hull.rotate_about(pivot, radian);
    }

    fn contains_point(&self, point: DVec2) -> bool {
        self.hull.contains_point(point)
    }
}

/// Marker data carried by composite bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeShape {
    /// Mass flows top-down (composite → leaves) when set, bottom-up otherwise.
    pub use_parent_props: bool,
}

/// Closed set of body variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Polygon(Polygon),
    Composite(CompositeShape),
}

impl Shape {
    pub fn is_composite(&self) -> bool {
        matches!(self, Shape::Composite(_))
    }

    /// Leaf geometry, `None` for composites.
    pub fn geometry(&self) -> Option<&dyn Geometry> {
        match self {
            Shape::Rectangle(rect) => Some(rect as &dyn Geometry),
            Shape::Polygon(polygon) => Some(polygon as &dyn Geometry),
            Shape::Composite(_) => None,
        }
    }

    pub fn geometry_mut(&mut self) -> Option<&mut dyn Geometry> {
        match self {
            Shape::Rectangle(rect) => Some(rect as &mut dyn Geometry),
            Shape::Polygon(polygon) => Some(polygon as &mut dyn Geometry),
            Shape::Composite(_) => None,
        }
    }
}
