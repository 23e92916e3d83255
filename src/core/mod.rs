//! Rigid bodies: bounds, primitive shapes, mass aggregation and composites.

pub mod body;
pub mod bound;
pub mod compose;
pub mod composite;
pub mod shapes;
pub mod types;

pub use body::{inverse_inertia, Body, PolygonOptions, RectangleOptions};
pub use bound::Bound;
pub use composite::CompositeOptions;
pub use shapes::{CompositeShape, Geometry, Polygon, Rectangle, Shape};
pub use types::{BodyOptions, Material, Vec2};
