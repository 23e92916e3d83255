//! Rigid Kernel – 2D rigid-body core for frame-driven games.
//!
//! The crate keeps a set of rigid bodies (rectangles, convex polygons and
//! composites welded from them) with consistent mass properties and bounds,
//! and drives the host engine through a jitter-resistant time stepper.
//! Collision, constraint solving and rendering belong to the host.

pub mod config;
pub mod core;
pub mod error;
pub mod stepper;
pub mod utils;
pub mod world;

pub use glam::DVec2 as Vec2;

pub use config::StepperConfig;
pub use crate::core::{
    body::{Body, PolygonOptions, RectangleOptions},
    bound::Bound,
    compose,
    composite::CompositeOptions,
    shapes::{Geometry, Shape},
    types::{BodyOptions, Material},
};
pub use error::{ConfigError, KernelError, Result};
pub use stepper::{FrameHandle, FrameScheduler, ManualFrames, Stepper, StepperState, TimeStepper};
pub use utils::allocator::BodyId;
pub use world::BodySet;
