//! Error types for the kernel.

use thiserror::Error;

use crate::utils::allocator::BodyId;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown body {0}")]
    UnknownBody(BodyId),

    #[error("Body {leaf} is part of composite {composite}; remove the composite first")]
    LeafInComposite { leaf: BodyId, composite: BodyId },
}

/// Invalid construction input. Raised eagerly so NaN/Infinity never enter body state.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Composite needs at least one constituent body")]
    EmptyComposite,

    #[error("Leaf {0} appears more than once among the constituents")]
    SharedLeaf(BodyId),

    #[error("Invalid {field}: {value} (must be finite and > 0)")]
    NonPositiveDimension { field: &'static str, value: f64 },

    #[error("Invalid fps: {0} (must be finite and > 0)")]
    NonPositiveFps(f64),

    #[error("Invalid mass: {0} (must be finite and > 0)")]
    NonPositiveMass(f64),

    #[error("Invalid density: {0} (must be finite and > 0)")]
    NonPositiveDensity(f64),

    #[error("Degenerate polygon with {0} vertices (needs >= 3 and a non-zero area)")]
    DegeneratePolygon(usize),

    #[error("Polygon with {0} vertices is not convex")]
    NonConvexPolygon(usize),

    #[error("Solver iteration count must be >= 1")]
    ZeroIterations,

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T, E = KernelError> = std::result::Result<T, E>;

/// Fails with [`ConfigError::NonPositiveDimension`] unless `value` is finite and positive.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveDimension { field, value })
    }
}
