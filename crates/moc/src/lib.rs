//! Method of characteristics for planar supersonic jets.
//!
//! Layout
//! - `gas`: Prandtl–Meyer function and its inverse (pure functions of γ).
//! - `flow`: `FlowState`, the resolved Riemann pair plus derived quantities.
//! - `march`: points, characteristic rays, and the frontline marching engine.
//! - `jet`: run configuration and seed points (inlet line + expansion fan).
//!
//! The engine is single-threaded; all state lives in index arenas owned by
//! `GeometryCluster`, so rays and points refer to each other by `PointId` /
//! `RayId` rather than by reference.

pub mod error;
pub mod flow;
pub mod gas;
pub mod jet;
pub mod march;

pub use error::{MocError, Result};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for callers driving a full run.
pub mod prelude {
    pub use crate::flow::{FlowState, Gas, Invariants};
    pub use crate::gas::{mach_from_prandtl_meyer, prandtl_meyer};
    pub use crate::jet::{seed_points, JetConfig};
    pub use crate::march::{
        Boundary, Characteristic, Crossing, Family, FieldSample, FluidPoint, GeometryCluster,
        MarchCfg, PointId, PointStatus, RayId, RunReport, Termination,
    };
    pub use crate::{MocError, Result};
    pub use nalgebra::Vector2 as Vec2;
}
