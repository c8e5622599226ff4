//! Frontline marching: points, characteristic rays, and the engine that
//! grows the flow field one intersection layer at a time.
//!
//! Purpose
//! - `FluidPoint`: a resolved flow state at a position, with per-family
//!   "tried" flags and back-references to the rays ending there.
//! - `Characteristic`: a ray shot from a point along one family's direction;
//!   `intersect` is the geometric primitive of the whole method.
//! - `GeometryCluster`: owns the point/ray arenas and the frontline/dead
//!   partition; `advance_frontline` proposes nearest downstream crossings,
//!   commits only mutual pairs, promotes or retires, and flags shocks.
//!
//! Storage
//! - Points and closed rays live in `Vec` arenas addressed by `PointId` /
//!   `RayId`. Frontline rays are regenerated every step from untried families
//!   and only enter the arena once closed.
//!
//! Code cross-refs: `flow::{FlowState, Invariants, Gas}`, `jet::seed_points`.

mod characteristic;
mod cluster;
mod point;
mod types;

pub use characteristic::{Characteristic, Crossing};
pub use cluster::{Advance, FieldSample, GeometryCluster, RunReport, Termination};
pub use point::FluidPoint;
pub use types::{Boundary, Family, MarchCfg, PointId, PointStatus, RayId};
