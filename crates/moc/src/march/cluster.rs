//! The frontline marching engine.
//!
//! One `advance_frontline` call:
//! 1. shoots every untried family of every frontline point;
//! 2. for each ray, finds the nearest crossing downstream of both origins
//!    (ordered by projection on the ray origin's flow direction);
//! 3. commits a pair only if each ray picked the other;
//! 4. sends rays with no frontline crossing at all to the dead-ray search;
//! 5. retires exhausted points.
//!
//! Pairs that are not mutual are simply re-proposed next step.

use nalgebra::Vector2;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;

use super::characteristic::{Characteristic, Crossing};
use super::point::FluidPoint;
use super::types::{Boundary, Family, MarchCfg, PointId, PointStatus, RayId};

/// Counters for one `advance_frontline` step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Advance {
    pub rays: usize,
    pub committed: usize,
    pub fallback: usize,
    pub promoted: usize,
    pub retired: usize,
    pub shock: Option<Vector2<f64>>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Termination {
    /// Same-family crossing found at `position`; the run halted there.
    Shock { position: Vector2<f64> },
    /// Iteration budget spent; the field is incomplete but valid.
    IterationCap,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    pub iterations: usize,
    pub termination: Termination,
}

/// Per-point scalar fields for contour-style consumers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldSample {
    pub x: f64,
    pub y: f64,
    pub mach: Option<f64>,
    pub static_pressure: Option<f64>,
    pub boundary: Boundary,
    pub status: PointStatus,
    pub shock: bool,
}

/// State a step may touch: arena lengths (a step only appends) and the
/// frontline points, whose tried flags and status a step changes.
#[derive(Debug)]
struct Checkpoint {
    points: usize,
    rays: usize,
    dead_points: usize,
    frontline: Vec<(PointId, FluidPoint)>,
    shock: Option<Vector2<f64>>,
}

impl Checkpoint {
    fn take(gc: &GeometryCluster) -> Self {
        Self {
            points: gc.points.len(),
            rays: gc.rays.len(),
            dead_points: gc.dead_points.len(),
            frontline: gc
                .frontline
                .iter()
                .map(|&id| (id, gc.points[id.0].clone()))
                .collect(),
            shock: gc.shock,
        }
    }

    fn restore(self, gc: &mut GeometryCluster) {
        gc.points.truncate(self.points);
        gc.status.truncate(self.points);
        gc.rays.truncate(self.rays);
        gc.dead_points.truncate(self.dead_points);
        gc.frontline.clear();
        for (id, point) in self.frontline {
            gc.points[id.0] = point;
            gc.status[id.0] = PointStatus::Frontline;
            gc.frontline.push(id);
        }
        gc.shock = self.shock;
    }
}

/// Owner of every point and closed ray of a run.
///
/// Invariants:
/// - `frontline` and `dead_points` partition the point arena; `status`
///   mirrors that partition.
/// - Every ray in `rays` is closed (`end` set).
#[derive(Clone, Debug)]
pub struct GeometryCluster {
    cfg: MarchCfg,
    points: Vec<FluidPoint>,
    status: Vec<PointStatus>,
    rays: Vec<Characteristic>,
    frontline: Vec<PointId>,
    dead_points: Vec<PointId>,
    shock: Option<Vector2<f64>>,
}

impl GeometryCluster {
    /// Start a cluster whose frontline is exactly `seeds`, in order.
    pub fn new(seeds: Vec<FluidPoint>, cfg: MarchCfg) -> Self {
        let n = seeds.len();
        Self {
            cfg,
            points: seeds,
            status: vec![PointStatus::Frontline; n],
            rays: Vec::new(),
            frontline: (0..n).map(PointId).collect(),
            dead_points: Vec::new(),
            shock: None,
        }
    }

    /// Add a point to the end of the frontline; it shoots from the next step on.
    pub fn push_frontline(&mut self, point: FluidPoint) -> PointId {
        let id = PointId(self.points.len());
        self.points.push(point);
        self.status.push(PointStatus::Frontline);
        self.frontline.push(id);
        id
    }

    #[inline]
    pub fn cfg(&self) -> MarchCfg {
        self.cfg
    }
    #[inline]
    pub fn points(&self) -> &[FluidPoint] {
        &self.points
    }
    #[inline]
    pub fn point(&self, id: PointId) -> &FluidPoint {
        &self.points[id.0]
    }
    #[inline]
    pub fn status(&self, id: PointId) -> PointStatus {
        self.status[id.0]
    }
    #[inline]
    pub fn frontline(&self) -> &[PointId] {
        &self.frontline
    }
    #[inline]
    pub fn dead_points(&self) -> &[PointId] {
        &self.dead_points
    }
    /// Closed rays; all of them belong to the dead set.
    #[inline]
    pub fn dead_rays(&self) -> &[Characteristic] {
        &self.rays
    }
    #[inline]
    pub fn ray(&self, id: RayId) -> &Characteristic {
        &self.rays[id.0]
    }
    /// Position of the first shock, if one formed.
    #[inline]
    pub fn shock(&self) -> Option<Vector2<f64>> {
        self.shock
    }

    /// Largest x among frontline points.
    pub fn downstream_reach(&self) -> Option<f64> {
        self.frontline
            .iter()
            .map(|id| self.points[id.0].position().x)
            .fold(None, |acc, x| Some(acc.map_or(x, |a: f64| a.max(x))))
    }

    /// Rays for every untried family of every frontline point, ordered by
    /// origin x (stable, so ties keep frontline order).
    pub fn frontline_rays(&self) -> Vec<Characteristic> {
        let mut rays: Vec<Characteristic> = self
            .frontline
            .iter()
            .flat_map(|&id| {
                let p = &self.points[id.0];
                p.untried()
                    .filter_map(move |family| Characteristic::shoot(id, p, family))
            })
            .collect();
        rays.sort_by(|a, b| {
            let ax = self.points[a.origin().0].position().x;
            let bx = self.points[b.origin().0].position().x;
            ax.total_cmp(&bx)
        });
        rays
    }

    /// `c` lies strictly downstream of the origins of both `r` and `g`.
    #[inline]
    fn downstream_of_both(&self, r: &Characteristic, g: &Characteristic, c: &Crossing) -> bool {
        let ahead = |ray: &Characteristic| {
            self.points[ray.origin().0]
                .flow_direction_dot(&c.position)
                .is_some_and(|d| d > 0.0)
        };
        ahead(r) && ahead(g)
    }

    /// Nearest valid crossing of `rays[i]` with another frontline ray,
    /// measured along the flow direction at `rays[i]`'s origin.
    fn nearest_crossing(&self, rays: &[Characteristic], i: usize) -> Option<(usize, Crossing)> {
        let r = &rays[i];
        let ro = &self.points[r.origin().0];
        let mut best: Option<(usize, Crossing, f64)> = None;
        for (j, g) in rays.iter().enumerate() {
            if j == i {
                continue;
            }
            let Some(c) = g.intersect(r, &self.points, &self.cfg) else {
                continue;
            };
            if !self.downstream_of_both(r, g, &c) {
                continue;
            }
            let Some(dist) = ro.flow_direction_dot(&c.position) else {
                continue;
            };
            if best.as_ref().is_none_or(|(_, _, d)| dist < *d) {
                best = Some((j, c, dist));
            }
        }
        best.map(|(j, c, _)| (j, c))
    }

    /// First closed ray `g` whose crossing with `r` lies downstream of both
    /// origins and upstream of `g`'s end.
    pub fn find_first_dead_intersection(&self, r: &Characteristic) -> Option<(RayId, Crossing)> {
        self.rays.iter().enumerate().find_map(|(k, g)| {
            let c = g.intersect(r, &self.points, &self.cfg)?;
            if !self.downstream_of_both(r, g, &c) {
                return None;
            }
            let end = &self.points[g.end()?.0];
            if end.flow_direction_dot(&c.position)? < 0.0 {
                Some((RayId(k), c))
            } else {
                None
            }
        })
    }

    /// Turn a crossing into a point. Valid crossings join the frontline (with
    /// `preset` already marked tried); shock crossings go straight to the dead
    /// set and raise the stop flag.
    fn promote(
        &mut self,
        c: &Crossing,
        preset: Option<Family>,
        step: &mut Advance,
    ) -> Result<PointId> {
        let id = PointId(self.points.len());
        let mut point = FluidPoint::from_crossing(c)?;
        if point.is_shock() {
            self.points.push(point);
            self.status.push(PointStatus::Dead);
            self.dead_points.push(id);
            warn!(x = c.position.x, y = c.position.y, "shock formation");
            if self.shock.is_none() {
                self.shock = Some(c.position);
            }
            if step.shock.is_none() {
                step.shock = Some(c.position);
            }
        } else {
            if let Some(family) = preset {
                point.mark_tried(family);
            }
            self.points.push(point);
            self.status.push(PointStatus::Frontline);
            self.frontline.push(id);
            step.promoted += 1;
        }
        Ok(id)
    }

    /// Move a frontline ray into the arena, closed at `end`.
    fn retire_ray(
        &mut self,
        mut ray: Characteristic,
        end: PointId,
        complement: Option<RayId>,
    ) -> RayId {
        let id = RayId(self.rays.len());
        ray.close(end, complement);
        self.points[ray.origin().0].mark_tried(ray.family());
        self.points[end.0].add_ending_ray(id);
        self.rays.push(ray);
        id
    }

    /// One marching step. Not reentrant; mutates the frontline/dead partition.
    ///
    /// On `Err` (a crossing whose Mach number cannot be resolved) the cluster
    /// is rolled back to its state before the call.
    pub fn advance_frontline(&mut self) -> Result<Advance> {
        let checkpoint = Checkpoint::take(self);
        let result = self.step();
        if result.is_err() {
            checkpoint.restore(self);
        }
        result
    }

    fn step(&mut self) -> Result<Advance> {
        let rays = self.frontline_rays();
        let mut step = Advance {
            rays: rays.len(),
            ..Advance::default()
        };

        // propose
        let proposals: Vec<Option<(usize, Crossing)>> = (0..rays.len())
            .map(|i| self.nearest_crossing(&rays, i))
            .collect();

        // confirm mutual pairs, each once
        for (i, proposal) in proposals.iter().enumerate() {
            let Some((j, crossing)) = proposal else {
                continue;
            };
            let j = *j;
            let mutual = matches!(&proposals[j], Some((k, _)) if *k == i);
            if i >= j || !mutual {
                continue;
            }
            let end = self.promote(crossing, None, &mut step)?;
            let base = self.rays.len();
            self.retire_ray(rays[i], end, Some(RayId(base + 1)));
            self.retire_ray(rays[j], end, Some(RayId(base)));
            step.committed += 1;
        }

        // rays that saw no valid frontline crossing at all
        for (i, proposal) in proposals.iter().enumerate() {
            if proposal.is_some() {
                continue;
            }
            let r = rays[i];
            let Some((g, crossing)) = self.find_first_dead_intersection(&r) else {
                continue;
            };
            let matched = self.rays[g.0].family();
            let end = self.promote(&crossing, Some(matched), &mut step)?;
            self.retire_ray(r, end, None);
            step.fallback += 1;
        }

        // retire exhausted points
        let mut keep = Vec::with_capacity(self.frontline.len());
        for id in std::mem::take(&mut self.frontline) {
            if self.points[id.0].all_rays_exhausted() {
                self.status[id.0] = PointStatus::Dead;
                self.dead_points.push(id);
                step.retired += 1;
            } else {
                keep.push(id);
            }
        }
        self.frontline = keep;

        Ok(step)
    }

    /// Advance until a shock forms or `max_iterations` steps have run.
    pub fn run(&mut self, max_iterations: usize) -> Result<RunReport> {
        let mut iterations = 0;
        while iterations < max_iterations && self.shock.is_none() {
            let step = self.advance_frontline()?;
            iterations += 1;
            debug!(
                iteration = iterations,
                reach = ?self.downstream_reach(),
                frontline = self.frontline.len(),
                rays = step.rays,
                committed = step.committed,
                fallback = step.fallback,
                retired = step.retired,
                "advance_frontline"
            );
        }
        let termination = match self.shock {
            Some(position) => Termination::Shock { position },
            None => Termination::IterationCap,
        };
        info!(
            iterations,
            points = self.points.len(),
            rays = self.rays.len(),
            frontline = self.frontline.len(),
            termination = ?termination,
            "run finished"
        );
        Ok(RunReport {
            iterations,
            termination,
        })
    }

    /// Scalar fields at every point, frontline and dead alike.
    pub fn samples(&self) -> Vec<FieldSample> {
        self.points
            .iter()
            .zip(&self.status)
            .map(|(p, &status)| FieldSample {
                x: p.position().x,
                y: p.position().y,
                mach: p.mach_number(),
                static_pressure: p.static_pressure(),
                boundary: p.boundary(),
                status,
                shock: p.is_shock(),
            })
            .collect()
    }
}
