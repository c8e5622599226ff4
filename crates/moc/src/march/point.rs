use nalgebra::Vector2;

use crate::error::Result;
use crate::flow::{FlowState, Gas, Invariants};

use super::characteristic::Crossing;
use super::types::{Boundary, Family, RayId};

/// Per-family "a ray of this family was already consumed" flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tried {
    plus: bool,
    minus: bool,
    zero: bool,
}

impl Tried {
    fn from_boundary(boundary: Boundary) -> Self {
        Self {
            plus: boundary.pretried(Family::GammaPlus),
            minus: boundary.pretried(Family::GammaMinus),
            zero: boundary.pretried(Family::Zero),
        }
    }

    #[inline]
    fn slot(&mut self, family: Family) -> &mut bool {
        match family {
            Family::GammaPlus => &mut self.plus,
            Family::GammaMinus => &mut self.minus,
            Family::Zero => &mut self.zero,
        }
    }

    #[inline]
    fn get(&self, family: Family) -> bool {
        match family {
            Family::GammaPlus => self.plus,
            Family::GammaMinus => self.minus,
            Family::Zero => self.zero,
        }
    }
}

/// A point of the flow field.
///
/// Invariants:
/// - Position, flow state and boundary tag never change after construction.
/// - `flow` is `None` only for shock points (same-family crossings).
/// - Tried flags only go false → true.
#[derive(Clone, Debug)]
pub struct FluidPoint {
    pos: Vector2<f64>,
    flow: Option<FlowState>,
    boundary: Boundary,
    tried: Tried,
    ending_rays: Vec<RayId>,
}

impl FluidPoint {
    pub fn new(pos: Vector2<f64>, flow: FlowState, boundary: Boundary) -> Self {
        Self {
            pos,
            flow: Some(flow),
            boundary,
            tried: Tried::from_boundary(boundary),
            ending_rays: Vec::new(),
        }
    }

    /// Resolve `inv` under `gas` and build a point; fails if the Mach inversion does.
    pub fn seed(pos: Vector2<f64>, inv: Invariants, gas: Gas, boundary: Boundary) -> Result<Self> {
        Ok(Self::new(pos, FlowState::new(inv, gas)?, boundary))
    }

    /// A point carrying no invariants. Shoots nothing.
    pub fn shock(pos: Vector2<f64>, boundary: Boundary) -> Self {
        Self {
            pos,
            flow: None,
            boundary,
            tried: Tried {
                plus: true,
                minus: true,
                zero: true,
            },
            ending_rays: Vec::new(),
        }
    }

    /// Promote an intersection candidate. Shock candidates become shock points.
    pub fn from_crossing(c: &Crossing) -> Result<Self> {
        match c.invariants {
            Some(inv) => Self::seed(c.position, inv, c.gas, c.boundary),
            None => Ok(Self::shock(c.position, c.boundary)),
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        self.pos
    }
    #[inline]
    pub fn flow(&self) -> Option<&FlowState> {
        self.flow.as_ref()
    }
    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }
    #[inline]
    pub fn is_shock(&self) -> bool {
        self.flow.is_none()
    }
    #[inline]
    pub fn mach_number(&self) -> Option<f64> {
        self.flow.map(|f| f.mach_number())
    }
    #[inline]
    pub fn static_pressure(&self) -> Option<f64> {
        self.flow.map(|f| f.static_pressure())
    }
    #[inline]
    pub fn ending_rays(&self) -> &[RayId] {
        &self.ending_rays
    }

    #[inline]
    pub fn tried(&self, family: Family) -> bool {
        self.tried.get(family)
    }

    #[inline]
    pub fn all_rays_exhausted(&self) -> bool {
        self.tried.plus && self.tried.minus && self.tried.zero
    }

    /// Families that may still be shot from here, in `Family::ALL` order.
    pub fn untried(&self) -> impl Iterator<Item = Family> + '_ {
        Family::ALL.into_iter().filter(move |&f| !self.tried(f))
    }

    #[inline]
    pub(crate) fn mark_tried(&mut self, family: Family) {
        *self.tried.slot(family) = true;
    }

    #[inline]
    pub(crate) fn add_ending_ray(&mut self, ray: RayId) {
        self.ending_rays.push(ray);
    }

    /// Projection of `target − self` onto the unit vector along this point's
    /// flow direction. Positive means `target` lies downstream. `None` for
    /// shock points.
    #[inline]
    pub fn flow_direction_dot(&self, target: &Vector2<f64>) -> Option<f64> {
        let theta = self.flow.as_ref()?.flow_direction();
        let d = target - self.pos;
        Some(d.x * theta.cos() + d.y * theta.sin())
    }

    #[inline]
    pub fn distance_squared(&self, other: &FluidPoint) -> f64 {
        (other.pos - self.pos).norm_squared()
    }
}
