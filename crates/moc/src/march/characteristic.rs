use nalgebra::{Matrix2, Vector2};

use crate::flow::{Gas, Invariants};

use super::point::FluidPoint;
use super::types::{Boundary, Family, MarchCfg, PointId, RayId};

/// Candidate point produced by intersecting two rays, before Mach resolution.
///
/// `invariants == None` marks a same-family crossing (shock).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    pub position: Vector2<f64>,
    pub invariants: Option<Invariants>,
    pub boundary: Boundary,
    pub gas: Gas,
}

impl Crossing {
    #[inline]
    pub fn is_shock(&self) -> bool {
        self.invariants.is_none()
    }
}

/// Ray shot from `origin` along its family's characteristic direction.
///
/// Invariants:
/// - `origin`, `family`, `direction` are fixed at construction.
/// - `end` and `complement` are written at most once, when the ray closes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Characteristic {
    origin: PointId,
    family: Family,
    direction: f64,
    end: Option<PointId>,
    complement: Option<RayId>,
}

impl Characteristic {
    /// Shoot a ray of `family` from `point` (stored at `origin`).
    /// `None` if the point carries no flow state.
    pub fn shoot(origin: PointId, point: &FluidPoint, family: Family) -> Option<Self> {
        let direction = point.flow()?.direction(family);
        Some(Self {
            origin,
            family,
            direction,
            end: None,
            complement: None,
        })
    }

    #[inline]
    pub fn origin(&self) -> PointId {
        self.origin
    }
    #[inline]
    pub fn family(&self) -> Family {
        self.family
    }
    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }
    #[inline]
    pub fn end(&self) -> Option<PointId> {
        self.end
    }
    #[inline]
    pub fn complement(&self) -> Option<RayId> {
        self.complement
    }
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    #[inline]
    pub fn unit(&self) -> Vector2<f64> {
        Vector2::new(self.direction.cos(), self.direction.sin())
    }

    pub(crate) fn close(&mut self, end: PointId, complement: Option<RayId>) {
        debug_assert!(self.end.is_none(), "ray end is write-once");
        self.end = Some(end);
        self.complement = complement;
    }

    /// Intersection of the lines carrying `self` and `other`.
    ///
    /// Returns `None` for coincident origins or (near-)parallel rays. The
    /// position is symmetric in the arguments; the gas constants come from
    /// `self`'s origin. Same-family crossings carry no invariants (shock).
    /// Whether the crossing lies downstream of either origin is left to the
    /// caller.
    pub fn intersect(
        &self,
        other: &Characteristic,
        points: &[FluidPoint],
        cfg: &MarchCfg,
    ) -> Option<Crossing> {
        let pa = &points[self.origin.0];
        let pb = &points[other.origin.0];
        if pa.distance_squared(pb) < cfg.eps_coincident {
            return None;
        }
        let (fa, fb) = (pa.flow()?, pb.flow()?);

        // pa + s·da = pb + t·db
        let da = self.unit();
        let db = other.unit();
        let m = Matrix2::from_columns(&[da, -db]);
        if m.determinant().abs() < cfg.eps_det {
            return None;
        }
        let st = m.try_inverse()? * (pb.position() - pa.position());
        let position = pa.position() + da * st.x;

        let (invariants, boundary) = match (self.family, other.family) {
            (Family::GammaPlus, Family::GammaPlus)
            | (Family::GammaMinus, Family::GammaMinus)
            | (Family::Zero, Family::Zero) => (None, Boundary::None),
            (Family::GammaPlus, Family::GammaMinus) => (
                Some(Invariants::new(fa.v_plus(), fb.v_minus())),
                Boundary::None,
            ),
            (Family::GammaMinus, Family::GammaPlus) => (
                Some(Invariants::new(fb.v_plus(), fa.v_minus())),
                Boundary::None,
            ),
            (Family::GammaPlus, Family::Zero) => (
                Some(reflect_upper(fa.v_plus(), fb.prandtl_meyer_angle())),
                Boundary::Upper,
            ),
            (Family::Zero, Family::GammaPlus) => (
                Some(reflect_upper(fb.v_plus(), fa.prandtl_meyer_angle())),
                Boundary::Upper,
            ),
            (Family::GammaMinus, Family::Zero) => (
                Some(reflect_lower(fa.v_minus(), fb.flow_direction())),
                Boundary::Lower,
            ),
            (Family::Zero, Family::GammaMinus) => (
                Some(reflect_lower(fb.v_minus(), fa.flow_direction())),
                Boundary::Lower,
            ),
        };

        Some(Crossing {
            position,
            invariants,
            boundary,
            gas: fa.gas(),
        })
    }
}

/// Constant-pressure boundary: keep ν of the boundary ray.
#[inline]
fn reflect_upper(v_plus: f64, boundary_nu: f64) -> Invariants {
    Invariants::new(v_plus, -v_plus + 2.0 * boundary_nu)
}

/// Solid/symmetry boundary: keep θ of the boundary ray.
#[inline]
fn reflect_lower(v_minus: f64, boundary_theta: f64) -> Invariants {
    Invariants::new(v_minus - 2.0 * boundary_theta, v_minus)
}
