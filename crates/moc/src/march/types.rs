//! Identifiers, family/boundary tags, and tolerances for the marching engine.

use serde::{Deserialize, Serialize};

use crate::error::MocError;

/// Index of a point in `GeometryCluster`'s point arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

/// Index of a closed ray in `GeometryCluster`'s ray arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RayId(pub usize);

/// Characteristic family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    GammaPlus,
    GammaMinus,
    /// Streamline ray shot from boundary points.
    Zero,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::GammaPlus, Family::GammaMinus, Family::Zero];

    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Family::GammaPlus => 1,
            Family::GammaMinus => -1,
            Family::Zero => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::GammaPlus => "gamma_plus",
            Family::GammaMinus => "gamma_minus",
            Family::Zero => "zero",
        }
    }
}

impl TryFrom<i8> for Family {
    type Error = MocError;

    fn try_from(tag: i8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Family::GammaPlus),
            -1 => Ok(Family::GammaMinus),
            0 => Ok(Family::Zero),
            other => Err(MocError::InvalidFamily(other)),
        }
    }
}

/// Boundary classification of a point; fixes which families it may shoot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    #[default]
    None,
    /// Symmetry line below the jet.
    Lower,
    /// Free jet boundary (constant pressure).
    Upper,
    PlusOnly,
    MinusOnly,
}

impl Boundary {
    /// Families pre-marked as tried at construction.
    #[inline]
    pub fn pretried(self, family: Family) -> bool {
        match self {
            Boundary::None => family == Family::Zero,
            Boundary::Lower => family == Family::GammaMinus,
            Boundary::Upper => family == Family::GammaPlus,
            Boundary::PlusOnly => family != Family::GammaPlus,
            Boundary::MinusOnly => family != Family::GammaMinus,
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, Boundary::Lower | Boundary::Upper)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Boundary::None => "none",
            Boundary::Lower => "lower",
            Boundary::Upper => "upper",
            Boundary::PlusOnly => "plus_only",
            Boundary::MinusOnly => "minus_only",
        }
    }
}

/// Which partition a point currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    Frontline,
    Dead,
}

impl PointStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PointStatus::Frontline => "frontline",
            PointStatus::Dead => "dead",
        }
    }
}

/// Marching tolerances.
#[derive(Clone, Copy, Debug)]
pub struct MarchCfg {
    /// Squared distance below which two ray origins count as the same point.
    pub eps_coincident: f64,
    /// Determinant magnitude below which two rays count as parallel.
    pub eps_det: f64,
}

impl Default for MarchCfg {
    fn default() -> Self {
        Self {
            eps_coincident: 1e-10,
            eps_det: 1e-10,
        }
    }
}
