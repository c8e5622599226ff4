use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gas::{mach_angle, mach_from_prandtl_meyer};
use crate::march::Family;

/// Constants shared by every point of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gas {
    pub gamma: f64,
    pub total_pressure: f64,
}

/// Riemann invariant pair (v⁺, v⁻).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invariants {
    pub v_plus: f64,
    pub v_minus: f64,
}

impl Invariants {
    #[inline]
    pub fn new(v_plus: f64, v_minus: f64) -> Self {
        Self { v_plus, v_minus }
    }

    /// Invariants of a flow with Prandtl–Meyer angle `nu` turned by `theta`.
    #[inline]
    pub fn from_angles(nu: f64, theta: f64) -> Self {
        Self {
            v_plus: nu - theta,
            v_minus: nu + theta,
        }
    }

    #[inline]
    pub fn prandtl_meyer_angle(&self) -> f64 {
        0.5 * (self.v_plus + self.v_minus)
    }

    #[inline]
    pub fn flow_direction(&self) -> f64 {
        0.5 * (self.v_minus - self.v_plus)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.v_plus.is_finite() && self.v_minus.is_finite()
    }
}

/// Resolved flow state.
///
/// Invariants:
/// - `mach >= 1` (the inverse Prandtl–Meyer map only yields supersonic values).
/// - Immutable after construction; `mu` is cached from `mach`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowState {
    inv: Invariants,
    gas: Gas,
    mach: f64,
    mu: f64,
}

impl FlowState {
    /// Resolve the Mach number for `inv`; fails if the inversion does.
    pub fn new(inv: Invariants, gas: Gas) -> Result<Self> {
        let mach = mach_from_prandtl_meyer(inv.prandtl_meyer_angle(), gas.gamma)?;
        Ok(Self {
            inv,
            gas,
            mach,
            mu: mach_angle(mach),
        })
    }

    #[inline]
    pub fn invariants(&self) -> Invariants {
        self.inv
    }
    #[inline]
    pub fn gas(&self) -> Gas {
        self.gas
    }
    #[inline]
    pub fn v_plus(&self) -> f64 {
        self.inv.v_plus
    }
    #[inline]
    pub fn v_minus(&self) -> f64 {
        self.inv.v_minus
    }
    #[inline]
    pub fn prandtl_meyer_angle(&self) -> f64 {
        self.inv.prandtl_meyer_angle()
    }
    #[inline]
    pub fn flow_direction(&self) -> f64 {
        self.inv.flow_direction()
    }
    #[inline]
    pub fn mach_number(&self) -> f64 {
        self.mach
    }
    #[inline]
    pub fn mach_angle(&self) -> f64 {
        self.mu
    }
    #[inline]
    pub fn gamma_plus_direction(&self) -> f64 {
        self.flow_direction() + self.mu
    }
    #[inline]
    pub fn gamma_minus_direction(&self) -> f64 {
        self.flow_direction() - self.mu
    }

    /// Direction of the characteristic of `family` through this state.
    /// The zero family follows the streamline.
    #[inline]
    pub fn direction(&self, family: Family) -> f64 {
        match family {
            Family::GammaPlus => self.gamma_plus_direction(),
            Family::GammaMinus => self.gamma_minus_direction(),
            Family::Zero => self.flow_direction(),
        }
    }

    /// p = p₀ / (1 + γ/2 · M²)
    #[inline]
    pub fn static_pressure(&self) -> f64 {
        self.gas.total_pressure / (1.0 + 0.5 * self.gas.gamma * self.mach * self.mach)
    }
}
