//! Run configuration and seed points for an under/over-expanded planar jet.
//!
//! Model
//! - The inlet is a vertical line `x = 0`, `y ∈ [0, h)`, carrying uniform
//!   flow at `inlet_mach` and flow angle `inlet_flow_angle` (0 for a parallel
//!   nozzle exit). The first inlet point sits on the lower wall and is
//!   tagged `Lower`.
//! - A centered expansion fan sits at the lip `(0, h)`. Its outlet Mach number
//!   follows from the pressure ratio; the fan's flow direction is interpolated
//!   linearly between inlet and outlet, holding v⁺ at its inlet value. Fan
//!   points shoot γ⁻ rays only; the last one is the jet-boundary point.
//!   Interior fan rays stop at the first one that would turn upward past its
//!   predecessor; the boundary point is always kept.
//! - The reference stagnation pressure puts the outlet (boundary) static
//!   pressure at `atmospheric_pressure`.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::error::{MocError, Result};
use crate::flow::{FlowState, Gas, Invariants};
use crate::gas::prandtl_meyer;
use crate::march::{Boundary, Family, FluidPoint};

/// Inputs of one jet computation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetConfig {
    /// Nozzle exit pressure over ambient pressure.
    pub pressure_ratio: f64,
    pub jet_half_width: f64,
    pub gamma: f64,
    pub inlet_mach: f64,
    /// Flow angle at the nozzle exit, radians (positive turns outward).
    pub inlet_flow_angle: f64,
    pub fan_rays: usize,
    pub inlet_points: usize,
    /// Pa; only scales reported pressures.
    pub atmospheric_pressure: f64,
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            pressure_ratio: 2.0,
            jet_half_width: 1.0,
            gamma: 1.4,
            inlet_mach: 2.0,
            inlet_flow_angle: 0.0,
            fan_rays: 4,
            inlet_points: 5,
            atmospheric_pressure: 101_325.0,
        }
    }
}

/// Fan end states derived from a `JetConfig`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanStates {
    pub inlet: Invariants,
    pub outlet: Invariants,
    pub outlet_mach: f64,
    pub gas: Gas,
}

impl JetConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(MocError::InvalidConfig(format!("{name} must be > 0, got {v}")))
            }
        };
        positive("pressure_ratio", self.pressure_ratio)?;
        positive("jet_half_width", self.jet_half_width)?;
        positive("atmospheric_pressure", self.atmospheric_pressure)?;
        if !(self.gamma.is_finite() && self.gamma > 1.0) {
            return Err(MocError::InvalidConfig(format!(
                "gamma must be > 1, got {}",
                self.gamma
            )));
        }
        if !(self.inlet_mach.is_finite() && self.inlet_mach > 1.0) {
            return Err(MocError::InvalidConfig(format!(
                "inlet_mach must be > 1, got {}",
                self.inlet_mach
            )));
        }
        if !(self.inlet_flow_angle.is_finite() && self.inlet_flow_angle.abs() < FRAC_PI_2) {
            return Err(MocError::InvalidConfig(format!(
                "inlet_flow_angle must lie in (-π/2, π/2), got {}",
                self.inlet_flow_angle
            )));
        }
        if self.fan_rays < 2 {
            return Err(MocError::InvalidConfig(format!(
                "fan_rays must be >= 2, got {}",
                self.fan_rays
            )));
        }
        if self.inlet_points < 1 {
            return Err(MocError::InvalidConfig(
                "inlet_points must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Inlet/outlet invariants of the lip fan and the run's gas constants.
    pub fn fan_states(&self) -> Result<FanStates> {
        self.validate()?;
        let g = self.gamma;
        let nu_in = prandtl_meyer(self.inlet_mach, g)?;
        let inlet = Invariants::from_angles(nu_in, self.inlet_flow_angle);

        let stagnation = self.pressure_ratio * (1.0 + 0.5 * g * self.inlet_mach.powi(2));
        let outlet_mach = ((stagnation - 1.0) * 2.0 / g).sqrt();
        if outlet_mach.is_nan() || outlet_mach <= 1.0 {
            return Err(MocError::InvalidConfig(format!(
                "pressure_ratio {} leaves the fan subsonic (M = {outlet_mach})",
                self.pressure_ratio
            )));
        }
        let nu_out = prandtl_meyer(outlet_mach, g)?;
        let theta_out = nu_out - inlet.v_plus;
        let outlet = Invariants::new(inlet.v_plus, nu_out + theta_out);

        let gas = Gas {
            gamma: g,
            total_pressure: self.atmospheric_pressure * (1.0 + 0.5 * g * outlet_mach * outlet_mach),
        };
        Ok(FanStates {
            inlet,
            outlet,
            outlet_mach,
            gas,
        })
    }
}

/// Ordered seed list: inlet points bottom-up, then fan points (last = jet boundary).
pub fn seed_points(cfg: &JetConfig) -> Result<Vec<FluidPoint>> {
    let fan = cfg.fan_states()?;
    let h = cfg.jet_half_width;
    let n = cfg.inlet_points;
    let mut seeds = Vec::with_capacity(n + cfg.fan_rays);

    let inlet_state = FlowState::new(fan.inlet, fan.gas)?;
    for k in 0..n {
        let y = h * k as f64 / n as f64;
        let boundary = if k == 0 { Boundary::Lower } else { Boundary::None };
        seeds.push(FluidPoint::new(Vector2::new(0.0, y), inlet_state, boundary));
    }

    let lip = Vector2::new(0.0, h);
    let theta_in = fan.inlet.flow_direction();
    let theta_out = fan.outlet.flow_direction();
    let last = cfg.fan_rays - 1;
    let mut previous: Option<f64> = None;
    for k in 0..last {
        let theta = theta_in + (theta_out - theta_in) * k as f64 / last as f64;
        let inv = Invariants::new(fan.inlet.v_plus, fan.inlet.v_plus + 2.0 * theta);
        let point = FluidPoint::seed(lip, inv, fan.gas, Boundary::MinusOnly)?;
        let dir = fan_ray_direction(&point);
        if previous.is_some_and(|prev| dir > 0.0 && dir > prev) {
            debug!(kept = k, requested = cfg.fan_rays, "fan rays cut off");
            break;
        }
        previous = Some(dir);
        seeds.push(point);
    }
    seeds.push(FluidPoint::seed(lip, fan.outlet, fan.gas, Boundary::Upper)?);
    Ok(seeds)
}

fn fan_ray_direction(point: &FluidPoint) -> f64 {
    point
        .flow()
        .map_or(0.0, |f| f.direction(Family::GammaMinus))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        JetConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let bad = [
            JetConfig {
                pressure_ratio: 0.0,
                ..JetConfig::default()
            },
            JetConfig {
                inlet_mach: 1.0,
                ..JetConfig::default()
            },
            JetConfig {
                gamma: 1.0,
                ..JetConfig::default()
            },
            JetConfig {
                fan_rays: 1,
                ..JetConfig::default()
            },
            JetConfig {
                inlet_points: 0,
                ..JetConfig::default()
            },
            JetConfig {
                inlet_flow_angle: 2.0,
                ..JetConfig::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(MocError::InvalidConfig(_))));
        }
    }

    #[test]
    fn underexpanded_fan_turns_outward_and_hits_ambient_pressure() {
        let cfg = JetConfig::default();
        let fan = cfg.fan_states().unwrap();
        assert!(fan.outlet_mach > cfg.inlet_mach);
        assert!(fan.outlet.flow_direction() > 0.0);
        assert_eq!(fan.outlet.v_plus, fan.inlet.v_plus);
        let out = FlowState::new(fan.outlet, fan.gas).unwrap();
        assert!((out.mach_number() - fan.outlet_mach).abs() < 1e-6);
        let rel = (out.static_pressure() - cfg.atmospheric_pressure).abs() / cfg.atmospheric_pressure;
        assert!(rel < 1e-6);
    }

    #[test]
    fn seeds_follow_layout() {
        let cfg = JetConfig::default();
        let seeds = seed_points(&cfg).unwrap();
        assert_eq!(seeds.len(), cfg.inlet_points + cfg.fan_rays);
        assert_eq!(seeds[0].boundary(), Boundary::Lower);
        assert!(seeds[1..cfg.inlet_points]
            .iter()
            .all(|p| p.boundary() == Boundary::None && p.position().x == 0.0));
        let fan = &seeds[cfg.inlet_points..];
        assert!(fan[..fan.len() - 1]
            .iter()
            .all(|p| p.boundary() == Boundary::MinusOnly && p.untried().eq([Family::GammaMinus])));
        let lip = fan.last().unwrap();
        assert_eq!(lip.boundary(), Boundary::Upper);
        assert_eq!(lip.position(), Vector2::new(0.0, cfg.jet_half_width));
        assert!(seeds.iter().all(|p| p.mach_number().unwrap() >= 1.0));
    }

    #[test]
    fn inlet_flow_angle_tilts_inlet_and_fan() {
        let cfg = JetConfig {
            inlet_flow_angle: 0.05,
            ..JetConfig::default()
        };
        let fan = cfg.fan_states().unwrap();
        let flat = JetConfig::default().fan_states().unwrap();
        assert!((fan.inlet.flow_direction() - 0.05).abs() < 1e-12);
        assert!((fan.inlet.prandtl_meyer_angle() - flat.inlet.prandtl_meyer_angle()).abs() < 1e-12);
        // the fan turns by the same Prandtl-Meyer increment from the tilted inlet
        let turn = fan.outlet.flow_direction() - fan.inlet.flow_direction();
        let flat_turn = flat.outlet.flow_direction() - flat.inlet.flow_direction();
        assert!((turn - flat_turn).abs() < 1e-12);
        let seeds = seed_points(&cfg).unwrap();
        assert!(seeds[..cfg.inlet_points]
            .iter()
            .all(|p| (p.flow().unwrap().flow_direction() - 0.05).abs() < 1e-12));
    }

    #[test]
    fn strong_fan_drops_rays_turning_upstream() {
        let cfg = JetConfig {
            pressure_ratio: 20.0,
            fan_rays: 8,
            ..JetConfig::default()
        };
        let seeds = seed_points(&cfg).unwrap();
        let fan = &seeds[cfg.inlet_points..];
        assert!(fan.len() < cfg.fan_rays);
        let interior = &fan[..fan.len() - 1];
        assert!(!interior.is_empty());
        let dirs: Vec<f64> = interior.iter().map(fan_ray_direction).collect();
        assert!(dirs.windows(2).all(|w| w[1] <= 0.0 || w[1] <= w[0]));
        let lip = fan.last().unwrap();
        assert_eq!(lip.boundary(), Boundary::Upper);
        let outlet = cfg.fan_states().unwrap().outlet_mach;
        assert!((lip.mach_number().unwrap() - outlet).abs() < 1e-6);
    }

    #[test]
    fn default_fan_keeps_every_ray() {
        let cfg = JetConfig::default();
        let seeds = seed_points(&cfg).unwrap();
        assert_eq!(seeds.len() - cfg.inlet_points, cfg.fan_rays);
    }
}
