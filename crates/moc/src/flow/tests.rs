use super::*;
use crate::gas::prandtl_meyer;
use crate::march::Family;
use crate::MocError;
use proptest::prelude::*;

const AIR: Gas = Gas {
    gamma: 1.4,
    total_pressure: 1.0,
};

#[test]
fn derived_quantities_for_uniform_mach_two() {
    let nu = prandtl_meyer(2.0, 1.4).unwrap();
    let s = FlowState::new(Invariants::new(nu, nu), AIR).unwrap();
    assert!((s.mach_number() - 2.0).abs() < 1e-9);
    assert!(s.flow_direction().abs() < 1e-15);
    assert!((s.mach_angle() - std::f64::consts::FRAC_PI_6).abs() < 1e-9);
    assert!((s.gamma_plus_direction() + s.gamma_minus_direction()).abs() < 1e-12);
    assert_eq!(s.direction(Family::Zero), s.flow_direction());
    // 1 / (1 + 0.7 * 4)
    assert!((s.static_pressure() - 1.0 / 3.8).abs() < 1e-9);
}

#[test]
fn angles_round_trip_through_invariants() {
    let inv = Invariants::from_angles(0.6, 0.1);
    assert!((inv.prandtl_meyer_angle() - 0.6).abs() < 1e-15);
    assert!((inv.flow_direction() - 0.1).abs() < 1e-15);
}

#[test]
fn unresolvable_state_is_an_error() {
    let err = FlowState::new(Invariants::new(-0.4, 0.1), AIR).unwrap_err();
    assert!(matches!(err, MocError::AngleOutOfRange { .. }));
}

proptest! {
    #[test]
    fn resolved_states_are_supersonic(nu in 1e-4f64..1.5, theta in -0.5f64..0.5) {
        let s = FlowState::new(Invariants::from_angles(nu, theta), AIR).unwrap();
        prop_assert!(s.mach_number() >= 1.0);
        prop_assert!(s.gamma_plus_direction() > s.gamma_minus_direction());
        prop_assert!(s.static_pressure() > 0.0 && s.static_pressure() < AIR.total_pressure);
    }
}
