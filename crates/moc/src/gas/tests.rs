use super::*;
use proptest::prelude::*;

#[test]
fn known_values_air() {
    // ν(2) ≈ 26.3798°, ν(3) ≈ 49.7573° for γ = 1.4
    let nu2 = prandtl_meyer(2.0, 1.4).unwrap();
    assert!((nu2.to_degrees() - 26.3798).abs() < 1e-3);
    let nu3 = prandtl_meyer(3.0, 1.4).unwrap();
    assert!((nu3.to_degrees() - 49.7573).abs() < 1e-3);
    let max = max_prandtl_meyer(1.4).unwrap();
    assert!((max.to_degrees() - 130.4541).abs() < 1e-3);
}

#[test]
fn sonic_and_subsonic_are_zero() {
    assert_eq!(prandtl_meyer(1.0, 1.4).unwrap(), 0.0);
    assert_eq!(prandtl_meyer(0.5, 1.4).unwrap(), 0.0);
    assert_eq!(mach_from_prandtl_meyer(0.0, 1.4).unwrap(), 1.0);
}

#[test]
fn rejects_bad_inputs() {
    assert!(matches!(
        prandtl_meyer(0.0, 1.4),
        Err(MocError::InvalidMach(_))
    ));
    assert!(matches!(
        prandtl_meyer(-2.0, 1.4),
        Err(MocError::InvalidMach(_))
    ));
    assert!(matches!(
        prandtl_meyer(2.0, 1.0),
        Err(MocError::InvalidGamma(_))
    ));
    assert!(matches!(
        mach_from_prandtl_meyer(-0.1, 1.4),
        Err(MocError::AngleOutOfRange { .. })
    ));
    let max = max_prandtl_meyer(1.4).unwrap();
    assert!(matches!(
        mach_from_prandtl_meyer(max, 1.4),
        Err(MocError::AngleOutOfRange { .. })
    ));
    assert!(mach_from_prandtl_meyer(f64::NAN, 1.4).is_err());
}

#[test]
fn mach_angle_of_sonic_is_right_angle() {
    assert!((mach_angle(1.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!((mach_angle(2.0) - std::f64::consts::FRAC_PI_6).abs() < 1e-12);
}

proptest! {
    #[test]
    fn inverse_recovers_mach(mach in 1.01f64..8.0, gamma in 1.1f64..1.67) {
        let nu = prandtl_meyer(mach, gamma).unwrap();
        let back = mach_from_prandtl_meyer(nu, gamma).unwrap();
        prop_assert!((back - mach).abs() < 1e-6 * mach);
    }

    #[test]
    fn prandtl_meyer_is_monotone(m1 in 1.0f64..6.0, dm in 1e-3f64..2.0) {
        let a = prandtl_meyer(m1, 1.4).unwrap();
        let b = prandtl_meyer(m1 + dm, 1.4).unwrap();
        prop_assert!(b > a);
    }
}
