//! Water additive solver against realistic brewing targets
//!
//! Run tests with: cargo test --test `water_treatment`

use brew_core::water::{
    best_fit, calc_additions, Goal, Ion, IonConstraint, SaltAdditions, WaterProfile, WaterSalt,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sulfate-forward pale ale water
fn burton_like() -> WaterProfile {
    WaterProfile::from_ppm(110.0, 18.0, 20.0, 280.0, 50.0, 40.0)
}

fn soft_tap() -> WaterProfile {
    WaterProfile::from_ppm(15.0, 4.0, 12.0, 10.0, 18.0, 45.0)
}

#[test]
fn test_single_salt_cannot_hit_every_ion_exactly() {
    let result = calc_additions(
        &soft_tap(),
        &burton_like(),
        &[WaterSalt::CalciumSulfate],
        &[IonConstraint::Exactly; 6],
        Goal::Minimise,
    );
    assert!(result.is_none());
}

#[test]
fn test_full_salt_set_fits_better_than_gypsum_alone() {
    let start = soft_tap();
    let target = burton_like();

    let gypsum = best_fit(&start, &target, &[WaterSalt::CalciumSulfate]).unwrap();
    let everything = best_fit(&start, &target, &WaterSalt::ALL).unwrap();

    assert!(everything.mse < gypsum.mse, "{} vs {}", everything.mse, gypsum.mse);
    for (salt, _) in gypsum.additions.iter() {
        assert_eq!(salt, WaterSalt::CalciumSulfate);
    }
}

#[test]
fn test_treated_water_never_goes_negative() {
    // Lactic acid is the only way down for bicarbonate
    let start = WaterProfile::from_ppm(60.0, 10.0, 20.0, 40.0, 30.0, 250.0);
    let target = WaterProfile::from_ppm(60.0, 10.0, 20.0, 40.0, 30.0, 0.0);
    let fit = best_fit(&start, &target, &WaterSalt::ALL).unwrap();
    for ion in Ion::ALL {
        assert!(
            fit.profile.get(ion).ppm() >= -1e-6,
            "{ion} went negative: {}",
            fit.profile.get(ion).ppm()
        );
    }
    assert!(fit.additions.rate(WaterSalt::LacticAcid).ppm() > 0.0);
}

#[test]
fn test_reachable_target_is_found() {
    let start = WaterProfile::distilled();
    let mut dose = SaltAdditions::default();
    dose.set_rate(WaterSalt::CalciumSulfate, 300.0);
    dose.set_rate(WaterSalt::CalciumChloride, 120.0);
    let target = dose.apply(&start);

    let fit = best_fit(&start, &target, &WaterSalt::ALL).unwrap();
    assert!(fit.mse < 1e-3, "mse {}", fit.mse);
}

#[test]
fn test_best_fit_is_deterministic() {
    let first = best_fit(&soft_tap(), &burton_like(), &WaterSalt::ALL).unwrap();
    for _ in 0..3 {
        let again = best_fit(&soft_tap(), &burton_like(), &WaterSalt::ALL).unwrap();
        assert_eq!(again.index, first.index);
        assert_eq!(again.additions, first.additions);
    }
}
