//! Randomised conversions between every pair of units of the same kind
//!
//! Run tests with: cargo test --test `unit_conversions`

use brew_core::core_types::{parse_quantity, Quantity, QuantityKind, Unit};
use brew_core::BrewError;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A plausible canonical amount for `kind`
fn sample(rng: &mut StdRng, kind: QuantityKind) -> f64 {
    match kind {
        QuantityKind::Density => rng.random_range(990.0..1130.0),
        QuantityKind::Temperature => rng.random_range(-5.0..105.0),
        QuantityKind::Ph => rng.random_range(3.0..9.0),
        QuantityKind::Percentage => rng.random_range(0.0..1.0),
        _ => rng.random_range(0.1..5000.0),
    }
}

#[test]
fn test_cross_unit_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x000b_ee75);
    for _ in 0..200 {
        for from in Unit::ALL {
            let kind = from.kind();
            let canonical = Quantity::new(sample(&mut rng, kind), kind.canonical_unit());
            let amount = canonical.get(from).unwrap();
            for to in kind.units() {
                let converted = Quantity::new(amount, from).get(to).unwrap();
                let back = Quantity::new(converted, to).value();
                let tolerance = 1e-9 * canonical.value().abs().max(1.0);
                assert!(
                    (back - canonical.value()).abs() <= tolerance,
                    "{from:?} -> {to:?}: {} became {back}",
                    canonical.value()
                );
            }
        }
    }
}

#[test]
fn test_foreign_units_are_rejected() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let a = Unit::ALL[rng.random_range(0..Unit::ALL.len())];
        let b = Unit::ALL[rng.random_range(0..Unit::ALL.len())];
        let q = Quantity::new(1.0, a);
        match q.get(b) {
            Ok(_) => assert_eq!(a.kind(), b.kind()),
            Err(BrewError::InvalidUnit { unit, kind }) => {
                assert_eq!(unit, b);
                assert_eq!(kind, a.kind());
            }
            Err(other) => panic!("unexpected error {other}"),
        }
    }
}

#[test]
fn test_parsed_text_matches_constructed_quantity() {
    let og = parse_quantity(" 1.052 ", Unit::SpecificGravity).unwrap();
    assert_eq!(og.kind(), QuantityKind::Density);
    assert!((og.value() - 1052.0).abs() < 1e-9);

    assert!(matches!(
        parse_quantity("one litre", Unit::Litres),
        Err(BrewError::Parse { .. })
    ));
    assert!(matches!(
        parse_quantity("inf", Unit::Litres),
        Err(BrewError::Parse { .. })
    ));
}
