//! Beer colour from the grain bill (Morey)

use super::extract::GristItem;
use crate::core_types::units::{Colour, FluidVolume, ScalarQuantity};

/// Multiplier on colour carried into a boil.
///
/// Colour formulas use pre-boil gravity; the kettle darkens wort further as
/// it concentrates and caramelises.
pub const BOIL_COLOUR_FACTOR: f64 = 1.42;

/// Malt colour units: `MCU = Σ SRM_i × lb_i / gallons`
pub fn malt_colour_units(grist: &[GristItem<'_>], volume: FluidVolume) -> f64 {
    let gallons = volume.us_gallons();
    if gallons <= 0.0 {
        return 0.0;
    }
    grist
        .iter()
        .map(|(f, w)| f.colour.srm() * w.pounds())
        .sum::<f64>()
        / gallons
}

/// Morey colour estimate
///
/// # Formula
/// ```text
/// SRM = 1.499 × MCU^0.6859
/// ```
/// An empty grain bill is 0 SRM.
pub fn morey_colour(grist: &[GristItem<'_>], volume: FluidVolume) -> Colour {
    let est = volume.is_estimated()
        || grist
            .iter()
            .any(|(f, w)| f.colour.is_estimated() || w.is_estimated());
    let mcu = malt_colour_units(grist, volume);
    if mcu <= 0.0 {
        return Colour::from_canonical(0.0, est);
    }
    Colour::from_canonical(1.499 * mcu.powf(0.6859), est)
}

/// Colour leaving a boil: carried colour darkened by [`BOIL_COLOUR_FACTOR`]
/// plus the Morey colour of fermentables added to the kettle
pub fn boil_colour(carried: Option<Colour>, kettle_additions: Colour) -> Colour {
    match carried {
        Some(c) => c * BOIL_COLOUR_FACTOR + kettle_additions,
        None => kettle_additions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::ingredients::Fermentable;
    use crate::core_types::units::Weight;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_bill_is_zero() {
        let c = morey_colour(&[], FluidVolume::from_litres(20.0));
        assert_eq!(c.srm(), 0.0);
    }

    #[test]
    fn test_morey() {
        let crystal = Fermentable::crystal_60();
        let grist = [(&crystal, Weight::from_pounds(1.0))];
        let volume = FluidVolume::from_us_gallons(5.0);
        let mcu = crystal.colour.srm() / 5.0;
        assert_relative_eq!(
            morey_colour(&grist, volume).srm(),
            1.499 * mcu.powf(0.6859),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_boil_colour() {
        let c = boil_colour(Some(Colour::new(10.0)), Colour::new(1.0));
        assert_relative_eq!(c.srm(), 15.2, epsilon = 1e-9);
        assert_relative_eq!(boil_colour(None, Colour::new(3.0)).srm(), 3.0);
    }

    #[test]
    fn test_morey_estimated_propagation() {
        let crystal = Fermentable::crystal_60();
        let weight = Weight::from_pounds(1.0);
        let volume = FluidVolume::from_us_gallons(5.0);
        assert!(!morey_colour(&[(&crystal, weight)], volume).is_estimated());

        let mut guessed = crystal.clone();
        guessed.colour = guessed.colour.with_estimated(true);
        assert!(morey_colour(&[(&guessed, weight)], volume).is_estimated());
        assert!(morey_colour(&[(&crystal, weight.with_estimated(true))], volume).is_estimated());
        assert!(morey_colour(&[(&crystal, weight)], volume.with_estimated(true)).is_estimated());
    }

    #[test]
    fn test_boil_colour_estimated_propagation() {
        let measured = boil_colour(Some(Colour::new(10.0)), Colour::new(1.0));
        assert!(!measured.is_estimated());
        assert!(boil_colour(Some(Colour::new(10.0).with_estimated(true)), Colour::new(1.0)).is_estimated());
        assert!(boil_colour(Some(Colour::new(10.0)), Colour::new(1.0).with_estimated(true)).is_estimated());
        assert!(boil_colour(None, Colour::new(3.0).with_estimated(true)).is_estimated());
    }
}
