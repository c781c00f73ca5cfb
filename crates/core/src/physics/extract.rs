//! Extract, gravity and volume equations for mashing, lautering and boiling

use crate::core_types::ingredients::Fermentable;
use crate::core_types::units::{
    any_estimated, Density, FluidVolume, Percentage, ScalarQuantity, Time, Weight,
};

/// Litres of volume a kilogram of grain displaces in the mash
pub const GRAIN_DISPLACEMENT_L_PER_KG: f64 = 0.67;

/// Litres of water a kilogram of grain retains after lautering
pub const GRAIN_ABSORPTION_L_PER_KG: f64 = 1.04;

/// A fermentable and how much of it went in
pub type GristItem<'a> = (&'a Fermentable, Weight);

fn grist_estimated(grist: &[GristItem<'_>]) -> bool {
    grist
        .iter()
        .any(|(f, w)| w.is_estimated() || f.extract_yield.is_estimated())
}

/// Total grist weight
pub fn grist_weight(grist: &[GristItem<'_>]) -> Weight {
    grist.iter().fold(Weight::ZERO, |acc, (_, w)| acc + *w)
}

/// Volume of water plus grain in the tun: `V = water + 0.67 L/kg × grain`
pub fn mash_volume(water: FluidVolume, grain: Weight) -> FluidVolume {
    let est = any_estimated(&[water.is_estimated(), grain.is_estimated()]);
    FluidVolume::from_canonical(
        water.millilitres() + GRAIN_DISPLACEMENT_L_PER_KG * grain.kilograms() * 1000.0,
        est,
    )
}

/// Water held in a mash of `volume`; the inverse of [`mash_volume`]
pub fn mash_water(volume: FluidVolume, grain: Weight) -> FluidVolume {
    let est = volume.is_estimated() || grain.is_estimated();
    let ml = volume.millilitres() - GRAIN_DISPLACEMENT_L_PER_KG * grain.kilograms() * 1000.0;
    FluidVolume::from_canonical(ml.max(0.0), est)
}

/// Wort run off a mash: `V = water − 1.04 L/kg × grain − lauter loss`, floored at zero
pub fn wort_volume(water: FluidVolume, grain: Weight, lauter_loss: FluidVolume) -> FluidVolume {
    let est = any_estimated(&[
        water.is_estimated(),
        grain.is_estimated(),
        lauter_loss.is_estimated(),
    ]);
    let ml = water.millilitres()
        - GRAIN_ABSORPTION_L_PER_KG * grain.kilograms() * 1000.0
        - lauter_loss.millilitres();
    FluidVolume::from_canonical(ml.max(0.0), est)
}

/// Weight of extract the mash dissolves: `E = Σ kg × yield × efficiency`
pub fn mash_extract(grist: &[GristItem<'_>], efficiency: Percentage) -> Weight {
    let kg: f64 = grist
        .iter()
        .map(|(f, w)| w.kilograms() * f.extract_yield.fraction() * efficiency.fraction())
        .sum();
    Weight::from_canonical(
        kg * 1000.0,
        grist_estimated(grist) || efficiency.is_estimated(),
    )
}

/// Gravity of a mash from its water:grain ratio (yield model)
///
/// # Formula
/// ```text
/// E = Σ kg_i × yield_i × efficiency
/// °P = 100 × E / (E + W)          W = kg of mash water
/// ```
pub fn mash_gravity(grist: &[GristItem<'_>], water: FluidVolume, efficiency: Percentage) -> Density {
    extract_gravity(mash_extract(grist, efficiency), water)
}

/// Gravity of `extract` dissolved in `water`: `°P = 100 × E / (E + W)`
pub fn extract_gravity(extract: Weight, water: FluidVolume) -> Density {
    let est = extract.is_estimated() || water.is_estimated();
    let e = extract.kilograms();
    let w = water.litres();
    if e + w <= 0.0 {
        return Density::WATER.with_estimated(est);
    }
    Density::from_plato(100.0 * e / (e + w)).with_estimated(est)
}

/// Extract held by `water` at `gravity`; the inverse of [`extract_gravity`]
///
/// ```text
/// E = W × °P / (100 − °P)
/// ```
pub fn dissolved_extract(gravity: Density, water: FluidVolume) -> Weight {
    let est = gravity.is_estimated() || water.is_estimated();
    let plato = gravity.plato();
    if plato <= 0.0 || plato >= 100.0 {
        return Weight::from_canonical(0.0, est);
    }
    Weight::from_canonical(water.litres() * plato / (100.0 - plato) * 1000.0, est)
}

/// Gravity from points-per-pound-per-gallon (PPG model)
///
/// # Formula
/// ```text
/// GU = Σ ppg_i × lb_i × efficiency / gallons
/// ```
/// An empty list contributes no points.
pub fn ppg_gravity(
    fermentables: &[GristItem<'_>],
    volume: FluidVolume,
    efficiency: Percentage,
) -> Density {
    let est = grist_estimated(fermentables) || volume.is_estimated() || efficiency.is_estimated();
    let gallons = volume.us_gallons();
    if gallons <= 0.0 {
        return Density::WATER.with_estimated(est);
    }
    let points: f64 = fermentables
        .iter()
        .map(|(f, w)| f.ppg() * w.pounds() * efficiency.fraction())
        .sum();
    Density::from_gravity_units(points / gallons).with_estimated(est)
}

/// Gravity points a volume of wort holds (`GU × gallons`), the quantity that
/// is conserved through boiling and dilution
pub fn gravity_points(gravity: Density, volume: FluidVolume) -> f64 {
    gravity.gravity_units() * volume.us_gallons()
}

/// Volume left after boiling for `duration`
///
/// # Formula
/// ```text
/// V_out = V_in × (1 − rate × hours)
/// ```
pub fn boiled_volume(volume: FluidVolume, evaporation_rate: Percentage, duration: Time) -> FluidVolume {
    let est = any_estimated(&[
        volume.is_estimated(),
        evaporation_rate.is_estimated(),
        duration.is_estimated(),
    ]);
    let factor = (1.0 - evaporation_rate.fraction() * duration.hours()).max(0.0);
    FluidVolume::from_canonical(volume.millilitres() * factor, est)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mash_and_wort_volume() {
        let water = FluidVolume::from_litres(15.0);
        let grain = Weight::from_kilograms(5.0);
        assert_relative_eq!(mash_volume(water, grain).litres(), 15.0 + 3.35, epsilon = 1e-9);
        assert_relative_eq!(
            mash_water(mash_volume(water, grain), grain).litres(),
            15.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            wort_volume(water, grain, FluidVolume::from_litres(1.0)).litres(),
            15.0 - 5.2 - 1.0,
            epsilon = 1e-9
        );
        assert_eq!(
            wort_volume(FluidVolume::from_litres(2.0), grain, FluidVolume::ZERO).litres(),
            0.0
        );
    }

    #[test]
    fn test_mash_gravity_yield_model() {
        let pale = Fermentable::pale_malt();
        let grist = [(&pale, Weight::from_kilograms(4.0))];
        let g = mash_gravity(&grist, FluidVolume::from_litres(12.0), Percentage::new(1.0));
        // E = 4 × 0.79 = 3.16 kg, °P = 316 / 15.16
        assert_relative_eq!(g.plato(), 316.0 / 15.16, epsilon = 1e-9);
        assert!(!g.is_estimated());
    }

    #[test]
    fn test_dissolved_extract_inverts() {
        let water = FluidVolume::from_litres(12.0);
        let g = extract_gravity(Weight::from_kilograms(3.0), water);
        assert_relative_eq!(dissolved_extract(g, water).kilograms(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ppg_gravity() {
        let sugar = Fermentable::table_sugar();
        let items = [(&sugar, Weight::from_pounds(1.0))];
        let g = ppg_gravity(&items, FluidVolume::from_us_gallons(1.0), Percentage::new(1.0));
        assert_relative_eq!(g.gravity_units(), 46.214, epsilon = 1e-9);
        let empty = ppg_gravity(&[], FluidVolume::from_litres(20.0), Percentage::new(1.0));
        assert_relative_eq!(empty.specific_gravity(), 1.0);
    }

    #[test]
    fn test_boiled_volume() {
        let v = boiled_volume(
            FluidVolume::from_litres(20.0),
            Percentage::new(0.1),
            Time::from_minutes(60.0),
        );
        assert_relative_eq!(v.litres(), 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_estimated_propagates() {
        let v = boiled_volume(
            FluidVolume::from_litres(20.0).with_estimated(true),
            Percentage::new(0.1),
            Time::from_minutes(60.0),
        );
        assert!(v.is_estimated());
    }
}
