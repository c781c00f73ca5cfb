//! Fermentability, attenuation, alcohol and carbonation

use super::extract::GristItem;
use crate::core_types::units::{
    any_estimated, Carbonation, Density, FluidVolume, Percentage, Pressure, ScalarQuantity,
    Temperature,
};

/// Mash temperature at which the fermentability model switches segments, °C
pub const FERMENTABILITY_PEAK_C: f64 = 67.5;

/// Fraction of a priming sugar's extract that ends up as dissolved CO2 by weight
pub const PRIMING_CO2_FRACTION: f64 = 0.5;

/// Wort fermentability (attenuation limit) from mash temperature
///
/// # Formula
/// ```text
/// T ≤ 67.5 °C :  f = 0.0083 × T + 0.2687
/// T > 67.5 °C :  f = −0.0275 × T + 2.6852
/// ```
pub fn mash_fermentability(mash_temperature: Temperature) -> Percentage {
    let t = mash_temperature.celsius();
    let f = if t <= FERMENTABILITY_PEAK_C {
        0.0083 * t + 0.2687
    } else {
        -0.0275 * t + 2.6852
    };
    Percentage::from_canonical(f.clamp(0.0, 1.0), mash_temperature.is_estimated())
}

/// Expected apparent attenuation: midway between the wort's fermentability
/// and the yeast's rated attenuation
pub fn estimated_attenuation(fermentability: Percentage, yeast_attenuation: Percentage) -> Percentage {
    Percentage::from_canonical(
        (fermentability.fraction() + yeast_attenuation.fraction()) / 2.0,
        fermentability.is_estimated() || yeast_attenuation.is_estimated(),
    )
}

/// Final gravity after `attenuation`: `FG = 1 + (OG − 1)(1 − a)`
pub fn final_gravity(og: Density, attenuation: Percentage) -> Density {
    let est = og.is_estimated() || attenuation.is_estimated();
    Density::from_specific_gravity(1.0 + (og.specific_gravity() - 1.0) * (1.0 - attenuation.fraction()))
        .with_estimated(est)
}

/// Alcohol by volume: `ABV = (OG − FG) × 131.25` percent
pub fn abv(og: Density, fg: Density) -> Percentage {
    let est = og.is_estimated() || fg.is_estimated();
    Percentage::from_canonical(
        ((og.specific_gravity() - fg.specific_gravity()) * 131.25 / 100.0).max(0.0),
        est,
    )
}

/// Dissolved CO2 at equilibrium under `pressure` (gauge) at `temperature`
///
/// # Formula
/// ```text
/// vols = (P_psi + 14.695) × (0.01821 + 0.090115 × e^(−(T_F − 32) / 43.11)) − 0.003342
/// ```
pub fn equilibrium_carbonation(temperature: Temperature, pressure: Pressure) -> Carbonation {
    let est = temperature.is_estimated() || pressure.is_estimated();
    let absolute_psi = pressure.psi() + 14.695;
    let t_f = temperature.fahrenheit();
    let volumes = absolute_psi * (0.01821 + 0.090115 * (-(t_f - 32.0) / 43.11).exp()) - 0.003342;
    Carbonation::from_volumes(volumes.max(0.0)).with_estimated(est)
}

/// CO2 produced by fermenting priming fermentables in `volume`
///
/// # Formula
/// ```text
/// g/L = Σ g_i × yield_i × 0.5 / L
/// ```
pub fn priming_carbonation(primers: &[GristItem<'_>], volume: FluidVolume) -> Carbonation {
    let est = volume.is_estimated()
        || primers
            .iter()
            .any(|(f, w)| w.is_estimated() || f.extract_yield.is_estimated());
    let litres = volume.litres();
    if litres <= 0.0 {
        return Carbonation::from_canonical(0.0, est);
    }
    let grams: f64 = primers
        .iter()
        .map(|(f, w)| w.grams() * f.extract_yield.fraction() * PRIMING_CO2_FRACTION)
        .sum();
    Carbonation::from_canonical(grams / litres, est)
}

/// Residual CO2 plus whatever the priming produces
pub fn carbonation_with_priming(residual: Carbonation, priming: Carbonation) -> Carbonation {
    let est = any_estimated(&[residual.is_estimated(), priming.is_estimated()]);
    Carbonation::from_canonical(residual.grams_per_litre() + priming.grams_per_litre(), est)
}
