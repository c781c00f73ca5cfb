//! Hop bitterness (Tinseth) and post-boil hop-stand isomerisation
//!
//! # References
//! - Tinseth, G. "Glenn's Hop Utilization Numbers" (1997).
//! - Malowicki, M.G. & Shellhammer, T.H. (2005). "Isomerization and
//!   degradation kinetics of hop (Humulus lupulus) acids in a model wort-boiling
//!   system." J. Agric. Food Chem. 53(11), 4434-4439.

use crate::core_types::ingredients::Hop;
use crate::core_types::units::{
    any_estimated, Bitterness, Density, FluidVolume, ScalarQuantity, Temperature, Time, Weight,
};

/// Integration step for hop-stand isomerisation, minutes
pub const HOP_STAND_STEP_MINUTES: f64 = 0.001;

/// Minutes of a stand counted at full boil utilisation
pub const HOP_STAND_FULL_UTILISATION_MINUTES: f64 = 5.0;

/// Tinseth bigness factor: `1.65 × 0.000125^(SG − 1)`
pub fn bigness_factor(gravity: Density) -> f64 {
    1.65 * 0.000125_f64.powf(gravity.specific_gravity() - 1.0)
}

/// Tinseth boil-time factor: `(1 − e^(−0.04 × minutes)) / 4.15`
pub fn boil_time_factor(minutes: f64) -> f64 {
    (1.0 - (-0.04 * minutes).exp()) / 4.15
}

/// Alpha acids dissolved into `volume`, mg/L
pub fn alpha_acid_concentration(hop: &Hop, weight: Weight, volume: FluidVolume) -> f64 {
    let litres = volume.litres();
    if litres <= 0.0 {
        return 0.0;
    }
    weight.grams() * hop.alpha_acid.fraction() * 1000.0 / litres
}

/// Tinseth bitterness of one hop charge
///
/// # Formula
/// ```text
/// IBU = bigness(SG) × time_factor(t) × (g × α × 1000 / L) × utilisation
/// ```
/// `time` is the charge's remaining boil time; `utilisation` is the equipment
/// (or mash-hop) multiplier, applied last.
pub fn tinseth_ibu(
    hop: &Hop,
    weight: Weight,
    time: Time,
    volume: FluidVolume,
    gravity: Density,
    utilisation: f64,
) -> Bitterness {
    let est = any_estimated(&[
        hop.alpha_acid.is_estimated(),
        weight.is_estimated(),
        time.is_estimated(),
        volume.is_estimated(),
        gravity.is_estimated(),
    ]);
    let ibu = bigness_factor(gravity)
        * boil_time_factor(time.minutes())
        * alpha_acid_concentration(hop, weight, volume)
        * utilisation;
    Bitterness::from_canonical(ibu, est)
}

/// Wort temperature `minutes` into a stand that started at `start`.
///
/// Empirical kettle cooling curve settling toward 43.46 °C:
/// `T(t) = (T0 − 43.46) × e^(−0.0419 t) + 43.46`
pub fn stand_temperature(start: Temperature, minutes: f64) -> Temperature {
    const AMBIENT_ASYMPTOTE: f64 = 43.46;
    const DECAY_PER_MINUTE: f64 = 0.0419;
    Temperature::from_canonical(
        (start.celsius() - AMBIENT_ASYMPTOTE) * (-DECAY_PER_MINUTE * minutes).exp()
            + AMBIENT_ASYMPTOTE,
        start.is_estimated(),
    )
}

/// Isomerisation rate at `temperature` relative to a rolling boil.
///
/// Arrhenius rate `k = 2.39e11 × e^(−9773 / T_K)` per minute, divided by the
/// rate at 100 °C.
pub fn relative_isomerisation_rate(temperature: Temperature) -> f64 {
    const ACTIVATION: f64 = 9773.0;
    let boil_k = Temperature::BOILING.kelvin();
    (-ACTIVATION / temperature.kelvin() + ACTIVATION / boil_k).exp()
}

/// Equivalent boil minutes a stand of `duration` gives, by integrating the
/// relative isomerisation rate along the stand's cooling curve. The first
/// [`HOP_STAND_FULL_UTILISATION_MINUTES`] count at full rate.
pub fn effective_stand_minutes(start: Temperature, duration: Time) -> f64 {
    let total = duration.minutes();
    let steps = (total / HOP_STAND_STEP_MINUTES).round() as usize;
    let mut effective = 0.0;
    for i in 0..steps {
        let t = i as f64 * HOP_STAND_STEP_MINUTES;
        let factor = if t < HOP_STAND_FULL_UTILISATION_MINUTES {
            1.0
        } else {
            relative_isomerisation_rate(stand_temperature(start, t))
        };
        effective += factor * HOP_STAND_STEP_MINUTES;
    }
    effective
}

/// Extra bitterness a hop charge picks up during a post-boil stand.
///
/// `boiled` is how long the charge already boiled (zero for hops added at
/// the start of the stand). The stand's effective minutes extend the Tinseth
/// time factor beyond the boil:
///
/// ```text
/// IBU = bigness × (tf(boiled + effective) − tf(boiled)) × mg/L × utilisation
/// ```
#[allow(clippy::too_many_arguments)]
pub fn hop_stand_ibu(
    hop: &Hop,
    weight: Weight,
    boiled: Time,
    stand: Time,
    start: Temperature,
    volume: FluidVolume,
    gravity: Density,
    utilisation: f64,
) -> Bitterness {
    let est = any_estimated(&[
        hop.alpha_acid.is_estimated(),
        weight.is_estimated(),
        boiled.is_estimated(),
        stand.is_estimated(),
        start.is_estimated(),
        volume.is_estimated(),
        gravity.is_estimated(),
    ]);
    let effective = effective_stand_minutes(start, stand);
    let before = boiled.minutes();
    let extra = boil_time_factor(before + effective) - boil_time_factor(before);
    let ibu =
        bigness_factor(gravity) * extra * alpha_acid_concentration(hop, weight, volume) * utilisation;
    Bitterness::from_canonical(ibu.max(0.0), est)
}
