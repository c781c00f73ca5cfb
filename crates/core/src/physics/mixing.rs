//! Mixing, dilution and volume-change equations
//!
//! Every function returns a new quantity whose `estimated` flag is the OR of
//! the inputs' flags.

use crate::core_types::units::{
    any_estimated, Bitterness, Carbonation, Colour, Density, FluidVolume, Percentage, Ph, Quantity,
    ScalarQuantity, Temperature,
};
use crate::core_types::volume::{Metric, Volume, VolumeType};
use crate::error::BrewResult;

/// Fractional volume change of wort per °C (thermal expansion of water ≈ 4% over 100 °C)
pub const COOLING_SHRINKAGE_PER_DEGREE: f64 = 0.0004;

/// Specific heat of water, cal/(g·°C)
pub const WATER_SPECIFIC_HEAT: f64 = 1.0;

/// Temperature of two mixed liquids
///
/// # Formula
/// ```text
/// T = (v1·c·T1 + v2·c·T2) / (v1·c + v2·c)
/// ```
/// Both liquids are treated as water (`c` = 1 cal/(g·°C)). Mixing nothing
/// with nothing returns `t1`.
pub fn combined_temperature(
    v1: FluidVolume,
    t1: Temperature,
    v2: FluidVolume,
    t2: Temperature,
) -> Temperature {
    let est = any_estimated(&[
        v1.is_estimated(),
        t1.is_estimated(),
        v2.is_estimated(),
        t2.is_estimated(),
    ]);
    let w1 = v1.litres() * WATER_SPECIFIC_HEAT;
    let w2 = v2.litres() * WATER_SPECIFIC_HEAT;
    if w1 + w2 <= 0.0 {
        return t1.with_estimated(est);
    }
    Temperature::from_canonical((w1 * t1.celsius() + w2 * t2.celsius()) / (w1 + w2), est)
}

/// Gravity after the same extract is spread over a different volume
///
/// # Formula
/// ```text
/// GU_out = GU_in × v_in / v_out        (GU = (SG − 1) × 1000)
/// ```
pub fn gravity_with_volume_change(
    gravity_in: Density,
    volume_in: FluidVolume,
    volume_out: FluidVolume,
) -> Density {
    let est = any_estimated(&[
        gravity_in.is_estimated(),
        volume_in.is_estimated(),
        volume_out.is_estimated(),
    ]);
    let gu = scale(gravity_in.gravity_units(), volume_in, volume_out);
    Density::from_gravity_units(gu).with_estimated(est)
}

/// Colour after a volume change: `SRM_out = SRM_in × v_in / v_out`
pub fn colour_with_volume_change(
    colour_in: Colour,
    volume_in: FluidVolume,
    volume_out: FluidVolume,
) -> Colour {
    let est = any_estimated(&[
        colour_in.is_estimated(),
        volume_in.is_estimated(),
        volume_out.is_estimated(),
    ]);
    Colour::from_canonical(scale(colour_in.srm(), volume_in, volume_out), est)
}

/// Bitterness after a volume change: `IBU_out = IBU_in × v_in / v_out`.
///
/// Missing bitterness counts as 0 IBU.
pub fn bitterness_with_volume_change(
    bitterness_in: Option<Bitterness>,
    volume_in: FluidVolume,
    volume_out: FluidVolume,
) -> Bitterness {
    let bitterness_in = bitterness_in.unwrap_or(Bitterness::ZERO);
    let est = any_estimated(&[
        bitterness_in.is_estimated(),
        volume_in.is_estimated(),
        volume_out.is_estimated(),
    ]);
    Bitterness::from_canonical(scale(bitterness_in.ibu(), volume_in, volume_out), est)
}

fn scale(amount: f64, volume_in: FluidVolume, volume_out: FluidVolume) -> f64 {
    if volume_out.millilitres() <= 0.0 {
        return amount;
    }
    amount * volume_in.millilitres() / volume_out.millilitres()
}

/// Gravity of two mixed fluids
///
/// # Formula
/// ```text
/// SG = (v1 + v2) / (v1/SG1 + v2/SG2)
/// ```
pub fn combined_gravity(v1: FluidVolume, d1: Density, v2: FluidVolume, d2: Density) -> Density {
    let est = any_estimated(&[
        v1.is_estimated(),
        d1.is_estimated(),
        v2.is_estimated(),
        d2.is_estimated(),
    ]);
    let (l1, l2) = (v1.litres(), v2.litres());
    let denominator = l1 / d1.specific_gravity() + l2 / d2.specific_gravity();
    if denominator <= 0.0 {
        return d1.with_estimated(est);
    }
    Density::from_specific_gravity((l1 + l2) / denominator).with_estimated(est)
}

/// Volume-weighted blend of any linear metric (colour, bitterness, ABV,
/// fermentability, carbonation).
///
/// Returns `None` when either value is unknown.
///
/// # Formula
/// ```text
/// q = (v1·q1 + v2·q2) / (v1 + v2)
/// ```
pub fn blend<Q: ScalarQuantity>(
    v1: FluidVolume,
    q1: Option<Q>,
    v2: FluidVolume,
    q2: Option<Q>,
) -> Option<Q> {
    let (q1, q2) = (q1?, q2?);
    let est = any_estimated(&[
        v1.is_estimated(),
        q1.is_estimated(),
        v2.is_estimated(),
        q2.is_estimated(),
    ]);
    let (l1, l2) = (v1.litres(), v2.litres());
    if l1 + l2 <= 0.0 {
        return Some(Q::from_canonical(q1.canonical(), est));
    }
    Some(Q::from_canonical(
        (l1 * q1.canonical() + l2 * q2.canonical()) / (l1 + l2),
        est,
    ))
}

/// pH of two mixed liquids, blending hydrogen-ion concentration
///
/// # Formula
/// ```text
/// pH = −log10((v1·10^−pH1 + v2·10^−pH2) / (v1 + v2))
/// ```
pub fn combined_ph(v1: FluidVolume, ph1: Option<Ph>, v2: FluidVolume, ph2: Option<Ph>) -> Option<Ph> {
    let (ph1, ph2) = (ph1?, ph2?);
    let est = any_estimated(&[
        v1.is_estimated(),
        ph1.is_estimated(),
        v2.is_estimated(),
        ph2.is_estimated(),
    ]);
    let (l1, l2) = (v1.litres(), v2.litres());
    if l1 + l2 <= 0.0 {
        return Some(ph1.with_estimated(est));
    }
    let h = (l1 * 10f64.powf(-ph1.ph()) + l2 * 10f64.powf(-ph2.ph())) / (l1 + l2);
    Some(Ph::from_canonical(-h.log10(), est))
}

/// Volume after cooling from `from` to `to`
///
/// # Formula
/// ```text
/// V_out = V_in × (1 − k × (T_from − T_to)),   k = 0.0004 /°C
/// ```
pub fn cooling_shrinkage(volume: FluidVolume, from: Temperature, to: Temperature) -> FluidVolume {
    let est = any_estimated(&[volume.is_estimated(), from.is_estimated(), to.is_estimated()]);
    let delta = from.celsius() - to.celsius();
    FluidVolume::from_canonical(
        volume.millilitres() * (1.0 - COOLING_SHRINKAGE_PER_DEGREE * delta),
        est,
    )
}

// ============================================================================
// WHOLE-VOLUME MIXING
// ============================================================================

/// Value a volume contributes to a blend of `metric`.
///
/// Water carries no extract, colour, bitterness, alcohol or CO2, so it
/// contributes the neutral value rather than an unknown.
fn contribution(volume: &Volume, metric: Metric) -> Option<Quantity> {
    if let Some(q) = volume.quantity(metric) {
        return Some(q);
    }
    if volume.volume_type() != VolumeType::Water {
        return None;
    }
    match metric {
        Metric::Gravity | Metric::OriginalGravity => Some(Density::WATER.into()),
        Metric::Colour => Some(Colour::ZERO.into()),
        Metric::Bitterness => Some(Bitterness::ZERO.into()),
        Metric::Abv => Some(Percentage::ZERO.into()),
        Metric::Carbonation => Some(Carbonation::ZERO.into()),
        _ => None,
    }
}

/// Mix two volumes into a new volume `name` of `volume_type`.
///
/// Volume and temperature add and equilibrate; gravities combine
/// harmonically; pH blends through H+ concentration; every other metric is
/// volume-weighted. Metrics unknown on either side (other than through water)
/// are left unset, and fermentability is carried from whichever side has it.
///
/// # Errors
/// [`BrewError::MissingMetric`](crate::error::BrewError::MissingMetric) when
/// either side lacks a volume.
pub fn mix_volumes(name: &str, volume_type: VolumeType, a: &Volume, b: &Volume) -> BrewResult<Volume> {
    let va: FluidVolume = a.require(Metric::Volume)?;
    let vb: FluidVolume = b.require(Metric::Volume)?;
    let mut out = Volume::new(name, volume_type);
    out.set(Metric::Volume, va + vb);

    if volume_type.allows(Metric::Temperature) {
        let t = match (a.temperature(), b.temperature()) {
            (Some(ta), Some(tb)) => Some(combined_temperature(va, ta, vb, tb)),
            (Some(t), None) | (None, Some(t)) => Some(t),
            (None, None) => None,
        };
        out.set_opt(Metric::Temperature, t);
    }

    for metric in [Metric::Gravity, Metric::OriginalGravity] {
        if !volume_type.allows(metric) {
            continue;
        }
        let da = contribution(a, metric).and_then(|q| q.as_kind::<Density>());
        let db = contribution(b, metric).and_then(|q| q.as_kind::<Density>());
        if let (Some(da), Some(db)) = (da, db) {
            out.set(metric, combined_gravity(va, da, vb, db));
        }
    }

    if volume_type.allows(Metric::Colour) {
        let c = blend::<Colour>(
            va,
            contribution(a, Metric::Colour).and_then(|q| q.as_kind()),
            vb,
            contribution(b, Metric::Colour).and_then(|q| q.as_kind()),
        );
        out.set_opt(Metric::Colour, c);
    }
    if volume_type.allows(Metric::Bitterness) {
        let ibu = blend::<Bitterness>(
            va,
            contribution(a, Metric::Bitterness).and_then(|q| q.as_kind()),
            vb,
            contribution(b, Metric::Bitterness).and_then(|q| q.as_kind()),
        );
        out.set_opt(Metric::Bitterness, ibu);
    }
    if volume_type.allows(Metric::Abv) {
        let abv = blend::<Percentage>(
            va,
            contribution(a, Metric::Abv).and_then(|q| q.as_kind()),
            vb,
            contribution(b, Metric::Abv).and_then(|q| q.as_kind()),
        );
        out.set_opt(Metric::Abv, abv);
    }
    if volume_type.allows(Metric::Carbonation) {
        let co2 = blend::<Carbonation>(
            va,
            contribution(a, Metric::Carbonation).and_then(|q| q.as_kind()),
            vb,
            contribution(b, Metric::Carbonation).and_then(|q| q.as_kind()),
        );
        out.set_opt(Metric::Carbonation, co2);
    }
    if volume_type.allows(Metric::Fermentability) {
        let fa = a.fermentability();
        let fb = b.fermentability();
        let f = blend(va, fa, vb, fb).or(fa).or(fb);
        out.set_opt(Metric::Fermentability, f);
    }
    if volume_type.allows(Metric::Ph) {
        out.set_opt(Metric::Ph, combined_ph(va, a.ph(), vb, b.ph()));
    }

    out.add_additions(a.additions());
    out.add_additions(b.additions());
    Ok(out)
}
