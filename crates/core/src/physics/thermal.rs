//! Mash thermal balance
//!
//! Heat capacities are expressed as kilograms of water equivalent: water
//! counts 1:1 by litre, grain at its specific heat (0.41 cal/(g·°C)) and the
//! tun at `weight × specific heat` from the equipment profile. Mixing is a
//! weighted average of temperatures.

use crate::core_types::units::{any_estimated, FluidVolume, ScalarQuantity, Temperature, Weight};

/// Specific heat of dry grain relative to water
pub const GRAIN_SPECIFIC_HEAT: f64 = 0.41;

/// Everything in the tun apart from the water being added
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MashThermalMass {
    pub grain: Weight,
    pub grain_temperature: Temperature,
    /// Tun heat capacity, kg water-equivalent
    pub tun_water_equivalent: f64,
    pub tun_temperature: Temperature,
}

impl MashThermalMass {
    fn grain_equivalent(&self) -> f64 {
        self.grain.kilograms() * GRAIN_SPECIFIC_HEAT
    }

    fn estimated(&self) -> bool {
        any_estimated(&[
            self.grain.is_estimated(),
            self.grain_temperature.is_estimated(),
            self.tun_temperature.is_estimated(),
        ])
    }
}

/// Equilibrium temperature after mashing in
///
/// # Formula
/// ```text
///      W_w·T_w + 0.41·W_g·T_g + W_t·T_t
/// T = ─────────────────────────────────
///        W_w + 0.41·W_g + W_t
/// ```
pub fn mash_temperature(
    water: FluidVolume,
    water_temperature: Temperature,
    mass: &MashThermalMass,
) -> Temperature {
    let est = mass.estimated() || water.is_estimated() || water_temperature.is_estimated();
    let ww = water.litres();
    let wg = mass.grain_equivalent();
    let wt = mass.tun_water_equivalent;
    let total = ww + wg + wt;
    if total <= 0.0 {
        return water_temperature.with_estimated(est);
    }
    Temperature::from_canonical(
        (ww * water_temperature.celsius()
            + wg * mass.grain_temperature.celsius()
            + wt * mass.tun_temperature.celsius())
            / total,
        est,
    )
}

/// Strike water temperature that brings the mash to `target`; the inverse of
/// [`mash_temperature`]
pub fn strike_water_temperature(
    target: Temperature,
    water: FluidVolume,
    mass: &MashThermalMass,
) -> Temperature {
    let est = mass.estimated() || water.is_estimated() || target.is_estimated();
    let ww = water.litres();
    if ww <= 0.0 {
        return target.with_estimated(true);
    }
    let wg = mass.grain_equivalent();
    let wt = mass.tun_water_equivalent;
    Temperature::from_canonical(
        (target.celsius() * (ww + wg + wt)
            - wg * mass.grain_temperature.celsius()
            - wt * mass.tun_temperature.celsius())
            / ww,
        est,
    )
}

/// Temperature of an existing mash after infusing more water.
///
/// The mash (its water, grain and the tun, all at `mash_temperature`) mixes
/// with `infusion` at `infusion_temperature`.
pub fn infusion_temperature(
    mash_water: FluidVolume,
    grain: Weight,
    tun_water_equivalent: f64,
    mash_temperature: Temperature,
    infusion: FluidVolume,
    infusion_temperature: Temperature,
) -> Temperature {
    let est = any_estimated(&[
        mash_water.is_estimated(),
        grain.is_estimated(),
        mash_temperature.is_estimated(),
        infusion.is_estimated(),
        infusion_temperature.is_estimated(),
    ]);
    let mash_equivalent =
        mash_water.litres() + grain.kilograms() * GRAIN_SPECIFIC_HEAT + tun_water_equivalent;
    let wi = infusion.litres();
    if mash_equivalent + wi <= 0.0 {
        return mash_temperature.with_estimated(est);
    }
    Temperature::from_canonical(
        (mash_equivalent * mash_temperature.celsius() + wi * infusion_temperature.celsius())
            / (mash_equivalent + wi),
        est,
    )
}
