//! Mash pH estimation
//!
//! Both models start from the grist's distilled-water pH (each grain's value
//! weighted by its share of the grain weight) and shift it by the residual
//! alkalinity of the mash water after any water-agent additions.
//!
//! # References
//! - Kolbach, P. (1953). "Der Einfluss des Brauwassers auf das pH von
//!   Würze und Bier." Monatsschrift für Brauerei 6, 49-52.
//! - Troester, K. "The effect of brewing water and grist composition on the
//!   pH of the mash" (2009), the basis of the EZ Water calculator.

use super::extract::GristItem;
use crate::core_types::units::{any_estimated, FluidVolume, Ph, ScalarQuantity, Weight};
use crate::settings::MashPhModel;
use crate::water::{SaltAdditions, WaterProfile, WaterSalt};

/// mg/L as CaCO3 per German degree of hardness
pub const PPM_PER_DH: f64 = 17.848;

/// Distilled-water pH of the grist, weighted by weight.
///
/// Fermentables without a distilled-water pH (sugars, extracts) are left out
/// of the weighting. `None` when nothing in the grist has one.
pub fn grist_distilled_ph(grist: &[GristItem<'_>]) -> Option<Ph> {
    let mut weight = 0.0;
    let mut weighted = 0.0;
    let mut est = false;
    for (fermentable, w) in grist {
        if let Some(ph) = fermentable.distilled_ph() {
            weight += w.grams();
            weighted += w.grams() * ph.ph();
            est |= ph.is_estimated() || w.is_estimated();
        }
    }
    (weight > 0.0).then(|| Ph::from_canonical(weighted / weight, est))
}

/// Mash water profile after dissolving water agents into `water_volume`
pub fn treated_water(
    profile: &WaterProfile,
    agents: &[(WaterSalt, Weight)],
    water_volume: FluidVolume,
) -> WaterProfile {
    if agents.is_empty() {
        return profile.clone();
    }
    let mut additions = SaltAdditions::default();
    for (salt, weight) in agents {
        additions.add_weight(*salt, *weight, water_volume);
    }
    additions.apply(profile)
}

/// Mash thickness in US quarts per pound
pub fn mash_thickness_qt_per_lb(water: FluidVolume, grain: Weight) -> f64 {
    let lb = grain.pounds();
    if lb <= 0.0 {
        return 0.0;
    }
    water.us_gallons() * 4.0 / lb
}

/// EZ Water model
///
/// # Formula
/// ```text
/// pH = pH_DI + RA × (0.013 × thickness + 0.013) / 50
/// ```
/// with `RA` in mg/L as CaCO3 and `thickness` in qt/lb.
pub fn ez_water_ph(distilled: Ph, residual_alkalinity: f64, thickness_qt_per_lb: f64) -> Ph {
    distilled.with_value(
        distilled.ph() + residual_alkalinity * (0.013 * thickness_qt_per_lb + 0.013) / 50.0,
    )
}

/// Kolbach model: `pH = pH_DI + 0.03 × RA_°dH`
pub fn kolbach_ph(distilled: Ph, residual_alkalinity: f64) -> Ph {
    distilled.with_value(distilled.ph() + 0.03 * residual_alkalinity / PPM_PER_DH)
}

/// Everything the mash pH models need
#[derive(Debug, Clone, Copy)]
pub struct MashChemistry<'a> {
    pub grist: &'a [GristItem<'a>],
    pub water: &'a WaterProfile,
    pub water_volume: FluidVolume,
    pub agents: &'a [(WaterSalt, Weight)],
}

/// Estimated mash pH under `model`.
///
/// `None` when the grist has no distilled-water pH to start from.
pub fn mash_ph(model: MashPhModel, chem: &MashChemistry<'_>) -> Option<Ph> {
    let distilled = grist_distilled_ph(chem.grist)?;
    let treated = treated_water(chem.water, chem.agents, chem.water_volume);
    let ra = treated.residual_alkalinity();
    let grain = super::extract::grist_weight(chem.grist);
    let ph = match model {
        MashPhModel::EzWater => ez_water_ph(
            distilled,
            ra,
            mash_thickness_qt_per_lb(chem.water_volume, grain),
        ),
        MashPhModel::Kolbach => kolbach_ph(distilled, ra),
    };
    let est = any_estimated(&[
        ph.is_estimated(),
        chem.water_volume.is_estimated(),
        grain.is_estimated(),
    ]);
    Some(ph.with_estimated(est))
}
