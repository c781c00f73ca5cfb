//! Batch sparging: refilling a drained mash and running it off again

use super::{resolve_grist, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::core_types::units::{FluidVolume, Temperature};
use crate::core_types::volume::{Metric, Volume, VolumeType};
use crate::error::BrewResult;
use crate::physics::{
    bitterness_with_volume_change, colour_with_volume_change, combined_temperature,
    dissolved_extract, extract_gravity, mash_extract, mash_volume, mash_water, mix_volumes,
    wort_volume,
};
use serde::{Deserialize, Serialize};

/// Top-up grist added at sparge converts at this fraction of the mash
/// efficiency
pub const TOP_UP_EFFICIENCY_FACTOR: f64 = 0.5;

/// Sparge water stirred into the drained mash and run off into `wort`.
///
/// The runnings are blended with `wort` when an earlier step already
/// collected some; otherwise they become `wort`. Fermentable additions are
/// treated as a second, low-efficiency mash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSparge {
    pub mash: String,
    pub wort: String,
}

impl BatchSparge {
    pub fn new(mash: &str, wort: &str) -> Self {
        Self {
            mash: mash.to_string(),
            wort: wort.to_string(),
        }
    }

    /// # Errors
    /// [`BrewError::InvalidAddition`](crate::error::BrewError::InvalidAddition)
    /// when there is no sparge water.
    pub fn validate(&self, additions: &[IngredientAddition], ctx: &StepContext<'_>) -> BrewResult<()> {
        if additions.waters().is_empty() {
            return Err(ctx.invalid("a sparge needs at least one water addition"));
        }
        Ok(())
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        self.validate(additions, ctx)?;
        let mash = ctx.input(&self.mash)?;
        ctx.expect_type(&mash, &[VolumeType::Mash])?;
        let collected = if ctx.volumes.contains(&self.wort) {
            let wort = ctx.input(&self.wort)?;
            ctx.expect_type(&wort, &[VolumeType::Wort])?;
            Some(wort)
        } else {
            None
        };
        let reference = ctx.reference;
        let equipment = ctx.equipment;

        let top_up = resolve_grist(reference, &additions.fermentables())?;
        for (fermentable, _) in &top_up {
            if !fermentable.requires_mash() {
                ctx.warn(format!(
                    "'{}' does not need mashing, add it to the boil instead",
                    fermentable.name
                ));
            }
        }

        let grain = mash.additions().fermentable_weight() + additions.fermentable_weight();
        let before = mash_water(mash.require(Metric::Volume)?, mash.additions().fermentable_weight());
        let sparge = additions.water_volume();
        let water = before + sparge;

        let mut extract = mash_extract(&top_up, equipment.conversion_efficiency * TOP_UP_EFFICIENCY_FACTOR);
        if let Some(gravity) = mash.gravity() {
            extract += dissolved_extract(gravity, before);
        }
        let gravity = extract_gravity(extract, water);

        let sparge_temperature = additions
            .waters()
            .iter()
            .fold(None::<(FluidVolume, Temperature)>, |acc, w| match acc {
                Some((v, t)) => Some((v + w.volume, combined_temperature(v, t, w.volume, w.temperature))),
                None => Some((w.volume, w.temperature)),
            })
            .map(|(_, t)| t);

        let runnings_volume = wort_volume(water, grain, equipment.lauter_loss);
        ctx.check_capacity("mash tun", mash_volume(water, grain), equipment.mash_tun_volume);

        let mut runnings = Volume::new(&self.wort, VolumeType::Wort);
        runnings.set(Metric::Volume, runnings_volume);
        runnings.set(Metric::Gravity, gravity);
        match (mash.temperature(), sparge_temperature) {
            (Some(tm), Some(ts)) => {
                runnings.set(Metric::Temperature, combined_temperature(before, tm, sparge, ts));
            }
            (t, None) | (None, t) => runnings.set_opt(Metric::Temperature, t),
        }
        if let Some(colour) = mash.colour() {
            runnings.set(Metric::Colour, colour_with_volume_change(colour, before, water));
        }
        runnings.set(
            Metric::Bitterness,
            bitterness_with_volume_change(mash.bitterness(), before, water),
        );
        runnings.set_opt(Metric::Fermentability, mash.fermentability());
        runnings.set_opt(Metric::Ph, mash.ph());
        // First runnings already carry the mash additions
        if collected.is_none() {
            runnings.add_additions(mash.additions());
        }
        runnings.add_additions(additions);
        runnings.mark_estimated();

        let wort = match collected {
            Some(first) => {
                let mut blended = mix_volumes(&self.wort, VolumeType::Wort, &first, &runnings)?;
                blended.mark_estimated();
                blended
            }
            None => runnings,
        };

        let mut drained = mash;
        drained.set(Metric::Volume, mash_volume(water - runnings_volume, grain));
        drained.set(Metric::Gravity, gravity);
        drained.add_additions(additions);

        ctx.output(wort);
        ctx.output(drained);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::{Density, Time, Weight};
    use crate::core_types::volume::Volumes;
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    fn drained_mash() -> Volume {
        let grain = Weight::from_kilograms(5.0);
        let mut mash = Volume::new("mash", VolumeType::Mash);
        mash.set(Metric::Volume, mash_volume(FluidVolume::from_litres(6.2), grain));
        mash.set(Metric::Temperature, Temperature::new(66.0));
        mash.set(Metric::Gravity, Density::from_specific_gravity(1.070));
        mash.add_additions(&[IngredientAddition::fermentable(
            "Pale Malt (2 Row)",
            grain,
            Time::from_minutes(60.0),
        )]);
        mash
    }

    fn first_runnings() -> Volume {
        let mut wort = Volume::new("wort", VolumeType::Wort);
        wort.set(Metric::Volume, FluidVolume::from_litres(8.8));
        wort.set(Metric::Temperature, Temperature::new(66.0));
        wort.set(Metric::Gravity, Density::from_specific_gravity(1.070));
        wort
    }

    fn sparge(volumes: &mut Volumes) {
        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Sparge",
            volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        let additions = [IngredientAddition::water(
            "Distilled",
            FluidVolume::from_litres(12.0),
            Temperature::new(80.0),
            Time::from_minutes(15.0),
        )];
        BatchSparge::new("mash", "wort").apply(&additions, &mut ctx).unwrap();
    }

    #[test]
    fn test_sparge_blends_with_first_runnings() {
        let mut volumes = Volumes::new();
        volumes.add(drained_mash()).unwrap();
        volumes.add(first_runnings()).unwrap();
        sparge(&mut volumes);

        let wort = volumes.get("wort").unwrap();
        // 6.2 + 12 L of water, 5.2 L absorbed again, 1 L dead space
        assert_relative_eq!(wort.volume().unwrap().litres(), 8.8 + 12.0, epsilon = 1e-9);
        let sg = wort.gravity().unwrap().specific_gravity();
        assert!(sg > 1.0 && sg < 1.070);
        assert!(wort.is_estimated());
    }

    #[test]
    fn test_sparge_without_first_runnings() {
        let mut volumes = Volumes::new();
        volumes.add(drained_mash()).unwrap();
        sparge(&mut volumes);
        let wort = volumes.get("wort").unwrap();
        assert_relative_eq!(wort.volume().unwrap().litres(), 12.0, epsilon = 1e-9);
    }
}
