//! Running the wort off a mash

use super::StepContext;
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::core_types::volume::{Metric, VolumeType};
use crate::error::BrewResult;
use crate::physics::{mash_volume, mash_water, wort_volume};
use serde::{Deserialize, Serialize};

/// Drains a mash into a first-runnings WORT volume.
///
/// The drained mash is re-inserted under its own name holding only the water
/// the grain absorbed plus the tun dead space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lauter {
    pub mash: String,
    pub output: String,
}

impl Lauter {
    pub fn new(mash: &str, output: &str) -> Self {
        Self {
            mash: mash.to_string(),
            output: output.to_string(),
        }
    }

    /// # Errors
    /// [`BrewError::InvalidAddition`](crate::error::BrewError::InvalidAddition)
    /// when anything is added; top-up grist and water belong to a sparge.
    pub fn validate(&self, additions: &[IngredientAddition], ctx: &StepContext<'_>) -> BrewResult<()> {
        if additions.is_empty() {
            Ok(())
        } else {
            Err(ctx.invalid("lautering takes no additions"))
        }
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        self.validate(additions, ctx)?;
        let mash = ctx.input(&self.mash)?;
        ctx.expect_type(&mash, &[VolumeType::Mash])?;

        let grain = mash.additions().fermentable_weight();
        let water = mash_water(mash.require(Metric::Volume)?, grain);
        let runnings = wort_volume(water, grain, ctx.equipment.lauter_loss);
        if runnings.millilitres() <= 0.0 {
            ctx.warn("the grain absorbs all of the mash water, nothing runs off");
        }

        let mut wort = mash.derive(&self.output, VolumeType::Wort);
        wort.set(Metric::Volume, runnings);
        wort.mark_estimated();

        let mut drained = mash;
        drained.set(Metric::Volume, mash_volume(water - runnings, grain));

        ctx.output(wort);
        ctx.output(drained);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::{Density, FluidVolume, Temperature, Time, Weight};
    use crate::core_types::volume::{Volume, Volumes};
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_runnings() {
        let mut mash = Volume::new("mash", VolumeType::Mash);
        mash.set(Metric::Volume, mash_volume(FluidVolume::from_litres(15.0), Weight::from_kilograms(5.0)));
        mash.set(Metric::Temperature, Temperature::new(66.0));
        mash.set(Metric::Gravity, Density::from_specific_gravity(1.070));
        mash.add_additions(&[IngredientAddition::fermentable(
            "Pale Malt (2 Row)",
            Weight::from_kilograms(5.0),
            Time::from_minutes(60.0),
        )]);
        let mut volumes = Volumes::new();
        volumes.add(mash).unwrap();

        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Lauter",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        Lauter::new("mash", "first runnings").apply(&[], &mut ctx).unwrap();

        let wort = volumes.get("first runnings").unwrap();
        assert_eq!(wort.volume_type(), VolumeType::Wort);
        // 15 L water, 5.2 L absorbed, 1 L lauter loss
        assert_relative_eq!(wort.volume().unwrap().litres(), 8.8, epsilon = 1e-9);
        assert_relative_eq!(wort.gravity().unwrap().specific_gravity(), 1.070, epsilon = 1e-12);
        assert!(wort.gravity().unwrap().is_estimated());

        let drained = volumes.get("mash").unwrap();
        assert_relative_eq!(
            mash_water(drained.volume().unwrap(), Weight::from_kilograms(5.0)).litres(),
            6.2,
            epsilon = 1e-9
        );
    }
}
