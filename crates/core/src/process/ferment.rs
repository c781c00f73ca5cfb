//! Fermentation: wort into beer, or a secondary on an existing beer

use super::{resolve_grist, resolve_yeasts, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::core_types::units::{Density, Percentage, Pressure, Temperature, Time};
use crate::core_types::volume::{Metric, VolumeType};
use crate::error::BrewResult;
use crate::physics::{
    abv, equilibrium_carbonation, estimated_attenuation, final_gravity, ppg_gravity,
};
use serde::{Deserialize, Serialize};

/// Ferments `input` at `temperature` for `duration`, producing BEER.
///
/// A WORT input needs a yeast addition. A BEER input is a secondary
/// fermentation: extra fermentables raise the original gravity and ferment
/// out under whatever yeast is added (fully when none is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ferment {
    pub input: String,
    pub output: String,
    pub temperature: Temperature,
    pub duration: Time,
    /// Measured final gravity; ignored while flagged estimated
    #[serde(default)]
    pub final_gravity: Option<Density>,
}

impl Ferment {
    pub fn new(input: &str, output: &str, temperature: Temperature, duration: Time) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            temperature,
            duration,
            final_gravity: None,
        }
    }

    #[must_use]
    pub fn with_final_gravity(mut self, fg: Density) -> Self {
        self.final_gravity = Some(fg);
        self
    }

    fn measured_fg(&self) -> Option<Density> {
        self.final_gravity.filter(|fg| !fg.is_estimated())
    }

    /// # Errors
    /// [`BrewError::WrongVolumeType`](crate::error::BrewError::WrongVolumeType)
    /// for inputs other than WORT and BEER;
    /// [`BrewError::InvalidAddition`](crate::error::BrewError::InvalidAddition)
    /// when a WORT input has no yeast.
    pub fn validate(&self, additions: &[IngredientAddition], ctx: &StepContext<'_>) -> BrewResult<()> {
        let input = ctx.volumes.get(&self.input)?;
        ctx.expect_type(input, &[VolumeType::Wort, VolumeType::Beer])?;
        if input.volume_type() == VolumeType::Wort && additions.yeasts().is_empty() {
            return Err(ctx.invalid("fermenting wort needs a yeast addition"));
        }
        Ok(())
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        self.validate(additions, ctx)?;
        let input = ctx.input(&self.input)?;
        let reference = ctx.reference;
        let equipment = ctx.equipment;

        let grist = resolve_grist(reference, &additions.fermentables())?;
        let yeasts = resolve_yeasts(reference, additions)?;
        let volume = input.require(Metric::Volume)?;
        ctx.check_capacity("fermenter", volume, equipment.fermenter_volume);

        let extra = ppg_gravity(&grist, volume, Percentage::new(1.0));
        let with_extra = |g: Density| {
            Density::from_gravity_units(g.gravity_units() + extra.gravity_units())
                .with_estimated(g.is_estimated() || extra.is_estimated())
        };
        // The most attenuative strain finishes the job
        let yeast_attenuation = yeasts
            .iter()
            .map(|y| y.attenuation)
            .max_by(|a, b| a.fraction().total_cmp(&b.fraction()));

        let gravity: Density = input.require(Metric::Gravity)?;
        let (og, fg) = if input.volume_type() == VolumeType::Wort {
            let og = with_extra(gravity);
            let Some(rated) = yeast_attenuation else {
                return Err(ctx.invalid("fermenting wort needs a yeast addition"));
            };
            let attenuation = match input.fermentability() {
                Some(fermentability) => estimated_attenuation(fermentability, rated),
                None => rated,
            };
            let fg = self
                .measured_fg()
                .unwrap_or_else(|| final_gravity(og, attenuation));
            (og, fg)
        } else {
            let og = with_extra(input.original_gravity().unwrap_or(gravity));
            let attenuation = yeast_attenuation.unwrap_or_else(|| Percentage::new(1.0));
            let fg = self.measured_fg().unwrap_or_else(|| {
                let left = final_gravity(extra, attenuation);
                Density::from_gravity_units(gravity.gravity_units() + left.gravity_units())
                    .with_estimated(gravity.is_estimated() || left.is_estimated())
            });
            (og, fg)
        };
        if fg.points() > og.points() {
            ctx.warn(format!("final gravity {fg} is above original gravity {og}"));
        }

        let mut beer = input.derive(&self.output, VolumeType::Beer);
        beer.set(Metric::Temperature, self.temperature);
        beer.set(Metric::OriginalGravity, og);
        beer.set(Metric::Gravity, fg);
        beer.set(Metric::Abv, abv(og, fg));
        beer.set(
            Metric::Carbonation,
            equilibrium_carbonation(self.temperature, Pressure::ZERO),
        );
        beer.add_additions(additions);
        ctx.output(beer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::{FluidVolume, Weight};
    use crate::core_types::volume::{Volume, Volumes};
    use crate::error::BrewError;
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    fn ferment(
        step: &Ferment,
        input: Volume,
        additions: &[IngredientAddition],
    ) -> BrewResult<Volumes> {
        let mut volumes = Volumes::new();
        volumes.add(input).unwrap();
        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Ferment",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        step.apply(additions, &mut ctx)?;
        Ok(volumes)
    }

    fn wort() -> Volume {
        let mut v = Volume::new("wort", VolumeType::Wort);
        v.set(Metric::Volume, FluidVolume::from_litres(20.0));
        v.set(Metric::Temperature, Temperature::new(20.0));
        v.set(Metric::Gravity, Density::from_specific_gravity(1.050));
        v
    }

    fn yeast() -> IngredientAddition {
        IngredientAddition::yeast("American Ale", Weight::new(11.0), Time::from_days(14.0))
    }

    fn primary() -> Ferment {
        Ferment::new("wort", "beer", Temperature::new(19.0), Time::from_days(14.0))
    }

    #[test]
    fn test_wort_becomes_beer() {
        let volumes = ferment(&primary(), wort(), &[yeast()]).unwrap();
        let beer = volumes.get("beer").unwrap();
        assert_eq!(beer.volume_type(), VolumeType::Beer);
        assert_relative_eq!(beer.original_gravity().unwrap().specific_gravity(), 1.050, epsilon = 1e-12);
        // no fermentability on the wort: the yeast's 77% applies
        assert_relative_eq!(beer.gravity().unwrap().specific_gravity(), 1.0115, epsilon = 1e-9);
        assert_relative_eq!(beer.abv().unwrap().percent(), 0.0385 * 131.25, epsilon = 1e-9);
        assert!(!beer.gravity().unwrap().is_estimated());
        assert!(beer.carbonation().unwrap().volumes() > 0.5);
    }

    #[test]
    fn test_measured_fg_wins() {
        let step = primary().with_final_gravity(Density::from_specific_gravity(1.010));
        let volumes = ferment(&step, wort(), &[yeast()]).unwrap();
        let beer = volumes.get("beer").unwrap();
        assert_relative_eq!(beer.gravity().unwrap().specific_gravity(), 1.010, epsilon = 1e-12);

        let estimated = primary().with_final_gravity(Density::from_specific_gravity(1.010).with_estimated(true));
        let volumes = ferment(&estimated, wort(), &[yeast()]).unwrap();
        let sg = volumes.get("beer").unwrap().gravity().unwrap().specific_gravity();
        assert_relative_eq!(sg, 1.0115, epsilon = 1e-9);
    }

    #[test]
    fn test_wort_needs_yeast() {
        let err = ferment(&primary(), wort(), &[]).unwrap_err();
        assert!(matches!(err, BrewError::InvalidAddition { .. }));
    }

    #[test]
    fn test_mash_input_rejected() {
        let mut mash = Volume::new("wort", VolumeType::Mash);
        mash.set(Metric::Volume, FluidVolume::from_litres(20.0));
        let err = ferment(&primary(), mash, &[yeast()]).unwrap_err();
        assert!(matches!(err, BrewError::WrongVolumeType { .. }));
    }

    #[test]
    fn test_secondary_with_sugar() {
        let volumes = ferment(&primary(), wort(), &[yeast()]).unwrap();
        let beer = volumes.get("beer").unwrap().clone();
        let secondary = Ferment::new("beer", "strong beer", Temperature::new(19.0), Time::from_days(7.0));
        let sugar = IngredientAddition::fermentable("Table Sugar", Weight::from_kilograms(0.5), Time::from_days(7.0));
        let volumes = ferment(&secondary, beer.clone(), &[sugar]).unwrap();
        let strong = volumes.get("strong beer").unwrap();
        assert!(strong.original_gravity().unwrap().points() > beer.original_gravity().unwrap().points());
        assert_relative_eq!(
            strong.gravity().unwrap().points(),
            beer.gravity().unwrap().points(),
            epsilon = 1e-9
        );
        assert!(strong.abv().unwrap().fraction() > beer.abv().unwrap().fraction());
    }
}
