//! Topping a volume up with water

use super::{water_volume, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::error::BrewResult;
use crate::physics::mix_volumes;
use serde::{Deserialize, Serialize};

/// Mixes each water addition into `input`, keeping its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dilute {
    pub input: String,
    pub output: String,
}

impl Dilute {
    pub fn new(input: &str, output: &str) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
        }
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        let input = ctx.input(&self.input)?;
        let volume_type = input.volume_type();
        let waters = additions.waters();
        if waters.is_empty() {
            ctx.warn("no water to dilute with");
        }

        let mut diluted = input.derive(&self.output, volume_type);
        for water in waters {
            let charge = water_volume(ctx.reference, water, &water.name)?;
            diluted = mix_volumes(&self.output, volume_type, &diluted, &charge)?;
        }
        let others: Vec<IngredientAddition> = additions
            .iter()
            .filter(|a| !matches!(a, IngredientAddition::Water(_)))
            .cloned()
            .collect();
        diluted.add_additions(&others);
        ctx.output(diluted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::{Colour, Density, FluidVolume, Temperature, Time};
    use crate::core_types::volume::{Metric, Volume, VolumeType, Volumes};
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_dilution_halves_colour_and_keeps_points() {
        let mut wort = Volume::new("wort", VolumeType::Wort);
        wort.set(Metric::Volume, FluidVolume::from_litres(10.0));
        wort.set(Metric::Temperature, Temperature::new(20.0));
        wort.set(Metric::Gravity, Density::from_specific_gravity(1.080));
        wort.set(Metric::Colour, Colour::new(20.0));
        let mut volumes = Volumes::new();
        volumes.add(wort).unwrap();

        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Dilute",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        let additions = [IngredientAddition::water(
            "Distilled",
            FluidVolume::from_litres(10.0),
            Temperature::new(20.0),
            Time::ZERO,
        )];
        Dilute::new("wort", "diluted").apply(&additions, &mut ctx).unwrap();

        let out = volumes.get("diluted").unwrap();
        assert_eq!(out.volume_type(), VolumeType::Wort);
        assert_relative_eq!(out.volume().unwrap().litres(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(out.colour().unwrap().srm(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(out.temperature().unwrap().celsius(), 20.0, epsilon = 1e-9);
        let sg = out.gravity().unwrap().specific_gravity();
        assert!(sg > 1.035 && sg < 1.045, "{sg}");
        assert_eq!(out.additions().len(), 1);
    }
}
