//! Heating a volume to a target temperature

use super::StepContext;
use crate::core_types::addition::IngredientAddition;
use crate::core_types::units::Temperature;
use crate::core_types::volume::Metric;
use crate::error::BrewResult;
use crate::physics::cooling_shrinkage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heat {
    pub input: String,
    pub output: String,
    pub target: Temperature,
}

impl Heat {
    pub fn new(input: &str, output: &str, target: Temperature) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            target,
        }
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        let input = ctx.input(&self.input)?;
        let from: Temperature = input.require(Metric::Temperature)?;
        if self.target.celsius() < from.celsius() {
            ctx.warn(format!(
                "heating to {} from {} lowers the temperature",
                self.target, from
            ));
        }
        let mut heated = input.derive(&self.output, input.volume_type());
        heated.set(
            Metric::Volume,
            cooling_shrinkage(input.require(Metric::Volume)?, from, self.target),
        );
        heated.set(Metric::Temperature, self.target);
        heated.add_additions(additions);
        ctx.output(heated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::FluidVolume;
    use crate::core_types::volume::{Volume, VolumeType, Volumes};
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_heating_expands() {
        let mut water = Volume::new("water", VolumeType::Water);
        water.set(Metric::Volume, FluidVolume::from_litres(10.0));
        water.set(Metric::Temperature, Temperature::new(20.0));
        let mut volumes = Volumes::new();
        volumes.add(water).unwrap();

        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Heat",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        Heat::new("water", "hot water", Temperature::new(70.0))
            .apply(&[], &mut ctx)
            .unwrap();

        let hot = volumes.get("hot water").unwrap();
        assert_eq!(hot.volume_type(), VolumeType::Water);
        assert_relative_eq!(hot.volume().unwrap().litres(), 10.0 * 1.02, epsilon = 1e-9);
        assert!(log.warnings().next().is_none());
    }
}
