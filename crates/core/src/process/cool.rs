//! Chilling a volume, losing some to trub and the chiller

use super::StepContext;
use crate::core_types::addition::IngredientAddition;
use crate::core_types::units::{FluidVolume, Temperature};
use crate::core_types::volume::Metric;
use crate::error::BrewResult;
use crate::physics::cooling_shrinkage;
use serde::{Deserialize, Serialize};

/// Cools `input` to `target`.
///
/// Thermal shrinkage applies first, then the equipment's trub and chiller
/// loss comes off the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cool {
    pub input: String,
    pub output: String,
    pub target: Temperature,
}

impl Cool {
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
        if self.target.celsius() > from.celsius() {
            ctx.warn(format!(
                "cooling to {} from {} raises the temperature",
                self.target, from
            ));
        }
        let shrunk = cooling_shrinkage(input.require(Metric::Volume)?, from, self.target);
        let loss = ctx.equipment.trub_and_chiller_loss;
        if loss.millilitres() > shrunk.millilitres() {
            ctx.warn("trub and chiller loss exceeds the whole volume");
        }
        let remaining = FluidVolume::from_litres((shrunk - loss).litres().max(0.0))
            .with_estimated(shrunk.is_estimated() || loss.is_estimated());

        let mut cooled = input.derive(&self.output, input.volume_type());
        cooled.set(Metric::Volume, remaining);
        cooled.set(Metric::Temperature, self.target);
        cooled.add_additions(additions);
        ctx.output(cooled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::Density;
    use crate::core_types::volume::{Volume, VolumeType, Volumes};
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_chill_to_pitching_temperature() {
        let mut wort = Volume::new("boiled", VolumeType::Wort);
        wort.set(Metric::Volume, FluidVolume::from_litres(20.0));
        wort.set(Metric::Temperature, Temperature::BOILING);
        wort.set(Metric::Gravity, Density::from_specific_gravity(1.050));
        let mut volumes = Volumes::new();
        volumes.add(wort).unwrap();

        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Cool",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        Cool::new("boiled", "chilled", Temperature::new(20.0))
            .apply(&[], &mut ctx)
            .unwrap();

        let chilled = volumes.get("chilled").unwrap();
        // 20 L × (1 − 0.0004 × 80) − 1.5 L
        assert_relative_eq!(chilled.volume().unwrap().litres(), 20.0 * 0.968 - 1.5, epsilon = 1e-9);
        assert_relative_eq!(chilled.gravity().unwrap().specific_gravity(), 1.050, epsilon = 1e-12);
        assert_eq!(chilled.temperature().unwrap().celsius(), 20.0);
    }
}
