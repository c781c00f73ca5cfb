//! Post-boil hop stand (whirlpool)

use super::{resolve_hops, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::core_types::units::{Density, Temperature, Time};
use crate::core_types::volume::{Metric, VolumeType};
use crate::error::BrewResult;
use crate::physics::{hop_stand_ibu, stand_temperature};
use serde::{Deserialize, Serialize};

/// Lets hot wort stand for `duration` while it cools naturally.
///
/// Only the stand's own hop additions pick up bitterness here; each starts
/// isomerising at the temperature the wort has fallen to when it goes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stand {
    pub input: String,
    pub output: String,
    pub duration: Time,
}

impl Stand {
    pub fn new(input: &str, output: &str, duration: Time) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            duration,
        }
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        let input = ctx.input(&self.input)?;
        ctx.expect_type(&input, &[VolumeType::Wort])?;
        let hops = resolve_hops(ctx.reference, &additions.hops())?;
        let utilisation = ctx.equipment.hop_utilisation.fraction();

        let volume = input.require(Metric::Volume)?;
        let gravity = input.gravity().unwrap_or(Density::WATER);
        let start = input.temperature().unwrap_or(Temperature::BOILING);

        let mut bitterness = input.bitterness().unwrap_or_default();
        for (hop, weight, time) in &hops {
            if time.seconds() > self.duration.seconds() {
                ctx.warn(format!(
                    "'{}' stands {:.0} min, longer than the {:.0} min stand",
                    hop.name,
                    time.minutes(),
                    self.duration.minutes()
                ));
            }
            let elapsed = (self.duration.minutes() - time.minutes()).max(0.0);
            bitterness += hop_stand_ibu(
                hop,
                *weight,
                Time::ZERO,
                *time,
                stand_temperature(start, elapsed),
                volume,
                gravity,
                utilisation,
            );
        }

        let mut stood = input.derive(&self.output, input.volume_type());
        stood.set(Metric::Bitterness, bitterness);
        stood.set(
            Metric::Temperature,
            stand_temperature(start, self.duration.minutes()).with_estimated(true),
        );
        stood.add_additions(additions);
        ctx.output(stood);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::{Bitterness, FluidVolume, Weight};
    use crate::core_types::volume::{Volume, Volumes};
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;

    fn stand(additions: &[IngredientAddition]) -> Volume {
        let mut wort = Volume::new("boiled", VolumeType::Wort);
        wort.set(Metric::Volume, FluidVolume::from_litres(20.0));
        wort.set(Metric::Temperature, Temperature::BOILING);
        wort.set(Metric::Gravity, Density::from_specific_gravity(1.050));
        wort.set(Metric::Bitterness, Bitterness::new(30.0));
        let mut volumes = Volumes::new();
        volumes.add(wort).unwrap();

        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Whirlpool",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        Stand::new("boiled", "stood", Time::from_minutes(20.0))
            .apply(additions, &mut ctx)
            .unwrap();
        volumes.get("stood").unwrap().clone()
    }

    #[test]
    fn test_stand_without_hops_keeps_bitterness_and_cools() {
        let out = stand(&[]);
        assert_eq!(out.bitterness().unwrap().ibu(), 30.0);
        let t = out.temperature().unwrap();
        assert!(t.celsius() < 100.0 && t.celsius() > 43.46);
        assert!(t.is_estimated());
    }

    #[test]
    fn test_whirlpool_hops_add_bitterness() {
        let hops = [IngredientAddition::hop("Cascade", Weight::new(50.0), Time::from_minutes(20.0))];
        let out = stand(&hops);
        assert!(out.bitterness().unwrap().ibu() > 30.0);
    }
}
