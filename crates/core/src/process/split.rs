//! Splitting one volume in two

use super::StepContext;
use crate::core_types::addition::IngredientAddition;
use crate::core_types::units::{FluidVolume, Percentage};
use crate::core_types::volume::Metric;
use crate::error::BrewResult;
use serde::{Deserialize, Serialize};

/// How much of the input goes to the split-off output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitAmount {
    Fraction(Percentage),
    Volume(FluidVolume),
}

/// Divides `input` into `output` and `remainder`; both keep every
/// concentration metric of the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub input: String,
    pub output: String,
    pub remainder: String,
    pub amount: SplitAmount,
}

impl Split {
    pub fn new(input: &str, output: &str, remainder: &str, amount: SplitAmount) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            remainder: remainder.to_string(),
            amount,
        }
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        let input = ctx.input(&self.input)?;
        let total: FluidVolume = input.require(Metric::Volume)?;

        let requested = match self.amount {
            SplitAmount::Fraction(f) => total * f.fraction(),
            SplitAmount::Volume(v) => v,
        };
        let taken = if requested.millilitres() > total.millilitres() {
            ctx.warn(format!(
                "cannot split {:.1} L from {:.1} L, taking all of it",
                requested.litres(),
                total.litres()
            ));
            total
        } else if requested.millilitres() < 0.0 {
            ctx.warn("negative split amount, taking nothing");
            FluidVolume::ZERO
        } else {
            requested
        };

        let volume_type = input.volume_type();
        let mut split = input.derive(&self.output, volume_type);
        split.set(Metric::Volume, taken);
        split.add_additions(additions);
        let mut remainder = input.derive(&self.remainder, volume_type);
        remainder.set(Metric::Volume, total - taken);

        ctx.output(split);
        ctx.output(remainder);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::Colour;
    use crate::core_types::volume::{Volume, VolumeType, Volumes};
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    fn split(amount: SplitAmount) -> (Volumes, RecipeLog) {
        let mut beer = Volume::new("beer", VolumeType::Beer);
        beer.set(Metric::Volume, FluidVolume::from_litres(20.0));
        beer.set(Metric::Colour, Colour::new(8.0));
        let mut volumes = Volumes::new();
        volumes.add(beer).unwrap();

        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Split",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        Split::new("beer", "keg", "bottles", amount)
            .apply(&[], &mut ctx)
            .unwrap();
        (volumes, log)
    }

    #[test]
    fn test_split_by_fraction() {
        let (volumes, _) = split(SplitAmount::Fraction(Percentage::new(0.25)));
        let keg = volumes.get("keg").unwrap();
        let bottles = volumes.get("bottles").unwrap();
        assert_relative_eq!(keg.volume().unwrap().litres(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(bottles.volume().unwrap().litres(), 15.0, epsilon = 1e-9);
        assert_eq!(keg.colour().unwrap().srm(), 8.0);
        assert_eq!(bottles.volume_type(), VolumeType::Beer);
    }

    #[test]
    fn test_oversized_split_is_clamped() {
        let (volumes, log) = split(SplitAmount::Volume(FluidVolume::from_litres(30.0)));
        assert_relative_eq!(volumes.get("keg").unwrap().volume().unwrap().litres(), 20.0, epsilon = 1e-9);
        assert_eq!(volumes.get("bottles").unwrap().volume().unwrap().litres(), 0.0);
        assert_eq!(log.warnings().count(), 1);
    }
}
