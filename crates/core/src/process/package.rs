//! Packaging: kegging or bottling, with a style check on finished beer

use super::{resolve_grist, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::core_types::style::{Bounds, Style};
use crate::core_types::units::{Carbonation, FluidVolume, ScalarQuantity};
use crate::core_types::volume::{Metric, Volume, VolumeType};
use crate::error::BrewResult;
use crate::physics::{carbonation_with_priming, priming_carbonation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Packages `input` into `output`, losing `loss` on the way.
///
/// Carbonation is either forced to a fixed level or comes from the residual
/// CO2 plus whatever the step's fermentable additions (priming sugar)
/// produce. BEER outputs are checked against `style` when one is named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub input: String,
    pub output: String,
    pub loss: FluidVolume,
    #[serde(default)]
    pub forced_carbonation: Option<Carbonation>,
    #[serde(default)]
    pub style: Option<String>,
}

impl Package {
    pub fn new(input: &str, output: &str, loss: FluidVolume) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            loss,
            forced_carbonation: None,
            style: None,
        }
    }

    #[must_use]
    pub fn with_forced_carbonation(mut self, carbonation: Carbonation) -> Self {
        self.forced_carbonation = Some(carbonation);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    /// # Errors
    /// [`BrewError::UnknownReference`](crate::error::BrewError::UnknownReference)
    /// when the named style is not in the reference data.
    pub fn validate(&self, ctx: &StepContext<'_>) -> BrewResult<()> {
        if let Some(style) = &self.style {
            ctx.reference.require_style(style)?;
        }
        Ok(())
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        self.validate(ctx)?;
        let input = ctx.input(&self.input)?;
        let reference = ctx.reference;
        let primers = resolve_grist(reference, &additions.fermentables())?;

        let before: FluidVolume = input.require(Metric::Volume)?;
        if self.loss.millilitres() > before.millilitres() {
            ctx.warn("packaging loss exceeds the whole volume");
        }
        let packaged_volume = FluidVolume::from_litres((before - self.loss).litres().max(0.0))
            .with_estimated(before.is_estimated() || self.loss.is_estimated());

        let mut packaged = input.derive(&self.output, input.volume_type());
        packaged.set(Metric::Volume, packaged_volume);
        if packaged.volume_type().allows(Metric::Carbonation) {
            let carbonation = match self.forced_carbonation {
                Some(forced) => forced,
                None => carbonation_with_priming(
                    input.carbonation().unwrap_or_default(),
                    priming_carbonation(&primers, packaged_volume),
                ),
            };
            packaged.set(Metric::Carbonation, carbonation);
        } else if self.forced_carbonation.is_some() || !primers.is_empty() {
            ctx.warn(format!(
                "{} cannot hold carbonation, priming ignored",
                packaged.volume_type()
            ));
        }
        packaged.add_additions(additions);

        if packaged.volume_type() == VolumeType::Beer {
            if let Some(name) = &self.style {
                let style = reference.require_style(name)?;
                for warning in style_violations(&packaged, style) {
                    ctx.warn(warning);
                }
            }
        }
        ctx.output(packaged);
        Ok(())
    }
}

fn violation<Q: ScalarQuantity + fmt::Display>(
    label: &str,
    value: Option<Q>,
    bounds: &Bounds<Q>,
) -> Option<String> {
    let value = value?;
    let violated = bounds.check_quantity(value)?;
    Some(format!(
        "{label} {value} is {violated} ({}..{})",
        bounds.min, bounds.max
    ))
}

/// One message per style parameter the beer falls outside of
pub fn style_violations(beer: &Volume, style: &Style) -> Vec<String> {
    [
        violation("OG", beer.original_gravity(), &style.og),
        violation("FG", beer.gravity(), &style.fg),
        violation("IBU", beer.bitterness(), &style.ibu),
        violation("colour", beer.colour(), &style.colour),
        violation("ABV", beer.abv(), &style.abv),
        violation("carbonation", beer.carbonation(), &style.carbonation),
    ]
    .into_iter()
    .flatten()
    .map(|text| format!("{text} for {}", style.name))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::equipment::EquipmentProfile;
    use crate::core_types::units::{Bitterness, Colour, Density, Percentage, Time, Weight};
    use crate::core_types::volume::Volumes;
    use crate::error::BrewError;
    use crate::recipe::log::RecipeLog;
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;
    use approx::assert_relative_eq;

    fn pale_ale(abv: f64) -> Volume {
        let mut beer = Volume::new("beer", VolumeType::Beer);
        beer.set(Metric::Volume, FluidVolume::from_litres(20.0));
        beer.set(Metric::OriginalGravity, Density::from_specific_gravity(1.052));
        beer.set(Metric::Gravity, Density::from_specific_gravity(1.012));
        beer.set(Metric::Bitterness, Bitterness::new(40.0));
        beer.set(Metric::Colour, Colour::new(7.0));
        beer.set(Metric::Abv, Percentage::new(abv));
        beer.set(Metric::Carbonation, Carbonation::from_volumes(0.85));
        beer
    }

    fn package(
        step: &Package,
        beer: Volume,
        additions: &[IngredientAddition],
    ) -> BrewResult<(Volumes, RecipeLog)> {
        let mut volumes = Volumes::new();
        volumes.add(beer).unwrap();
        let reference = InMemoryReferenceData::standard();
        let settings = MapSettings::new();
        let equipment = EquipmentProfile::homebrew_20l();
        let mut log = RecipeLog::new();
        let mut ctx = StepContext {
            step: "Package",
            volumes: &mut volumes,
            equipment: &equipment,
            reference: &reference,
            settings: &settings,
            log: &mut log,
        };
        step.apply(additions, &mut ctx)?;
        Ok((volumes, log))
    }

    fn keg() -> Package {
        Package::new("beer", "keg", FluidVolume::from_litres(0.5))
            .with_forced_carbonation(Carbonation::from_volumes(2.5))
            .with_style("American Pale Ale")
    }

    #[test]
    fn test_in_style_beer_has_no_warnings() {
        let (volumes, log) = package(&keg(), pale_ale(0.0525), &[]).unwrap();
        assert!(log.warnings().next().is_none());
        let keg = volumes.get("keg").unwrap();
        assert_relative_eq!(keg.volume().unwrap().litres(), 19.5, epsilon = 1e-9);
        assert_relative_eq!(keg.carbonation().unwrap().volumes(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_strong_beer_warns_once_on_abv() {
        let (_, log) = package(&keg(), pale_ale(0.07), &[]).unwrap();
        let warnings: Vec<_> = log.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].text.contains("ABV"));
    }

    #[test]
    fn test_priming_sugar_adds_carbonation() {
        let step = Package::new("beer", "bottles", FluidVolume::ZERO);
        let sugar = [IngredientAddition::fermentable(
            "Table Sugar",
            Weight::new(120.0),
            Time::ZERO,
        )];
        let (volumes, _) = package(&step, pale_ale(0.0525), &sugar).unwrap();
        // 120 g × 0.5 / 20 L on top of the residual 0.85 vols
        let expected = 0.85 * 1.96 + 3.0;
        assert_relative_eq!(
            volumes.get("bottles").unwrap().carbonation().unwrap().grams_per_litre(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unknown_style_is_an_error() {
        let step = Package::new("beer", "keg", FluidVolume::ZERO).with_style("Nonexistent Ale");
        let err = package(&step, pale_ale(0.05), &[]).unwrap_err();
        assert!(matches!(err, BrewError::UnknownReference { .. }));
    }
}
