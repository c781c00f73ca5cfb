//! The kettle boil

use super::{resolve_grist, resolve_hops, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition};
use crate::core_types::units::{Density, Percentage, Temperature, Time};
use crate::core_types::volume::{Metric, VolumeType};
use crate::error::BrewResult;
use crate::physics::{
    bitterness_with_volume_change, boil_colour, boiled_volume, gravity_with_volume_change,
    morey_colour, ppg_gravity, tinseth_ibu, GristItem,
};
use serde::{Deserialize, Serialize};

/// Warn once pre-boil volume exceeds this multiple of kettle capacity
pub const KETTLE_HEADROOM: f64 = 1.2;

/// Boils a WORT (or WATER) volume for `duration`.
///
/// # Effects
/// - Volume shrinks by the equipment evaporation rate
/// - Carried gravity concentrates; soluble fermentables add their points,
///   grain and adjuncts added to the kettle give nothing
/// - Carried colour darkens by the boil factor
/// - Each hop charge adds Tinseth bitterness for its remaining boil time,
///   at post-boil volume and pre-boil gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boil {
    pub input: String,
    pub output: String,
    pub duration: Time,
}

impl Boil {
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
        ctx.expect_type(&input, &[VolumeType::Wort, VolumeType::Water])?;
        let reference = ctx.reference;
        let equipment = ctx.equipment;

        let grist = resolve_grist(reference, &additions.fermentables())?;
        let hops = resolve_hops(reference, &additions.hops())?;

        let pre_boil = input.require(Metric::Volume)?;
        ctx.check_capacity(
            "boil kettle",
            pre_boil,
            equipment.boil_kettle_volume * KETTLE_HEADROOM,
        );
        let post_boil = boiled_volume(pre_boil, equipment.boil_evaporation_rate, self.duration);

        let pre_boil_gravity = input.gravity().unwrap_or(Density::WATER);
        let soluble: Vec<GristItem<'_>> = grist.iter().copied().filter(|(f, _)| f.is_soluble()).collect();
        if soluble.len() < grist.len() {
            ctx.log.message(
                Some(ctx.step),
                "grain and adjuncts added to the kettle contribute no extract",
            );
        }
        let concentrated = gravity_with_volume_change(pre_boil_gravity, pre_boil, post_boil);
        let added = ppg_gravity(&soluble, post_boil, Percentage::new(1.0));
        let gravity = Density::from_gravity_units(concentrated.gravity_units() + added.gravity_units())
            .with_estimated(concentrated.is_estimated() || added.is_estimated());

        let colour = boil_colour(input.colour(), morey_colour(&soluble, post_boil));

        let mut bitterness = bitterness_with_volume_change(input.bitterness(), pre_boil, post_boil);
        for (hop, weight, time) in &hops {
            if time.seconds() > self.duration.seconds() {
                ctx.warn(format!(
                    "'{}' is timed {:.0} min into a {:.0} min boil",
                    hop.name,
                    time.minutes(),
                    self.duration.minutes()
                ));
            }
            bitterness += tinseth_ibu(
                hop,
                *weight,
                *time,
                post_boil,
                pre_boil_gravity,
                equipment.hop_utilisation.fraction(),
            );
        }

        let mut wort = input.derive(&self.output, VolumeType::Wort);
        wort.set(Metric::Volume, post_boil);
        wort.set(Metric::Temperature, Temperature::BOILING);
        wort.set(Metric::Gravity, gravity);
        wort.set(Metric::Colour, colour);
        wort.set(Metric::Bitterness, bitterness);
        wort.add_additions(additions);
        ctx.output(wort);
        Ok(())
    }
}
