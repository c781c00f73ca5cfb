//! Mashing in, and hot-water infusions into an existing mash

use super::{resolve_grist, resolve_hops, water_agents, StepContext};
use crate::core_types::addition::{AdditionsExt, IngredientAddition, WaterAddition};
use crate::core_types::units::{Bitterness, Percentage, Temperature, Time, Weight};
use crate::core_types::volume::{Metric, Volume, VolumeType};
use crate::error::BrewResult;
use crate::physics::{
    bitterness_with_volume_change, colour_with_volume_change, combined_ph, dissolved_extract,
    extract_gravity, infusion_temperature, mash_extract, mash_fermentability, mash_ph,
    mash_temperature, mash_volume, mash_water, morey_colour, tinseth_ibu, GristItem,
    MashChemistry, MashThermalMass,
};
use serde::{Deserialize, Serialize};

/// Mash in: grist plus one strike-water charge, producing a MASH volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mash {
    pub output: String,
    pub duration: Time,
    /// Temperature of the grain (and the tun) before mashing in
    pub grain_temperature: Temperature,
}

impl Mash {
    pub fn new(output: &str, duration: Time, grain_temperature: Temperature) -> Self {
        Self {
            output: output.to_string(),
            duration,
            grain_temperature,
        }
    }

    /// At least one fermentable, and exactly one water charge at the start
    ///
    /// # Errors
    /// [`BrewError::InvalidAddition`](crate::error::BrewError::InvalidAddition)
    /// describing the first rule broken.
    pub fn validate<'a>(
        &self,
        additions: &'a [IngredientAddition],
        ctx: &StepContext<'_>,
    ) -> BrewResult<&'a WaterAddition> {
        if additions.fermentables().is_empty() {
            return Err(ctx.invalid("a mash needs at least one fermentable"));
        }
        let waters = additions.waters();
        let [water] = waters.as_slice() else {
            return Err(ctx.invalid(format!(
                "a mash needs exactly one water addition, found {}",
                waters.len()
            )));
        };
        if !water.is_initial_charge(self.duration) {
            return Err(ctx.invalid(format!(
                "mash water '{}' must go in at the start of the mash",
                water.name
            )));
        }
        Ok(*water)
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        let strike = self.validate(additions, ctx)?;
        let reference = ctx.reference;
        let equipment = ctx.equipment;

        let grist = resolve_grist(reference, &additions.fermentables())?;
        let hops = resolve_hops(reference, &additions.hops())?;
        let agents = water_agents(reference, &additions.miscs())?;
        let water = reference.require_water(&strike.name)?;

        let grain = additions.fermentable_weight();
        let mass = MashThermalMass {
            grain,
            grain_temperature: self.grain_temperature,
            tun_water_equivalent: equipment.mash_tun_water_equivalent(),
            tun_temperature: self.grain_temperature,
        };
        let temperature = mash_temperature(strike.volume, strike.temperature, &mass);
        let volume = mash_volume(strike.volume, grain);
        ctx.check_capacity("mash tun", volume, equipment.mash_tun_volume);

        let (soluble, mashable): (Vec<GristItem<'_>>, Vec<GristItem<'_>>) =
            grist.iter().copied().partition(|(f, _)| f.is_soluble());
        let extract = mash_extract(&mashable, equipment.conversion_efficiency)
            + mash_extract(&soluble, Percentage::new(1.0));
        let gravity = extract_gravity(extract, strike.volume);

        let utilisation = ctx.settings.mash_hop_utilisation();
        let bitterness = hops.iter().fold(Bitterness::ZERO, |acc, (hop, weight, time)| {
            acc + tinseth_ibu(hop, *weight, *time, strike.volume, gravity, utilisation)
        });

        let ph = mash_ph(
            ctx.settings.mash_ph_model(),
            &MashChemistry {
                grist: &grist,
                water: &water.profile,
                water_volume: strike.volume,
                agents: &agents,
            },
        );

        let mut mash = Volume::new(&self.output, VolumeType::Mash);
        mash.set(Metric::Volume, volume);
        mash.set(Metric::Temperature, temperature);
        mash.set(Metric::Gravity, gravity);
        mash.set(Metric::Colour, morey_colour(&grist, strike.volume));
        mash.set(Metric::Bitterness, bitterness);
        mash.set(Metric::Fermentability, mash_fermentability(temperature));
        mash.set_opt(Metric::Ph, ph);
        mash.add_additions(additions);
        ctx.output(mash);
        Ok(())
    }
}

/// Hot water infused into an existing mash, which is updated in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MashInfusion {
    pub mash: String,
    pub duration: Time,
}

impl MashInfusion {
    pub fn new(mash: &str, duration: Time) -> Self {
        Self {
            mash: mash.to_string(),
            duration,
        }
    }

    /// # Errors
    /// [`BrewError::InvalidAddition`](crate::error::BrewError::InvalidAddition)
    /// when there is no water to infuse, or grist is added.
    pub fn validate(&self, additions: &[IngredientAddition], ctx: &StepContext<'_>) -> BrewResult<()> {
        if additions.waters().is_empty() {
            return Err(ctx.invalid("an infusion needs at least one water addition"));
        }
        if !additions.fermentables().is_empty() {
            return Err(ctx.invalid("fermentables cannot be added during an infusion"));
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
        let reference = ctx.reference;
        let equipment = ctx.equipment;

        let grain: Weight = mash.additions().fermentable_weight();
        let before = mash_water(mash.require(Metric::Volume)?, grain);
        let mut water = before;
        let mut temperature: Temperature = mash.require(Metric::Temperature)?;
        let mut ph = mash.ph();

        // Charges go in largest remaining time first
        let mut charges = additions.waters();
        charges.sort_by(|a, b| b.time.seconds().total_cmp(&a.time.seconds()));
        for charge in charges {
            if charge.time.seconds() > self.duration.seconds() {
                ctx.warn(format!(
                    "'{}' is timed before the infusion starts",
                    charge.name
                ));
            }
            let source = reference.require_water(&charge.name)?;
            temperature = infusion_temperature(
                water,
                grain,
                equipment.mash_tun_water_equivalent(),
                temperature,
                charge.volume,
                charge.temperature,
            );
            ph = combined_ph(water, ph, charge.volume, Some(source.ph));
            water += charge.volume;
        }

        let volume = mash_volume(water, grain);
        ctx.check_capacity("mash tun", volume, equipment.mash_tun_volume);

        let mut updated = mash.clone();
        updated.set(Metric::Volume, volume);
        updated.set(Metric::Temperature, temperature);
        if let Some(gravity) = mash.gravity() {
            let extract = dissolved_extract(gravity, before);
            updated.set(Metric::Gravity, extract_gravity(extract, water));
        }
        if let Some(colour) = mash.colour() {
            updated.set(Metric::Colour, colour_with_volume_change(colour, before, water));
        }
        updated.set(
            Metric::Bitterness,
            bitterness_with_volume_change(mash.bitterness(), before, water),
        );
        updated.set(Metric::Fermentability, mash_fermentability(temperature));
        updated.set_opt(Metric::Ph, ph);
        updated.add_additions(additions);
        ctx.output(updated);
        Ok(())
    }
}
