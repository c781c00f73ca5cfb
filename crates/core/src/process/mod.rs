//! Process steps
//!
//! A step reads named input volumes, applies the equation library to them
//! and its own ingredient additions, and writes named output volumes. The
//! variant set is closed ([`StepKind`]); dispatch is a `match`.
//!
//! # Step contract
//! - Every declared input must exist, otherwise the step fails with
//!   [`BrewError::MissingVolume`] and writes nothing
//! - Implausible configurations (overfull vessels, style misses) are log
//!   warnings and never stop the step
//! - Outputs are written with add-or-update; updater steps (lautering,
//!   infusions, sparging) re-insert the volume they drain under its own name

pub mod boil;
pub mod combine;
pub mod cool;
pub mod dilute;
pub mod ferment;
pub mod heat;
pub mod lauter;
pub mod mash;
pub mod package;
pub mod split;
pub mod sparge;
pub mod stand;

pub use boil::Boil;
pub use combine::Combine;
pub use cool::Cool;
pub use dilute::Dilute;
pub use ferment::Ferment;
pub use heat::Heat;
pub use lauter::Lauter;
pub use mash::{Mash, MashInfusion};
pub use package::Package;
pub use split::{Split, SplitAmount};
pub use sparge::BatchSparge;
pub use stand::Stand;

use crate::core_types::addition::{
    AdditionsExt, FermentableAddition, HopAddition, IngredientAddition, MiscAddition,
    WaterAddition,
};
use crate::core_types::equipment::EquipmentProfile;
use crate::core_types::ingredients::{Hop, Yeast};
use crate::core_types::units::{FluidVolume, Time, Weight};
use crate::core_types::volume::{Metric, Volume, VolumeType, Volumes};
use crate::error::{BrewError, BrewResult};
use crate::physics::GristItem;
use crate::recipe::log::RecipeLog;
use crate::reference::ReferenceData;
use crate::settings::Settings;
use crate::water::WaterSalt;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// STEP CONTEXT
// ============================================================================

/// Everything a step may read or write while it runs
pub struct StepContext<'a> {
    pub step: &'a str,
    pub volumes: &'a mut Volumes,
    pub equipment: &'a EquipmentProfile,
    pub reference: &'a dyn ReferenceData,
    pub settings: &'a dyn Settings,
    pub log: &'a mut RecipeLog,
}

impl StepContext<'_> {
    /// Copy of input volume `name`, logged as observed
    ///
    /// # Errors
    /// [`BrewError::MissingVolume`] when nothing produced `name`.
    pub fn input(&mut self, name: &str) -> BrewResult<Volume> {
        let volume = self.volumes.get(name)?.clone();
        debug!(step = self.step, "read {}", volume);
        self.log.message(
            Some(self.step),
            format!("input '{}' ({})", name, volume.volume_type()),
        );
        Ok(volume)
    }

    /// Write an output volume
    pub fn output(&mut self, volume: Volume) {
        debug!(step = self.step, "wrote {}", volume);
        self.log.message(
            Some(self.step),
            format!("output '{}' ({})", volume.name(), volume.volume_type()),
        );
        self.volumes.add_or_update(volume);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.log.warning(Some(self.step), text);
    }

    /// Warn when `volume` will not fit in `vessel`
    pub fn check_capacity(&mut self, vessel: &str, volume: FluidVolume, capacity: FluidVolume) {
        if volume.millilitres() > capacity.millilitres() {
            self.warn(format!(
                "{:.1} L exceeds the {vessel} capacity of {:.1} L",
                volume.litres(),
                capacity.litres()
            ));
        }
    }

    /// Error for additions that do not fit this step
    pub fn invalid(&self, reason: impl Into<String>) -> BrewError {
        BrewError::InvalidAddition {
            step: self.step.to_string(),
            reason: reason.into(),
        }
    }

    /// Fail unless `volume` is one of `allowed`
    ///
    /// # Errors
    /// [`BrewError::WrongVolumeType`] naming the first allowed type.
    pub fn expect_type(&self, volume: &Volume, allowed: &[VolumeType]) -> BrewResult<()> {
        if allowed.contains(&volume.volume_type()) {
            return Ok(());
        }
        Err(BrewError::WrongVolumeType {
            name: volume.name().to_string(),
            expected: allowed.first().copied().unwrap_or(VolumeType::Wort),
            actual: volume.volume_type(),
        })
    }
}

// ============================================================================
// REFERENCE RESOLUTION HELPERS
// ============================================================================

/// Look up the fermentable definitions behind a set of additions
///
/// # Errors
/// [`BrewError::UnknownReference`] on the first unknown name.
pub fn resolve_grist<'r>(
    reference: &'r dyn ReferenceData,
    additions: &[&FermentableAddition],
) -> BrewResult<Vec<GristItem<'r>>> {
    additions
        .iter()
        .map(|a| Ok((reference.require_fermentable(&a.name)?, a.weight)))
        .collect()
}

/// A resolved hop charge
pub type HopCharge<'r> = (&'r Hop, Weight, Time);

/// Look up the hop definitions behind a set of additions
///
/// # Errors
/// [`BrewError::UnknownReference`] on the first unknown name.
pub fn resolve_hops<'r>(
    reference: &'r dyn ReferenceData,
    additions: &[&HopAddition],
) -> BrewResult<Vec<HopCharge<'r>>> {
    additions
        .iter()
        .map(|a| Ok((reference.require_hop(&a.name)?, a.weight, a.time)))
        .collect()
}

/// Yeasts named by `additions`
///
/// # Errors
/// [`BrewError::UnknownReference`] on the first unknown name.
pub fn resolve_yeasts<'r>(
    reference: &'r dyn ReferenceData,
    additions: &[IngredientAddition],
) -> BrewResult<Vec<&'r Yeast>> {
    additions
        .yeasts()
        .iter()
        .map(|a| reference.require_yeast(&a.name))
        .collect()
}

/// Water-agent salts among misc additions; other misc items are ignored
///
/// # Errors
/// [`BrewError::UnknownReference`] on the first unknown name.
pub fn water_agents(
    reference: &dyn ReferenceData,
    additions: &[&MiscAddition],
) -> BrewResult<Vec<(WaterSalt, Weight)>> {
    let mut agents = Vec::new();
    for a in additions {
        if let Some(salt) = reference.require_misc(&a.name)?.water_salt {
            agents.push((salt, a.weight));
        }
    }
    Ok(agents)
}

/// A WATER volume for a water addition
///
/// # Errors
/// [`BrewError::UnknownReference`] when the water is unknown.
pub fn water_volume(
    reference: &dyn ReferenceData,
    addition: &WaterAddition,
    name: &str,
) -> BrewResult<Volume> {
    let water = reference.require_water(&addition.name)?;
    let mut volume = Volume::new(name, VolumeType::Water);
    volume.set(Metric::Volume, addition.volume);
    volume.set(Metric::Temperature, addition.temperature);
    volume.set(Metric::Ph, water.ph);
    volume.add_additions(&[IngredientAddition::Water(addition.clone())]);
    Ok(volume)
}

/// Resolve every reference an addition list names
fn check_references(reference: &dyn ReferenceData, additions: &[IngredientAddition]) -> BrewResult<()> {
    for addition in additions {
        let name = addition.name();
        match addition {
            IngredientAddition::Fermentable(_) => reference.require_fermentable(name).map(|_| ())?,
            IngredientAddition::Hop(_) => reference.require_hop(name).map(|_| ())?,
            IngredientAddition::Water(_) => reference.require_water(name).map(|_| ())?,
            IngredientAddition::Yeast(_) => reference.require_yeast(name).map(|_| ())?,
            IngredientAddition::Misc(_) => reference.require_misc(name).map(|_| ())?,
        }
    }
    Ok(())
}

// ============================================================================
// PROCESS STEP
// ============================================================================

/// Step variants and their parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    Mash(Mash),
    MashInfusion(MashInfusion),
    Lauter(Lauter),
    BatchSparge(BatchSparge),
    Boil(Boil),
    Dilute(Dilute),
    Heat(Heat),
    Cool(Cool),
    Ferment(Ferment),
    Stand(Stand),
    Split(Split),
    Combine(Combine),
    Package(Package),
}

impl StepKind {
    /// Fixed tie-break rank among steps with no producer/consumer relation
    pub const fn sort_order(&self) -> u32 {
        match self {
            StepKind::Mash(_) => 1,
            StepKind::MashInfusion(_) => 2,
            StepKind::Lauter(_) => 4,
            StepKind::BatchSparge(_) => 5,
            StepKind::Boil(_) => 6,
            StepKind::Dilute(_) => 7,
            StepKind::Heat(_) => 8,
            StepKind::Cool(_) => 9,
            StepKind::Ferment(_) => 10,
            StepKind::Stand(_) => 11,
            StepKind::Split(_) | StepKind::Combine(_) => 12,
            StepKind::Package(_) => 14,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            StepKind::Mash(_) => "Mash",
            StepKind::MashInfusion(_) => "Mash Infusion",
            StepKind::Lauter(_) => "Lauter",
            StepKind::BatchSparge(_) => "Batch Sparge",
            StepKind::Boil(_) => "Boil",
            StepKind::Dilute(_) => "Dilute",
            StepKind::Heat(_) => "Heat",
            StepKind::Cool(_) => "Cool",
            StepKind::Ferment(_) => "Ferment",
            StepKind::Stand(_) => "Stand",
            StepKind::Split(_) => "Split",
            StepKind::Combine(_) => "Combine",
            StepKind::Package(_) => "Package",
        }
    }
}

/// One stage of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub additions: Vec<IngredientAddition>,
    pub kind: StepKind,
}

impl ProcessStep {
    pub fn new(name: &str, kind: StepKind) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            additions: Vec::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    #[must_use]
    pub fn with_addition(mut self, addition: IngredientAddition) -> Self {
        self.additions.push(addition);
        self
    }

    pub fn sort_order(&self) -> u32 {
        self.kind.sort_order()
    }

    /// Names of the volumes this step reads
    pub fn input_volumes(&self) -> Vec<&str> {
        match &self.kind {
            StepKind::Mash(_) => Vec::new(),
            StepKind::MashInfusion(s) => vec![s.mash.as_str()],
            StepKind::Lauter(s) => vec![s.mash.as_str()],
            StepKind::BatchSparge(s) => vec![s.mash.as_str(), s.wort.as_str()],
            StepKind::Boil(s) => vec![s.input.as_str()],
            StepKind::Dilute(s) => vec![s.input.as_str()],
            StepKind::Heat(s) => vec![s.input.as_str()],
            StepKind::Cool(s) => vec![s.input.as_str()],
            StepKind::Ferment(s) => vec![s.input.as_str()],
            StepKind::Stand(s) => vec![s.input.as_str()],
            StepKind::Split(s) => vec![s.input.as_str()],
            StepKind::Combine(s) => vec![s.first.as_str(), s.second.as_str()],
            StepKind::Package(s) => vec![s.input.as_str()],
        }
    }

    /// Names of the volumes this step writes
    pub fn output_volumes(&self) -> Vec<&str> {
        match &self.kind {
            StepKind::Mash(s) => vec![s.output.as_str()],
            StepKind::MashInfusion(s) => vec![s.mash.as_str()],
            StepKind::Lauter(s) => vec![s.output.as_str(), s.mash.as_str()],
            StepKind::BatchSparge(s) => vec![s.wort.as_str(), s.mash.as_str()],
            StepKind::Boil(s) => vec![s.output.as_str()],
            StepKind::Dilute(s) => vec![s.output.as_str()],
            StepKind::Heat(s) => vec![s.output.as_str()],
            StepKind::Cool(s) => vec![s.output.as_str()],
            StepKind::Ferment(s) => vec![s.output.as_str()],
            StepKind::Stand(s) => vec![s.output.as_str()],
            StepKind::Split(s) => vec![s.output.as_str(), s.remainder.as_str()],
            StepKind::Combine(s) => vec![s.output.as_str()],
            StepKind::Package(s) => vec![s.output.as_str()],
        }
    }

    /// Inputs that may legitimately be absent when the step runs
    fn optional_inputs(&self) -> Vec<&str> {
        match &self.kind {
            StepKind::BatchSparge(s) => vec![s.wort.as_str()],
            _ => Vec::new(),
        }
    }

    fn check_inputs(&self, volumes: &Volumes) -> BrewResult<()> {
        let optional = self.optional_inputs();
        for name in self.input_volumes() {
            if !optional.contains(&name) {
                volumes.get(name)?;
            }
        }
        Ok(())
    }

    fn check_addition_times(&self) -> BrewResult<()> {
        if let Some(a) = self.additions.iter().find(|a| a.time().seconds() < 0.0) {
            return Err(BrewError::InvalidAddition {
                step: self.name.clone(),
                reason: format!("'{}' has a negative addition time", a.name()),
            });
        }
        Ok(())
    }

    /// Run the step against `ctx`
    ///
    /// # Errors
    /// Structural problems: a missing input volume, an unknown reference, an
    /// addition list that does not fit the step, or an input of the wrong
    /// type. Nothing is written when an error is returned.
    pub fn apply(&self, ctx: &mut StepContext<'_>) -> BrewResult<()> {
        self.check_addition_times()?;
        self.check_inputs(ctx.volumes)?;
        let additions = self.additions.as_slice();
        match &self.kind {
            StepKind::Mash(s) => s.apply(additions, ctx),
            StepKind::MashInfusion(s) => s.apply(additions, ctx),
            StepKind::Lauter(s) => s.apply(additions, ctx),
            StepKind::BatchSparge(s) => s.apply(additions, ctx),
            StepKind::Boil(s) => s.apply(additions, ctx),
            StepKind::Dilute(s) => s.apply(additions, ctx),
            StepKind::Heat(s) => s.apply(additions, ctx),
            StepKind::Cool(s) => s.apply(additions, ctx),
            StepKind::Ferment(s) => s.apply(additions, ctx),
            StepKind::Stand(s) => s.apply(additions, ctx),
            StepKind::Split(s) => s.apply(additions, ctx),
            StepKind::Combine(s) => s.apply(additions, ctx),
            StepKind::Package(s) => s.apply(additions, ctx),
        }
    }

    /// Structural validation without computing any metrics.
    ///
    /// Checks inputs, addition times, references and the per-variant
    /// addition rules, then writes metric-free placeholder outputs of the
    /// right type so downstream steps can be validated in turn.
    ///
    /// # Errors
    /// The first structural problem found.
    pub fn dry_run(&self, ctx: &mut StepContext<'_>) -> BrewResult<()> {
        self.check_addition_times()?;
        self.check_inputs(ctx.volumes)?;
        check_references(ctx.reference, &self.additions)?;

        let input_type = |name: &str| {
            ctx.volumes
                .get(name)
                .map(Volume::volume_type)
                .unwrap_or(VolumeType::Wort)
        };
        let outputs: Vec<(String, VolumeType)> = match &self.kind {
            StepKind::Mash(s) => {
                s.validate(&self.additions, ctx)?;
                vec![(s.output.clone(), VolumeType::Mash)]
            }
            StepKind::MashInfusion(s) => {
                s.validate(&self.additions, ctx)?;
                vec![(s.mash.clone(), VolumeType::Mash)]
            }
            StepKind::Lauter(s) => {
                s.validate(&self.additions, ctx)?;
                vec![
                    (s.output.clone(), VolumeType::Wort),
                    (s.mash.clone(), VolumeType::Mash),
                ]
            }
            StepKind::BatchSparge(s) => {
                s.validate(&self.additions, ctx)?;
                vec![
                    (s.wort.clone(), VolumeType::Wort),
                    (s.mash.clone(), VolumeType::Mash),
                ]
            }
            StepKind::Boil(s) => vec![(s.output.clone(), VolumeType::Wort)],
            StepKind::Dilute(s) => vec![(s.output.clone(), input_type(&s.input))],
            StepKind::Heat(s) => vec![(s.output.clone(), input_type(&s.input))],
            StepKind::Cool(s) => vec![(s.output.clone(), input_type(&s.input))],
            StepKind::Ferment(s) => {
                s.validate(&self.additions, ctx)?;
                vec![(s.output.clone(), VolumeType::Beer)]
            }
            StepKind::Stand(s) => vec![(s.output.clone(), input_type(&s.input))],
            StepKind::Split(s) => {
                let t = input_type(&s.input);
                vec![(s.output.clone(), t), (s.remainder.clone(), t)]
            }
            StepKind::Combine(s) => vec![(s.output.clone(), input_type(&s.first))],
            StepKind::Package(s) => {
                s.validate(ctx)?;
                vec![(s.output.clone(), input_type(&s.input))]
            }
        };

        for (name, volume_type) in outputs {
            ctx.output(Volume::new(&name, volume_type));
        }
        Ok(())
    }
}
