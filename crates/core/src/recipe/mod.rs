//! Recipes: an ordered set of process steps plus the volumes they share
//!
//! # Running
//! [`Recipe::run`] clears the volume registry and the log, seeds the initial
//! volumes, orders the steps and then applies each one. A failing step is
//! logged as an error and the run moves on, so one bad step never hides the
//! results of unrelated branches. [`Recipe::dry_run`] walks the same order
//! checking structure only, and stops at the first problem.

pub mod log;
pub mod scheduler;

pub use log::{LogEntry, LogLevel, RecipeLog};
pub use scheduler::sort_steps;

use crate::core_types::equipment::EquipmentProfile;
use crate::core_types::volume::{Volume, Volumes};
use crate::error::BrewResult;
use crate::process::{ProcessStep, StepContext};
use crate::reference::ReferenceData;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Equipment profile name, resolved against the reference data at run time
    pub equipment: String,
    #[serde(default)]
    steps: Vec<ProcessStep>,
    #[serde(default)]
    initial_volumes: Vec<Volume>,
    #[serde(skip)]
    volumes: Volumes,
    #[serde(skip)]
    log: RecipeLog,
}

impl Recipe {
    pub fn new(name: &str, equipment: &str) -> Self {
        Self {
            name: name.to_string(),
            equipment: equipment.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: ProcessStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Seed a volume that exists before the first step runs
    #[must_use]
    pub fn with_initial_volume(mut self, volume: Volume) -> Self {
        self.initial_volumes.push(volume);
        self
    }

    pub fn add_step(&mut self, step: ProcessStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ProcessStep] {
        &self.steps
    }

    pub fn initial_volumes(&self) -> &[Volume] {
        &self.initial_volumes
    }

    /// Volumes left by the last run
    pub fn volumes(&self) -> &Volumes {
        &self.volumes
    }

    pub fn log(&self) -> &RecipeLog {
        &self.log
    }

    /// Put the steps in execution order.
    ///
    /// # Errors
    /// [`BrewError::CircularDependency`](crate::error::BrewError::CircularDependency);
    /// the existing order is left untouched.
    pub fn sort_steps(&mut self) -> BrewResult<()> {
        let order = sort_steps(&self.steps)?;
        let mut slots: Vec<Option<ProcessStep>> =
            std::mem::take(&mut self.steps).into_iter().map(Some).collect();
        self.steps = order.iter().filter_map(|&i| slots[i].take()).collect();
        Ok(())
    }

    fn reset(&mut self) {
        self.volumes.clear();
        self.log.clear();
        for volume in &self.initial_volumes {
            self.volumes.add_or_update(volume.clone());
        }
    }

    /// Apply every step, collecting results in [`Recipe::volumes`] and
    /// problems in [`Recipe::log`]
    pub fn run(&mut self, reference: &dyn ReferenceData, settings: &dyn Settings) {
        self.reset();
        info!(recipe = %self.name, steps = self.steps.len(), "running recipe");

        let equipment = match reference.require_equipment(&self.equipment) {
            Ok(equipment) => equipment,
            Err(e) => {
                self.log.error(None, e.to_string());
                return;
            }
        };
        if let Err(e) = self.sort_steps() {
            warn!("keeping declared step order: {e}");
            self.log.error(None, e.to_string());
        }

        for step in &self.steps {
            self.log.message(
                Some(&step.name),
                format!("starting {}", step.kind.label()),
            );
            let mut ctx = StepContext {
                step: &step.name,
                volumes: &mut self.volumes,
                equipment,
                reference,
                settings,
                log: &mut self.log,
            };
            match step.apply(&mut ctx) {
                Ok(()) => self.log.message(Some(&step.name), "finished"),
                Err(e) => self.log.error(Some(&step.name), e.to_string()),
            }
        }
        debug!(
            recipe = %self.name,
            volumes = self.volumes.len(),
            warnings = self.log.warnings().count(),
            errors = self.log.errors().count(),
            "recipe complete"
        );
    }

    /// Check the recipe's structure without computing metrics.
    ///
    /// Afterwards [`Recipe::volumes`] holds metric-free placeholders for
    /// every volume a full run would produce.
    ///
    /// # Errors
    /// The first structural problem: an unknown equipment profile, a cycle,
    /// a missing input, an unknown ingredient or an addition list a step
    /// cannot take. The error is also recorded in the log.
    pub fn dry_run(
        &mut self,
        reference: &dyn ReferenceData,
        settings: &dyn Settings,
    ) -> BrewResult<()> {
        self.reset();
        let result = self.dry_run_steps(reference, settings);
        if let Err(e) = &result {
            self.log.error(None, e.to_string());
        }
        result
    }

    fn dry_run_steps(
        &mut self,
        reference: &dyn ReferenceData,
        settings: &dyn Settings,
    ) -> BrewResult<()> {
        let equipment: &EquipmentProfile = reference.require_equipment(&self.equipment)?;
        self.sort_steps()?;
        for step in &self.steps {
            let mut ctx = StepContext {
                step: &step.name,
                volumes: &mut self.volumes,
                equipment,
                reference,
                settings,
                log: &mut self.log,
            };
            step.dry_run(&mut ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::addition::IngredientAddition;
    use crate::core_types::units::{FluidVolume, Temperature, Time, Weight};
    use crate::core_types::volume::VolumeType;
    use crate::error::BrewError;
    use crate::process::{Boil, Dilute, Mash, StepKind};
    use crate::reference::InMemoryReferenceData;
    use crate::settings::MapSettings;

    fn boil(input: &str, output: &str) -> ProcessStep {
        ProcessStep::new(
            "Boil",
            StepKind::Boil(Boil::new(input, output, Time::from_minutes(60.0))),
        )
    }

    #[test]
    fn test_unknown_equipment_stops_the_run() {
        let mut recipe = Recipe::new("Test", "Nothing Like It").with_step(boil("a", "b"));
        recipe.run(&InMemoryReferenceData::standard(), &MapSettings::new());
        assert_eq!(recipe.log().errors().count(), 1);
        assert!(recipe.volumes().is_empty());
    }

    #[test]
    fn test_failing_step_does_not_stop_the_run() {
        let mut water = Volume::new("water", VolumeType::Water);
        water.set(
            crate::core_types::volume::Metric::Volume,
            FluidVolume::from_litres(10.0),
        );
        let mut recipe = Recipe::new("Test", "Homebrew 20L")
            .with_initial_volume(water)
            .with_step(boil("missing", "nowhere"))
            .with_step(ProcessStep::new(
                "Dilute",
                StepKind::Dilute(Dilute::new("water", "diluted")),
            ));
        recipe.run(&InMemoryReferenceData::standard(), &MapSettings::new());

        assert_eq!(recipe.log().errors().count(), 1);
        assert!(recipe.volumes().contains("diluted"));
        assert!(!recipe.volumes().contains("nowhere"));
    }

    #[test]
    fn test_cycle_keeps_declared_order() {
        let mut recipe = Recipe::new("Test", "Homebrew 20L")
            .with_step(boil("a", "b"))
            .with_step(ProcessStep::new(
                "Dilute",
                StepKind::Dilute(Dilute::new("b", "a")),
            ));
        assert!(matches!(
            recipe.sort_steps(),
            Err(BrewError::CircularDependency { .. })
        ));
        assert_eq!(recipe.steps()[0].name, "Boil");
        assert_eq!(recipe.steps()[1].name, "Dilute");
    }

    #[test]
    fn test_dry_run_stops_at_first_problem() {
        let mut recipe = Recipe::new("Test", "Homebrew 20L")
            .with_step(
                ProcessStep::new(
                    "Mash",
                    StepKind::Mash(Mash::new("mash", Time::from_minutes(60.0), Temperature::new(20.0))),
                )
                .with_addition(IngredientAddition::fermentable(
                    "Unobtainium Malt",
                    Weight::from_kilograms(4.0),
                    Time::ZERO,
                )),
            )
            .with_step(boil("mash", "boiled"));
        let err = recipe
            .dry_run(&InMemoryReferenceData::standard(), &MapSettings::new())
            .unwrap_err();
        assert!(matches!(err, BrewError::UnknownReference { .. }));
        assert!(recipe.log().has_errors());
        assert!(!recipe.volumes().contains("boiled"));
    }

    #[test]
    fn test_recipe_round_trips_through_json() {
        let recipe = Recipe::new("Test", "Homebrew 20L").with_step(boil("wort", "boiled"));
        let json = serde_json::to_string(&recipe).unwrap();
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back.steps(), recipe.steps());
        assert_eq!(back.equipment, "Homebrew 20L");
    }
}
