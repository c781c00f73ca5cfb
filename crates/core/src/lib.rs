//! Brewing Recipe Engine Core Library
//!
//! Computes what happens to a batch of beer as it moves through the brew day:
//! gravity, colour, bitterness, temperature, pH, alcohol and carbonation of
//! every intermediate volume, from mash-in to packaging.
//!
//! ## Layout
//!
//! - `core_types`: typed quantities with unit conversion, ingredient and
//!   equipment definitions, styles and the named volume registry
//! - `physics`: the stateless brewing equation library
//! - `process`: the process steps that turn input volumes into outputs
//! - `recipe`: step ordering, the run loop and the structured run log
//! - `water`: ion profiles and the salt-addition solver

// Core types and utilities
pub mod core_types;
pub mod error;
pub mod reference;
pub mod settings;

// Brewing calculations
pub mod physics;
pub mod process;
pub mod recipe;
pub mod water;

// Re-export core types
pub use core_types::{
    Bitterness, Carbonation, Colour, Density, EquipmentProfile, FluidVolume, IngredientAddition,
    Metric, Percentage, Ph, Pressure, Quantity, QuantityKind, Style, Temperature, Time, Unit,
    Volume, VolumeType, Volumes, Weight,
};
pub use error::{BrewError, BrewResult};
pub use reference::{InMemoryReferenceData, ReferenceData};
pub use settings::{MapSettings, MashPhModel, SettingKey, Settings};

// Re-export the run surface
pub use process::{ProcessStep, StepContext, StepKind};
pub use recipe::{LogEntry, LogLevel, Recipe, RecipeLog};
pub use water::{best_fit, calc_additions, FitResult, WaterProfile, WaterSalt};
