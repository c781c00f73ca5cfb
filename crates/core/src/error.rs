//! Engine error type
//!
//! Structural problems (missing volumes, cycles, unknown references, bad
//! units) are recoverable and travel as [`BrewError`]. Advisory problems are
//! never errors; steps push them to the recipe log as warnings.

use crate::core_types::units::{QuantityKind, Unit};
use crate::core_types::volume::VolumeType;
use crate::reference::ReferenceKind;
use thiserror::Error;

/// Result alias used throughout the engine
pub type BrewResult<T> = Result<T, BrewError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrewError {
    /// A step asked for a volume nobody produced
    #[error("volume '{0}' does not exist")]
    MissingVolume(String),

    /// Strict insert of a name that is already registered
    #[error("volume '{0}' already exists")]
    VolumeExists(String),

    /// Two steps feed each other
    #[error("circular dependency between steps '{from}' and '{to}'")]
    CircularDependency { from: String, to: String },

    /// Reference data lookup miss
    #[error("unknown {kind} '{name}'")]
    UnknownReference { kind: ReferenceKind, name: String },

    /// Unit outside the quantity's kind
    #[error("unit '{unit}' is not a {kind} unit")]
    InvalidUnit { unit: Unit, kind: QuantityKind },

    /// Ingredient additions that do not fit the step
    #[error("step '{step}': {reason}")]
    InvalidAddition { step: String, reason: String },

    /// A step received a volume of the wrong type
    #[error("volume '{name}' is {actual}, expected {expected}")]
    WrongVolumeType {
        name: String,
        expected: VolumeType,
        actual: VolumeType,
    },

    /// A volume lacks a metric the step needs
    #[error("volume '{volume}' has no {metric}")]
    MissingMetric { volume: String, metric: String },

    /// Text that is not a number
    #[error("cannot parse '{text}' as {unit}")]
    Parse { text: String, unit: Unit },
}
