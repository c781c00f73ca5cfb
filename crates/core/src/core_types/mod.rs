//! Core types: quantities, ingredient definitions, equipment, styles and volumes

pub mod addition;
pub mod equipment;
pub mod ingredients;
pub mod style;
pub mod units;
pub mod volume;

pub use addition::*;
pub use equipment::EquipmentProfile;
pub use ingredients::*;
pub use style::{BoundViolation, Bounds, Style};
pub use units::*;
pub use volume::{Metric, Volume, VolumeType, Volumes};
