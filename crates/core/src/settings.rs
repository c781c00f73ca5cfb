//! Engine configuration values
//!
//! The engine reads a handful of named settings through the [`Settings`]
//! provider. Unset or unparseable values fall back to documented defaults.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Default fraction of boil utilisation that mash hops achieve
pub const DEFAULT_MASH_HOP_UTILISATION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    /// Which model estimates mash pH (`EzWater` or `Kolbach`)
    MashPhModel,
    /// Mash hop utilisation as a fraction of boil utilisation
    MashHopUtilisation,
}

impl SettingKey {
    pub const fn key(self) -> &'static str {
        match self {
            SettingKey::MashPhModel => "mash.ph.model",
            SettingKey::MashHopUtilisation => "mash.hop.utilisation",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Mash pH estimation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MashPhModel {
    /// Grist-weighted distilled-water pH shifted by thickness-scaled residual alkalinity
    #[default]
    EzWater,
    /// Distilled-water pH shifted 0.03 per °dH of residual alkalinity
    Kolbach,
}

impl FromStr for MashPhModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ezwater" | "ez_water" | "ez water" => Ok(MashPhModel::EzWater),
            "kolbach" => Ok(MashPhModel::Kolbach),
            other => Err(format!("unknown mash pH model '{other}'")),
        }
    }
}

/// String-keyed settings provider
pub trait Settings {
    fn get(&self, key: SettingKey) -> Option<String>;

    fn mash_ph_model(&self) -> MashPhModel {
        match self.get(SettingKey::MashPhModel) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{e}, using {:?}", MashPhModel::default());
                MashPhModel::default()
            }),
            None => MashPhModel::default(),
        }
    }

    fn mash_hop_utilisation(&self) -> f64 {
        match self.get(SettingKey::MashHopUtilisation) {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "invalid {} '{value}', using {DEFAULT_MASH_HOP_UTILISATION}",
                    SettingKey::MashHopUtilisation
                );
                DEFAULT_MASH_HOP_UTILISATION
            }),
            None => DEFAULT_MASH_HOP_UTILISATION,
        }
    }
}

/// In-memory settings
#[derive(Debug, Clone, Default)]
pub struct MapSettings {
    values: FxHashMap<SettingKey, String>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: SettingKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }
}

impl Settings for MapSettings {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.values.get(&key).cloned()
    }
}
