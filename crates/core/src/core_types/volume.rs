//! Named fluid snapshots and the registry steps exchange them through
//!
//! A [`Volume`] is what one process step hands the next: the metrics it
//! derived (volume, temperature, gravity, ...) plus every ingredient addition
//! that went into the fluid so far. Volumes are treated as values; steps
//! "update" a volume by inserting a new one under the same name.

use crate::core_types::addition::IngredientAddition;
use crate::core_types::units::{
    Bitterness, Carbonation, Colour, Density, FluidVolume, Percentage, Ph, Quantity, QuantityKind,
    ScalarQuantity, Temperature,
};
use crate::error::{BrewError, BrewResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeType {
    Water,
    Mash,
    Wort,
    Beer,
    /// Fermentables-only intermediate (e.g. a priming solution)
    Fermentables,
}

impl VolumeType {
    /// Whether a volume of this type may carry `metric`
    pub const fn allows(self, metric: Metric) -> bool {
        match self {
            VolumeType::Water => matches!(
                metric,
                Metric::Volume | Metric::Temperature | Metric::Ph
            ),
            VolumeType::Mash | VolumeType::Wort => !matches!(
                metric,
                Metric::OriginalGravity | Metric::Abv | Metric::Carbonation
            ),
            VolumeType::Beer => true,
            VolumeType::Fermentables => matches!(
                metric,
                Metric::Volume | Metric::Gravity | Metric::Colour
            ),
        }
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolumeType::Water => "WATER",
            VolumeType::Mash => "MASH",
            VolumeType::Wort => "WORT",
            VolumeType::Beer => "BEER",
            VolumeType::Fermentables => "FERMENTABLES",
        };
        f.write_str(name)
    }
}

/// Named properties a volume can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Volume,
    Temperature,
    Gravity,
    OriginalGravity,
    Abv,
    Colour,
    Bitterness,
    Carbonation,
    Fermentability,
    Ph,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Volume,
        Metric::Temperature,
        Metric::Gravity,
        Metric::OriginalGravity,
        Metric::Abv,
        Metric::Colour,
        Metric::Bitterness,
        Metric::Carbonation,
        Metric::Fermentability,
        Metric::Ph,
    ];

    /// Quantity kind stored under this metric
    pub const fn kind(self) -> QuantityKind {
        match self {
            Metric::Volume => QuantityKind::Volume,
            Metric::Temperature => QuantityKind::Temperature,
            Metric::Gravity | Metric::OriginalGravity => QuantityKind::Density,
            Metric::Abv | Metric::Fermentability => QuantityKind::Percentage,
            Metric::Colour => QuantityKind::Colour,
            Metric::Bitterness => QuantityKind::Bitterness,
            Metric::Carbonation => QuantityKind::Carbonation,
            Metric::Ph => QuantityKind::Ph,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Metric::Volume => "volume",
            Metric::Temperature => "temperature",
            Metric::Gravity => "gravity",
            Metric::OriginalGravity => "original gravity",
            Metric::Abv => "ABV",
            Metric::Colour => "colour",
            Metric::Bitterness => "bitterness",
            Metric::Carbonation => "carbonation",
            Metric::Fermentability => "fermentability",
            Metric::Ph => "pH",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// VOLUME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    name: String,
    volume_type: VolumeType,
    metrics: BTreeMap<Metric, Quantity>,
    additions: Vec<IngredientAddition>,
}

impl Volume {
    pub fn new(name: &str, volume_type: VolumeType) -> Self {
        Self {
            name: name.to_string(),
            volume_type,
            metrics: BTreeMap::new(),
            additions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume_type(&self) -> VolumeType {
        self.volume_type
    }

    /// Copy of this volume under another name and type.
    ///
    /// Metrics the new type does not allow are dropped.
    #[must_use]
    pub fn derive(&self, name: &str, volume_type: VolumeType) -> Volume {
        let metrics = self
            .metrics
            .iter()
            .filter(|(m, _)| volume_type.allows(**m))
            .map(|(m, q)| (*m, *q))
            .collect();
        Volume {
            name: name.to_string(),
            volume_type,
            metrics,
            additions: self.additions.clone(),
        }
    }

    /// Raw metric value, if present
    pub fn quantity(&self, metric: Metric) -> Option<Quantity> {
        self.metrics.get(&metric).copied()
    }

    /// Typed metric value, if present and of kind `Q`
    pub fn metric<Q: ScalarQuantity>(&self, metric: Metric) -> Option<Q> {
        self.metrics.get(&metric).and_then(Quantity::as_kind)
    }

    /// Typed metric value
    ///
    /// # Errors
    /// [`BrewError::MissingMetric`] when the volume does not carry `metric`.
    pub fn require<Q: ScalarQuantity>(&self, metric: Metric) -> BrewResult<Q> {
        self.metric(metric).ok_or_else(|| BrewError::MissingMetric {
            volume: self.name.clone(),
            metric: metric.label().to_string(),
        })
    }

    /// Store `value` under `metric`.
    ///
    /// # Panics
    /// When the volume type does not allow `metric`, or `value` is of the
    /// wrong kind. Both are engine bugs, not user-data problems.
    pub fn set(&mut self, metric: Metric, value: impl Into<Quantity>) {
        let value = value.into();
        assert!(
            self.volume_type.allows(metric),
            "{} volume '{}' cannot carry {metric}",
            self.volume_type,
            self.name
        );
        assert!(
            value.kind() == metric.kind(),
            "{metric} takes {} values, got {}",
            metric.kind(),
            value.kind()
        );
        self.metrics.insert(metric, value);
    }

    /// Store `value` when present, clearing the metric otherwise
    pub fn set_opt<Q: Into<Quantity>>(&mut self, metric: Metric, value: Option<Q>) {
        match value {
            Some(v) => self.set(metric, v),
            None => {
                self.metrics.remove(&metric);
            }
        }
    }

    pub fn remove(&mut self, metric: Metric) -> Option<Quantity> {
        self.metrics.remove(&metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = (Metric, Quantity)> + '_ {
        self.metrics.iter().map(|(m, q)| (*m, *q))
    }

    pub fn additions(&self) -> &[IngredientAddition] {
        &self.additions
    }

    pub fn add_additions(&mut self, additions: &[IngredientAddition]) {
        self.additions.extend_from_slice(additions);
    }

    // Typed getters for the common metrics

    pub fn volume(&self) -> Option<FluidVolume> {
        self.metric(Metric::Volume)
    }

    pub fn temperature(&self) -> Option<Temperature> {
        self.metric(Metric::Temperature)
    }

    pub fn gravity(&self) -> Option<Density> {
        self.metric(Metric::Gravity)
    }

    pub fn original_gravity(&self) -> Option<Density> {
        self.metric(Metric::OriginalGravity)
    }

    pub fn abv(&self) -> Option<Percentage> {
        self.metric(Metric::Abv)
    }

    pub fn colour(&self) -> Option<Colour> {
        self.metric(Metric::Colour)
    }

    pub fn bitterness(&self) -> Option<Bitterness> {
        self.metric(Metric::Bitterness)
    }

    pub fn carbonation(&self) -> Option<Carbonation> {
        self.metric(Metric::Carbonation)
    }

    pub fn fermentability(&self) -> Option<Percentage> {
        self.metric(Metric::Fermentability)
    }

    pub fn ph(&self) -> Option<Ph> {
        self.metric(Metric::Ph)
    }

    /// Flag every stored metric as estimated, starting a fresh estimation chain
    pub fn mark_estimated(&mut self) {
        for q in self.metrics.values_mut() {
            q.set_estimated(true);
        }
    }

    /// Whether any stored metric is estimated
    pub fn is_estimated(&self) -> bool {
        self.metrics.values().any(Quantity::is_estimated)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.volume_type)?;
        for (metric, value) in &self.metrics {
            write!(f, "\n  {metric}: {value}")?;
        }
        Ok(())
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Name-keyed volume registry shared by the steps of one run.
///
/// Lookup is by name; iteration follows first-insertion order so logs and
/// reports read in pipeline order.
#[derive(Debug, Clone, Default)]
pub struct Volumes {
    by_name: FxHashMap<String, Volume>,
    order: Vec<String>,
}

impl Volumes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a volume whose name is not yet registered
    ///
    /// # Errors
    /// [`BrewError::VolumeExists`] when the name is already taken.
    pub fn add(&mut self, volume: Volume) -> BrewResult<()> {
        if self.by_name.contains_key(volume.name()) {
            return Err(BrewError::VolumeExists(volume.name().to_string()));
        }
        self.order.push(volume.name().to_string());
        self.by_name.insert(volume.name().to_string(), volume);
        Ok(())
    }

    /// Insert or replace by name
    pub fn add_or_update(&mut self, volume: Volume) {
        if !self.by_name.contains_key(volume.name()) {
            self.order.push(volume.name().to_string());
        }
        self.by_name.insert(volume.name().to_string(), volume);
    }

    /// # Errors
    /// [`BrewError::MissingVolume`] when no volume has that name.
    pub fn get(&self, name: &str) -> BrewResult<&Volume> {
        self.by_name
            .get(name)
            .ok_or_else(|| BrewError::MissingVolume(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// First registered volume of `volume_type`
    pub fn get_by_type(&self, volume_type: VolumeType) -> Option<&Volume> {
        self.iter().find(|v| v.volume_type() == volume_type)
    }

    pub fn remove(&mut self, name: &str) -> Option<Volume> {
        self.order.retain(|n| n != name);
        self.by_name.remove(name)
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Volume> {
        self.order.iter().filter_map(|n| self.by_name.get(n))
    }
}
