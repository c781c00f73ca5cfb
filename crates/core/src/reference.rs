//! Reference-data lookup
//!
//! Steps resolve the names carried by ingredient additions, the recipe's
//! equipment profile and style guidelines through a [`ReferenceData`]
//! handle passed in by the caller. Misses are errors; the engine never
//! synthesizes a default definition.

use crate::core_types::equipment::EquipmentProfile;
use crate::core_types::ingredients::{Fermentable, Hop, Misc, Water, Yeast};
use crate::core_types::style::Style;
use crate::error::{BrewError, BrewResult};
use crate::water::WaterSalt;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Fermentable,
    Hop,
    Yeast,
    Misc,
    Water,
    Equipment,
    Style,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Fermentable => "fermentable",
            ReferenceKind::Hop => "hop",
            ReferenceKind::Yeast => "yeast",
            ReferenceKind::Misc => "misc",
            ReferenceKind::Water => "water",
            ReferenceKind::Equipment => "equipment profile",
            ReferenceKind::Style => "style",
        };
        f.write_str(name)
    }
}

fn unknown(kind: ReferenceKind, name: &str) -> BrewError {
    BrewError::UnknownReference {
        kind,
        name: name.to_string(),
    }
}

/// Immutable by-name lookup of ingredient, equipment and style definitions
pub trait ReferenceData {
    fn fermentable(&self, name: &str) -> Option<&Fermentable>;
    fn hop(&self, name: &str) -> Option<&Hop>;
    fn yeast(&self, name: &str) -> Option<&Yeast>;
    fn misc(&self, name: &str) -> Option<&Misc>;
    fn water(&self, name: &str) -> Option<&Water>;
    fn equipment(&self, name: &str) -> Option<&EquipmentProfile>;
    fn style(&self, name: &str) -> Option<&Style>;

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_fermentable(&self, name: &str) -> BrewResult<&Fermentable> {
        self.fermentable(name)
            .ok_or_else(|| unknown(ReferenceKind::Fermentable, name))
    }

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_hop(&self, name: &str) -> BrewResult<&Hop> {
        self.hop(name).ok_or_else(|| unknown(ReferenceKind::Hop, name))
    }

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_yeast(&self, name: &str) -> BrewResult<&Yeast> {
        self.yeast(name)
            .ok_or_else(|| unknown(ReferenceKind::Yeast, name))
    }

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_misc(&self, name: &str) -> BrewResult<&Misc> {
        self.misc(name).ok_or_else(|| unknown(ReferenceKind::Misc, name))
    }

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_water(&self, name: &str) -> BrewResult<&Water> {
        self.water(name)
            .ok_or_else(|| unknown(ReferenceKind::Water, name))
    }

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_equipment(&self, name: &str) -> BrewResult<&EquipmentProfile> {
        self.equipment(name)
            .ok_or_else(|| unknown(ReferenceKind::Equipment, name))
    }

    /// # Errors
    /// [`BrewError::UnknownReference`] on a miss.
    fn require_style(&self, name: &str) -> BrewResult<&Style> {
        self.style(name)
            .ok_or_else(|| unknown(ReferenceKind::Style, name))
    }
}

/// Hash-map backed reference data, filled through builder methods
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    fermentables: FxHashMap<String, Fermentable>,
    hops: FxHashMap<String, Hop>,
    yeasts: FxHashMap<String, Yeast>,
    miscs: FxHashMap<String, Misc>,
    waters: FxHashMap<String, Water>,
    equipment: FxHashMap<String, EquipmentProfile>,
    styles: FxHashMap<String, Style>,
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bundled preset: common malts, hops, yeasts, water agents, two
    /// waters, the 20 L homebrew rig and two styles
    pub fn standard() -> Self {
        let mut data = Self::new()
            .with_fermentable(Fermentable::pale_malt())
            .with_fermentable(Fermentable::crystal_60())
            .with_fermentable(Fermentable::roasted_barley())
            .with_fermentable(Fermentable::flaked_oats())
            .with_fermentable(Fermentable::table_sugar())
            .with_fermentable(Fermentable::dry_malt_extract())
            .with_hop(Hop::cascade())
            .with_hop(Hop::east_kent_goldings())
            .with_hop(Hop::magnum())
            .with_yeast(Yeast::american_ale())
            .with_yeast(Yeast::german_lager())
            .with_misc(Misc::irish_moss())
            .with_water(Water::distilled())
            .with_water(Water::hard_tap())
            .with_equipment(EquipmentProfile::homebrew_20l())
            .with_style(Style::american_pale_ale())
            .with_style(Style::dry_stout());
        for salt in WaterSalt::ALL {
            data = data.with_misc(Misc::water_agent(salt));
        }
        data
    }

    #[must_use]
    pub fn with_fermentable(mut self, f: Fermentable) -> Self {
        self.fermentables.insert(f.name.clone(), f);
        self
    }

    #[must_use]
    pub fn with_hop(mut self, h: Hop) -> Self {
        self.hops.insert(h.name.clone(), h);
        self
    }

    #[must_use]
    pub fn with_yeast(mut self, y: Yeast) -> Self {
        self.yeasts.insert(y.name.clone(), y);
        self
    }

    #[must_use]
    pub fn with_misc(mut self, m: Misc) -> Self {
        self.miscs.insert(m.name.clone(), m);
        self
    }

    #[must_use]
    pub fn with_water(mut self, w: Water) -> Self {
        self.waters.insert(w.name.clone(), w);
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, e: EquipmentProfile) -> Self {
        self.equipment.insert(e.name.clone(), e);
        self
    }

    #[must_use]
    pub fn with_style(mut self, s: Style) -> Self {
        self.styles.insert(s.name.clone(), s);
        self
    }
}

impl ReferenceData for InMemoryReferenceData {
    fn fermentable(&self, name: &str) -> Option<&Fermentable> {
        self.fermentables.get(name)
    }

    fn hop(&self, name: &str) -> Option<&Hop> {
        self.hops.get(name)
    }

    fn yeast(&self, name: &str) -> Option<&Yeast> {
        self.yeasts.get(name)
    }

    fn misc(&self, name: &str) -> Option<&Misc> {
        self.miscs.get(name)
    }

    fn water(&self, name: &str) -> Option<&Water> {
        self.waters.get(name)
    }

    fn equipment(&self, name: &str) -> Option<&EquipmentProfile> {
        self.equipment.get(name)
    }

    fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }
}
