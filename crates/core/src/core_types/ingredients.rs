//! Ingredient definitions supplied by the reference-data collaborator
//!
//! These are immutable lookups keyed by name. Presets follow the usual
//! homebrew reference values and exist for tests and demos; real recipes get
//! their definitions from a [`ReferenceData`](crate::reference::ReferenceData)
//! implementation.

use crate::core_types::units::{Colour, Percentage, Ph};
use crate::water::{WaterProfile, WaterSalt};
use serde::{Deserialize, Serialize};

/// Gravity points per pound per gallon of pure sucrose
pub const SUCROSE_PPG: f64 = 46.214;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FermentableType {
    Grain,
    Sugar,
    LiquidExtract,
    DryExtract,
    Adjunct,
    Juice,
}

/// A malt, sugar, extract or adjunct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fermentable {
    pub name: String,
    pub fermentable_type: FermentableType,
    /// Colour contributed, SRM
    pub colour: Colour,
    /// Extract yield, dry basis (fraction of weight that dissolves as extract)
    pub extract_yield: Percentage,
    /// Measured distilled-water mash pH, overriding the colour-based estimate
    #[serde(default)]
    pub distilled_water_ph: Option<Ph>,
}

impl Fermentable {
    pub fn new(
        name: &str,
        fermentable_type: FermentableType,
        colour: Colour,
        extract_yield: Percentage,
    ) -> Self {
        Self {
            name: name.to_string(),
            fermentable_type,
            colour,
            extract_yield,
            distilled_water_ph: None,
        }
    }

    /// Dissolves without mashing; counted when added to a boil
    pub fn is_soluble(&self) -> bool {
        matches!(
            self.fermentable_type,
            FermentableType::Sugar
                | FermentableType::LiquidExtract
                | FermentableType::DryExtract
                | FermentableType::Juice
        )
    }

    /// Needs a mash to give up its extract
    pub fn requires_mash(&self) -> bool {
        matches!(
            self.fermentable_type,
            FermentableType::Grain | FermentableType::Adjunct
        )
    }

    /// Gravity points per pound per gallon at full extraction
    pub fn ppg(&self) -> f64 {
        self.extract_yield.fraction() * SUCROSE_PPG
    }

    /// Distilled-water mash pH of this grist component.
    ///
    /// Explicit values win. Otherwise grains are classed by colour:
    /// base malt 5.72, crystal `5.22 − 0.00504 × °L`, roast (above 200 °L) 4.71.
    /// Non-grains return `None` and do not take part in grist weighting.
    pub fn distilled_ph(&self) -> Option<Ph> {
        if let Some(ph) = self.distilled_water_ph {
            return Some(ph);
        }
        if self.fermentable_type != FermentableType::Grain {
            return None;
        }
        let lovibond = self.colour.lovibond();
        let ph = if lovibond <= 10.0 {
            5.72
        } else if lovibond <= 200.0 {
            5.22 - 0.00504 * lovibond
        } else {
            4.71
        };
        Some(Ph::estimated(ph))
    }

    pub fn pale_malt() -> Self {
        Self::new(
            "Pale Malt (2 Row)",
            FermentableType::Grain,
            Colour::from_lovibond(2.0),
            Percentage::new(0.79),
        )
    }

    pub fn crystal_60() -> Self {
        Self::new(
            "Crystal 60",
            FermentableType::Grain,
            Colour::from_lovibond(60.0),
            Percentage::new(0.74),
        )
    }

    pub fn roasted_barley() -> Self {
        Self::new(
            "Roasted Barley",
            FermentableType::Grain,
            Colour::from_lovibond(300.0),
            Percentage::new(0.55),
        )
    }

    pub fn flaked_oats() -> Self {
        Self::new(
            "Flaked Oats",
            FermentableType::Adjunct,
            Colour::from_lovibond(1.0),
            Percentage::new(0.70),
        )
    }

    pub fn table_sugar() -> Self {
        Self::new(
            "Table Sugar",
            FermentableType::Sugar,
            Colour::new(0.0),
            Percentage::new(1.0),
        )
    }

    pub fn dry_malt_extract() -> Self {
        Self::new(
            "Light Dry Malt Extract",
            FermentableType::DryExtract,
            Colour::new(4.0),
            Percentage::new(0.95),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HopForm {
    Pellet,
    Plug,
    Leaf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub name: String,
    pub alpha_acid: Percentage,
    pub form: HopForm,
}

impl Hop {
    pub fn new(name: &str, alpha_acid: Percentage, form: HopForm) -> Self {
        Self {
            name: name.to_string(),
            alpha_acid,
            form,
        }
    }

    pub fn cascade() -> Self {
        Self::new("Cascade", Percentage::from_percent(5.5), HopForm::Pellet)
    }

    pub fn east_kent_goldings() -> Self {
        Self::new("East Kent Goldings", Percentage::from_percent(5.0), HopForm::Leaf)
    }

    pub fn magnum() -> Self {
        Self::new("Magnum", Percentage::from_percent(12.0), HopForm::Pellet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YeastType {
    Ale,
    Lager,
    Wheat,
    Wine,
    Champagne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yeast {
    pub name: String,
    pub yeast_type: YeastType,
    /// Rated apparent attenuation
    pub attenuation: Percentage,
}

impl Yeast {
    pub fn new(name: &str, yeast_type: YeastType, attenuation: Percentage) -> Self {
        Self {
            name: name.to_string(),
            yeast_type,
            attenuation,
        }
    }

    pub fn american_ale() -> Self {
        Self::new("American Ale", YeastType::Ale, Percentage::from_percent(77.0))
    }

    pub fn german_lager() -> Self {
        Self::new("German Lager", YeastType::Lager, Percentage::from_percent(75.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiscType {
    Spice,
    Fining,
    WaterAgent,
    Herb,
    Flavour,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Misc {
    pub name: String,
    pub misc_type: MiscType,
    /// Set for water agents; the salt this addition dissolves as
    #[serde(default)]
    pub water_salt: Option<WaterSalt>,
}

impl Misc {
    pub fn new(name: &str, misc_type: MiscType) -> Self {
        Self {
            name: name.to_string(),
            misc_type,
            water_salt: None,
        }
    }

    /// A water agent backed by one of the solver's salts
    pub fn water_agent(salt: WaterSalt) -> Self {
        Self {
            name: salt.name().to_string(),
            misc_type: MiscType::WaterAgent,
            water_salt: Some(salt),
        }
    }

    pub fn irish_moss() -> Self {
        Self::new("Irish Moss", MiscType::Fining)
    }
}

/// A source water
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Water {
    pub name: String,
    pub profile: WaterProfile,
    pub ph: Ph,
}

impl Water {
    pub fn new(name: &str, profile: WaterProfile, ph: Ph) -> Self {
        Self {
            name: name.to_string(),
            profile,
            ph,
        }
    }

    pub fn distilled() -> Self {
        Self::new("Distilled", WaterProfile::distilled(), Ph::new(7.0))
    }

    /// Moderately hard, carbonate-heavy tap water
    pub fn hard_tap() -> Self {
        Self::new(
            "Hard Tap",
            WaterProfile::from_ppm(90.0, 18.0, 20.0, 60.0, 45.0, 240.0),
            Ph::new(7.8),
        )
    }
}
