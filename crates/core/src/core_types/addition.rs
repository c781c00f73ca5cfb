//! Ingredient additions owned by process steps
//!
//! An addition names an ingredient definition (resolved through reference
//! data when the step runs), carries an amount, and a `time` counted *down*
//! from the end of its step: a 60 minute hop addition in a 60 minute boil
//! goes in at the start, a 0 minute addition at flame-out.

use crate::core_types::units::{FluidVolume, Temperature, Time, Weight};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FermentableAddition {
    pub name: String,
    pub weight: Weight,
    pub time: Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopAddition {
    pub name: String,
    pub weight: Weight,
    pub time: Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterAddition {
    pub name: String,
    pub volume: FluidVolume,
    pub temperature: Temperature,
    pub time: Time,
}

impl WaterAddition {
    /// True when this charge goes in at the very start of a step of `duration`
    pub fn is_initial_charge(&self, duration: Time) -> bool {
        self.time.seconds() == duration.seconds()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YeastAddition {
    pub name: String,
    pub weight: Weight,
    pub time: Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiscAddition {
    pub name: String,
    pub weight: Weight,
    pub time: Time,
}

/// One ingredient charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IngredientAddition {
    Fermentable(FermentableAddition),
    Hop(HopAddition),
    Water(WaterAddition),
    Yeast(YeastAddition),
    Misc(MiscAddition),
}

impl IngredientAddition {
    pub fn fermentable(name: &str, weight: Weight, time: Time) -> Self {
        IngredientAddition::Fermentable(FermentableAddition {
            name: name.to_string(),
            weight,
            time,
        })
    }

    pub fn hop(name: &str, weight: Weight, time: Time) -> Self {
        IngredientAddition::Hop(HopAddition {
            name: name.to_string(),
            weight,
            time,
        })
    }

    pub fn water(name: &str, volume: FluidVolume, temperature: Temperature, time: Time) -> Self {
        IngredientAddition::Water(WaterAddition {
            name: name.to_string(),
            volume,
            temperature,
            time,
        })
    }

    pub fn yeast(name: &str, weight: Weight, time: Time) -> Self {
        IngredientAddition::Yeast(YeastAddition {
            name: name.to_string(),
            weight,
            time,
        })
    }

    pub fn misc(name: &str, weight: Weight, time: Time) -> Self {
        IngredientAddition::Misc(MiscAddition {
            name: name.to_string(),
            weight,
            time,
        })
    }

    /// Name of the referenced ingredient definition
    pub fn name(&self) -> &str {
        match self {
            IngredientAddition::Fermentable(a) => &a.name,
            IngredientAddition::Hop(a) => &a.name,
            IngredientAddition::Water(a) => &a.name,
            IngredientAddition::Yeast(a) => &a.name,
            IngredientAddition::Misc(a) => &a.name,
        }
    }

    /// Time remaining until the end of the owning step
    pub fn time(&self) -> Time {
        match self {
            IngredientAddition::Fermentable(a) => a.time,
            IngredientAddition::Hop(a) => a.time,
            IngredientAddition::Water(a) => a.time,
            IngredientAddition::Yeast(a) => a.time,
            IngredientAddition::Misc(a) => a.time,
        }
    }
}

/// Convenience filters over a list of additions
pub trait AdditionsExt {
    fn fermentables(&self) -> Vec<&FermentableAddition>;
    fn hops(&self) -> Vec<&HopAddition>;
    fn waters(&self) -> Vec<&WaterAddition>;
    fn yeasts(&self) -> Vec<&YeastAddition>;
    fn miscs(&self) -> Vec<&MiscAddition>;

    /// Total grist weight of the fermentable additions
    fn fermentable_weight(&self) -> Weight {
        self.fermentables()
            .iter()
            .fold(Weight::ZERO, |acc, f| acc + f.weight)
    }

    /// Total volume of the water additions
    fn water_volume(&self) -> FluidVolume {
        self.waters()
            .iter()
            .fold(FluidVolume::ZERO, |acc, w| acc + w.volume)
    }
}

impl AdditionsExt for [IngredientAddition] {
    fn fermentables(&self) -> Vec<&FermentableAddition> {
        self.iter()
            .filter_map(|a| match a {
                IngredientAddition::Fermentable(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    fn hops(&self) -> Vec<&HopAddition> {
        self.iter()
            .filter_map(|a| match a {
                IngredientAddition::Hop(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    fn waters(&self) -> Vec<&WaterAddition> {
        self.iter()
            .filter_map(|a| match a {
                IngredientAddition::Water(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    fn yeasts(&self) -> Vec<&YeastAddition> {
        self.iter()
            .filter_map(|a| match a {
                IngredientAddition::Yeast(y) => Some(y),
                _ => None,
            })
            .collect()
    }

    fn miscs(&self) -> Vec<&MiscAddition> {
        self.iter()
            .filter_map(|a| match a {
                IngredientAddition::Misc(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitioning() {
        let additions = vec![
            IngredientAddition::fermentable("Pale", Weight::from_kilograms(4.0), Time::from_minutes(60.0)),
            IngredientAddition::fermentable("Crystal", Weight::from_kilograms(0.5), Time::from_minutes(60.0)),
            IngredientAddition::water(
                "Tap",
                FluidVolume::from_litres(12.0),
                Temperature::new(72.0),
                Time::from_minutes(60.0),
            ),
            IngredientAddition::hop("Cascade", Weight::new(20.0), Time::from_minutes(30.0)),
        ];
        assert_eq!(additions.fermentables().len(), 2);
        assert_eq!(additions.hops().len(), 1);
        assert!(additions.yeasts().is_empty());
        assert!((additions.fermentable_weight().kilograms() - 4.5).abs() < 1e-12);
        assert!((additions.water_volume().litres() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_initial_charge() {
        let strike = WaterAddition {
            name: "Distilled".to_string(),
            volume: FluidVolume::from_litres(15.0),
            temperature: Temperature::new(74.0),
            time: Time::from_minutes(60.0),
        };
        assert!(strike.is_initial_charge(Time::from_minutes(60.0)));
        assert!(!strike.is_initial_charge(Time::from_minutes(90.0)));
        assert!(!strike.is_initial_charge(Time::from_minutes(30.0)));

        let hop = IngredientAddition::hop("Magnum", Weight::new(30.0), Time::from_minutes(60.0));
        assert_eq!(hop.name(), "Magnum");
        assert_eq!(hop.time().minutes(), 60.0);
    }
}
