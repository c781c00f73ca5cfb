//! Beer style guidelines used to validate packaged beer

use crate::core_types::units::{Bitterness, Carbonation, Colour, Density, Percentage, ScalarQuantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive `[min, max]` range for one style parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<Q> {
    pub min: Q,
    pub max: Q,
}

impl<Q> Bounds<Q> {
    pub const fn new(min: Q, max: Q) -> Self {
        Self { min, max }
    }
}

/// Which bound a value violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundViolation {
    BelowMin,
    AboveMax,
}

impl fmt::Display for BoundViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundViolation::BelowMin => f.write_str("below style minimum"),
            BoundViolation::AboveMax => f.write_str("above style maximum"),
        }
    }
}

impl Bounds<f64> {
    /// Checks `value` against the range
    pub fn check(&self, value: f64) -> Option<BoundViolation> {
        if value < self.min {
            Some(BoundViolation::BelowMin)
        } else if value > self.max {
            Some(BoundViolation::AboveMax)
        } else {
            None
        }
    }
}

impl<Q: ScalarQuantity> Bounds<Q> {
    /// Checks a typed value against the range in canonical units
    pub fn check_quantity(&self, value: Q) -> Option<BoundViolation> {
        Bounds::new(self.min.canonical(), self.max.canonical()).check(value.canonical())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub og: Bounds<Density>,
    pub fg: Bounds<Density>,
    pub ibu: Bounds<Bitterness>,
    pub colour: Bounds<Colour>,
    pub abv: Bounds<Percentage>,
    pub carbonation: Bounds<Carbonation>,
}

impl Style {
    pub fn american_pale_ale() -> Self {
        Self {
            name: "American Pale Ale".to_string(),
            og: Bounds::new(
                Density::from_specific_gravity(1.045),
                Density::from_specific_gravity(1.060),
            ),
            fg: Bounds::new(
                Density::from_specific_gravity(1.010),
                Density::from_specific_gravity(1.015),
            ),
            ibu: Bounds::new(Bitterness::new(30.0), Bitterness::new(50.0)),
            colour: Bounds::new(Colour::new(5.0), Colour::new(10.0)),
            abv: Bounds::new(Percentage::new(0.045), Percentage::new(0.062)),
            carbonation: Bounds::new(Carbonation::from_volumes(2.3), Carbonation::from_volumes(2.8)),
        }
    }

    pub fn dry_stout() -> Self {
        Self {
            name: "Irish Stout".to_string(),
            og: Bounds::new(
                Density::from_specific_gravity(1.036),
                Density::from_specific_gravity(1.044),
            ),
            fg: Bounds::new(
                Density::from_specific_gravity(1.007),
                Density::from_specific_gravity(1.011),
            ),
            ibu: Bounds::new(Bitterness::new(25.0), Bitterness::new(45.0)),
            colour: Bounds::new(Colour::new(25.0), Colour::new(40.0)),
            abv: Bounds::new(Percentage::new(0.04), Percentage::new(0.045)),
            carbonation: Bounds::new(Carbonation::from_volumes(1.6), Carbonation::from_volumes(2.1)),
        }
    }
}
