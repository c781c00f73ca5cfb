//! Typed physical quantities for brewing calculations
//!
//! Every quantity kind is a newtype over an `f64` held in one canonical unit,
//! plus an `estimated` provenance flag. Values convert losslessly between the
//! units of their own kind; asking a kind for a unit of another kind is an
//! error ([`BrewError::InvalidUnit`]).
//!
//! # Design Philosophy
//! - One struct per kind (`Weight`, `FluidVolume`, `Temperature`, ...), so the
//!   equation library cannot mix grams with litres
//! - The [`Unit`] enum is the discriminant for dynamic construction:
//!   [`parse_quantity`] picks the kind purely from the unit's group
//! - [`Quantity`] is the closed sum over all kinds, used where metrics are
//!   stored generically (volume metric maps)
//! - Quantities are `Copy` value types; arithmetic produces new values whose
//!   `estimated` flag is the OR of the operands
//!
//! # Usage
//! ```
//! use brew_core::core_types::units::{Temperature, Unit};
//!
//! let mash = Temperature::new(67.0);
//! assert!((mash.get(Unit::Fahrenheit).unwrap() - 152.6).abs() < 1e-9);
//! assert!(mash.get(Unit::Grams).is_err());
//! ```

use crate::error::{BrewError, BrewResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

// ============================================================================
// UNIT ENUMERATION
// ============================================================================

/// The kind of a physical quantity. Each kind has exactly one canonical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuantityKind {
    Weight,
    Volume,
    Temperature,
    Time,
    Density,
    Colour,
    Bitterness,
    Percentage,
    Pressure,
    Carbonation,
    Ph,
    Ppm,
}

impl QuantityKind {
    /// Canonical storage unit of this kind
    pub const fn canonical_unit(self) -> Unit {
        match self {
            QuantityKind::Weight => Unit::Grams,
            QuantityKind::Volume => Unit::Millilitres,
            QuantityKind::Temperature => Unit::Celsius,
            QuantityKind::Time => Unit::Seconds,
            QuantityKind::Density => Unit::GravityPoints,
            QuantityKind::Colour => Unit::Srm,
            QuantityKind::Bitterness => Unit::Ibu,
            QuantityKind::Percentage => Unit::Fraction,
            QuantityKind::Pressure => Unit::Kpa,
            QuantityKind::Carbonation => Unit::GramsPerLitre,
            QuantityKind::Ph => Unit::Ph,
            QuantityKind::Ppm => Unit::Ppm,
        }
    }

    /// All units belonging to this kind
    pub fn units(self) -> impl Iterator<Item = Unit> {
        Unit::ALL.into_iter().filter(move |u| u.kind() == self)
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuantityKind::Weight => "weight",
            QuantityKind::Volume => "volume",
            QuantityKind::Temperature => "temperature",
            QuantityKind::Time => "time",
            QuantityKind::Density => "density",
            QuantityKind::Colour => "colour",
            QuantityKind::Bitterness => "bitterness",
            QuantityKind::Percentage => "percentage",
            QuantityKind::Pressure => "pressure",
            QuantityKind::Carbonation => "carbonation",
            QuantityKind::Ph => "pH",
            QuantityKind::Ppm => "concentration",
        };
        f.write_str(name)
    }
}

/// Every unit the engine understands. The unit determines its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Weight
    Grams,
    Kilograms,
    Ounces,
    Pounds,
    // Volume
    Millilitres,
    Litres,
    UsFluidOunces,
    UsGallons,
    ImperialGallons,
    // Temperature
    Celsius,
    Fahrenheit,
    Kelvin,
    // Time
    Seconds,
    Minutes,
    Hours,
    Days,
    // Density
    GravityPoints,
    SpecificGravity,
    Plato,
    // Colour
    Srm,
    Ebc,
    Lovibond,
    // Bitterness
    Ibu,
    // Percentage
    Fraction,
    Percent,
    // Pressure
    Kpa,
    Bar,
    Psi,
    // Carbonation
    GramsPerLitre,
    VolumesCo2,
    // Acidity
    Ph,
    // Concentration
    Ppm,
}

const GRAMS_PER_OUNCE: f64 = 28.349523125;
const GRAMS_PER_POUND: f64 = 453.59237;
const ML_PER_US_FLUID_OUNCE: f64 = 29.5735295625;
const ML_PER_US_GALLON: f64 = 3785.411784;
const ML_PER_IMPERIAL_GALLON: f64 = 4546.09;
const KPA_PER_PSI: f64 = 6.894757293168361;
const KPA_PER_BAR: f64 = 100.0;
const CELSIUS_KELVIN_OFFSET: f64 = 273.15;
/// Grams of dissolved CO2 per litre for one volume of CO2
const GRAMS_PER_LITRE_PER_VOLUME: f64 = 1.96;
/// Plato/SG pair `P = 259 - 259/SG`, exactly invertible
const PLATO_CONSTANT: f64 = 259.0;

impl Unit {
    /// Every unit, grouped by kind
    pub const ALL: [Unit; 32] = [
        Unit::Grams,
        Unit::Kilograms,
        Unit::Ounces,
        Unit::Pounds,
        Unit::Millilitres,
        Unit::Litres,
        Unit::UsFluidOunces,
        Unit::UsGallons,
        Unit::ImperialGallons,
        Unit::Celsius,
        Unit::Fahrenheit,
        Unit::Kelvin,
        Unit::Seconds,
        Unit::Minutes,
        Unit::Hours,
        Unit::Days,
        Unit::GravityPoints,
        Unit::SpecificGravity,
        Unit::Plato,
        Unit::Srm,
        Unit::Ebc,
        Unit::Lovibond,
        Unit::Ibu,
        Unit::Fraction,
        Unit::Percent,
        Unit::Kpa,
        Unit::Bar,
        Unit::Psi,
        Unit::GramsPerLitre,
        Unit::VolumesCo2,
        Unit::Ph,
        Unit::Ppm,
    ];

    /// The quantity kind this unit measures
    pub const fn kind(self) -> QuantityKind {
        match self {
            Unit::Grams | Unit::Kilograms | Unit::Ounces | Unit::Pounds => QuantityKind::Weight,
            Unit::Millilitres
            | Unit::Litres
            | Unit::UsFluidOunces
            | Unit::UsGallons
            | Unit::ImperialGallons => QuantityKind::Volume,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => QuantityKind::Temperature,
            Unit::Seconds | Unit::Minutes | Unit::Hours | Unit::Days => QuantityKind::Time,
            Unit::GravityPoints | Unit::SpecificGravity | Unit::Plato => QuantityKind::Density,
            Unit::Srm | Unit::Ebc | Unit::Lovibond => QuantityKind::Colour,
            Unit::Ibu => QuantityKind::Bitterness,
            Unit::Fraction | Unit::Percent => QuantityKind::Percentage,
            Unit::Kpa | Unit::Bar | Unit::Psi => QuantityKind::Pressure,
            Unit::GramsPerLitre | Unit::VolumesCo2 => QuantityKind::Carbonation,
            Unit::Ph => QuantityKind::Ph,
            Unit::Ppm => QuantityKind::Ppm,
        }
    }

    /// Short display symbol
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Ounces => "oz",
            Unit::Pounds => "lb",
            Unit::Millilitres => "ml",
            Unit::Litres => "l",
            Unit::UsFluidOunces => "fl oz",
            Unit::UsGallons => "gal",
            Unit::ImperialGallons => "imp gal",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kelvin => "K",
            Unit::Seconds => "s",
            Unit::Minutes => "min",
            Unit::Hours => "h",
            Unit::Days => "d",
            Unit::GravityPoints => "GP",
            Unit::SpecificGravity => "SG",
            Unit::Plato => "°P",
            Unit::Srm => "SRM",
            Unit::Ebc => "EBC",
            Unit::Lovibond => "°L",
            Unit::Ibu => "IBU",
            Unit::Fraction => "",
            Unit::Percent => "%",
            Unit::Kpa => "kPa",
            Unit::Bar => "bar",
            Unit::Psi => "psi",
            Unit::GramsPerLitre => "g/l",
            Unit::VolumesCo2 => "vols",
            Unit::Ph => "pH",
            Unit::Ppm => "ppm",
        }
    }

    /// Convert an amount expressed in this unit into its kind's canonical unit
    fn to_canonical(self, amount: f64) -> f64 {
        match self {
            Unit::Grams
            | Unit::Millilitres
            | Unit::Celsius
            | Unit::Seconds
            | Unit::GravityPoints
            | Unit::Srm
            | Unit::Ibu
            | Unit::Fraction
            | Unit::Kpa
            | Unit::GramsPerLitre
            | Unit::Ph
            | Unit::Ppm => amount,
            Unit::Kilograms => amount * 1000.0,
            Unit::Ounces => amount * GRAMS_PER_OUNCE,
            Unit::Pounds => amount * GRAMS_PER_POUND,
            Unit::Litres => amount * 1000.0,
            Unit::UsFluidOunces => amount * ML_PER_US_FLUID_OUNCE,
            Unit::UsGallons => amount * ML_PER_US_GALLON,
            Unit::ImperialGallons => amount * ML_PER_IMPERIAL_GALLON,
            Unit::Fahrenheit => (amount - 32.0) * 5.0 / 9.0,
            Unit::Kelvin => amount - CELSIUS_KELVIN_OFFSET,
            Unit::Minutes => amount * 60.0,
            Unit::Hours => amount * 3600.0,
            Unit::Days => amount * 86400.0,
            Unit::SpecificGravity => amount * 1000.0,
            Unit::Plato => PLATO_CONSTANT / (PLATO_CONSTANT - amount) * 1000.0,
            // srm = 1.3546 × °L − 0.6
            Unit::Lovibond => 1.3546 * amount - 0.6,
            Unit::Ebc => amount / 1.97,
            Unit::Percent => amount / 100.0,
            Unit::Bar => amount * KPA_PER_BAR,
            Unit::Psi => amount * KPA_PER_PSI,
            Unit::VolumesCo2 => amount * GRAMS_PER_LITRE_PER_VOLUME,
        }
    }

    /// Convert a canonical amount into this unit
    fn express(self, canonical: f64) -> f64 {
        match self {
            Unit::Grams
            | Unit::Millilitres
            | Unit::Celsius
            | Unit::Seconds
            | Unit::GravityPoints
            | Unit::Srm
            | Unit::Ibu
            | Unit::Fraction
            | Unit::Kpa
            | Unit::GramsPerLitre
            | Unit::Ph
            | Unit::Ppm => canonical,
            Unit::Kilograms => canonical / 1000.0,
            Unit::Ounces => canonical / GRAMS_PER_OUNCE,
            Unit::Pounds => canonical / GRAMS_PER_POUND,
            Unit::Litres => canonical / 1000.0,
            Unit::UsFluidOunces => canonical / ML_PER_US_FLUID_OUNCE,
            Unit::UsGallons => canonical / ML_PER_US_GALLON,
            Unit::ImperialGallons => canonical / ML_PER_IMPERIAL_GALLON,
            Unit::Fahrenheit => canonical * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => canonical + CELSIUS_KELVIN_OFFSET,
            Unit::Minutes => canonical / 60.0,
            Unit::Hours => canonical / 3600.0,
            Unit::Days => canonical / 86400.0,
            Unit::SpecificGravity => canonical / 1000.0,
            Unit::Plato => PLATO_CONSTANT - PLATO_CONSTANT * 1000.0 / canonical,
            Unit::Lovibond => (canonical + 0.6) / 1.3546,
            Unit::Ebc => canonical * 1.97,
            Unit::Percent => canonical * 100.0,
            Unit::Bar => canonical / KPA_PER_BAR,
            Unit::Psi => canonical / KPA_PER_PSI,
            Unit::VolumesCo2 => canonical / GRAMS_PER_LITRE_PER_VOLUME,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// SCALAR QUANTITY TRAIT
// ============================================================================

/// Common surface of every quantity kind.
///
/// Lets the equation library write kind-generic blends (volume-weighted
/// colour, bitterness, ABV, ...) that return the same kind they were given.
pub trait ScalarQuantity: Copy + fmt::Debug {
    /// The kind this type represents
    const KIND: QuantityKind;

    /// Build a value from a canonical amount and provenance
    fn from_canonical(value: f64, estimated: bool) -> Self;

    /// Amount in the canonical unit
    fn canonical(self) -> f64;

    /// Whether this value was derived rather than measured
    fn is_estimated(self) -> bool;
}

macro_rules! quantity_kind {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $fmt:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name {
            value: f64,
            #[serde(default)]
            estimated: bool,
        }

        impl $name {
            /// Kind of this quantity
            pub const KIND: QuantityKind = QuantityKind::$kind;

            /// Zero, measured
            pub const ZERO: $name = $name { value: 0.0, estimated: false };

            /// Measured value in the canonical unit
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                $name { value, estimated: false }
            }

            /// Estimated value in the canonical unit
            #[inline]
            #[must_use]
            pub const fn estimated(value: f64) -> Self {
                $name { value, estimated: true }
            }

            /// Measured value expressed in `unit`
            ///
            /// # Errors
            /// [`BrewError::InvalidUnit`] when `unit` is not a unit of this kind.
            pub fn from_unit(amount: f64, unit: Unit) -> BrewResult<Self> {
                Self::check_unit(unit)?;
                Ok($name::new(unit.to_canonical(amount)))
            }

            /// Amount in the canonical unit
            #[inline]
            pub fn value(self) -> f64 {
                self.value
            }

            /// Amount converted to `unit`
            ///
            /// # Errors
            /// [`BrewError::InvalidUnit`] when `unit` is not a unit of this kind.
            pub fn get(self, unit: Unit) -> BrewResult<f64> {
                Self::check_unit(unit)?;
                Ok(unit.express(self.value))
            }

            /// Replace the amount (canonical unit); provenance is unchanged
            pub fn set(&mut self, value: f64) {
                self.value = value;
            }

            /// Replace the amount, expressed in `unit`
            ///
            /// # Errors
            /// [`BrewError::InvalidUnit`] when `unit` is not a unit of this kind.
            pub fn set_in(&mut self, amount: f64, unit: Unit) -> BrewResult<()> {
                Self::check_unit(unit)?;
                self.value = unit.to_canonical(amount);
                Ok(())
            }

            #[inline]
            pub fn is_estimated(self) -> bool {
                self.estimated
            }

            pub fn set_estimated(&mut self, estimated: bool) {
                self.estimated = estimated;
            }

            /// Copy with the provenance flag replaced
            #[inline]
            #[must_use]
            pub fn with_estimated(self, estimated: bool) -> Self {
                $name { value: self.value, estimated }
            }

            /// Copy with the amount replaced, keeping provenance
            #[inline]
            #[must_use]
            pub fn with_value(self, value: f64) -> Self {
                $name { value, estimated: self.estimated }
            }

            fn check_unit(unit: Unit) -> BrewResult<()> {
                if unit.kind() == QuantityKind::$kind {
                    Ok(())
                } else {
                    Err(BrewError::InvalidUnit { unit, kind: QuantityKind::$kind })
                }
            }
        }

        impl ScalarQuantity for $name {
            const KIND: QuantityKind = QuantityKind::$kind;

            fn from_canonical(value: f64, estimated: bool) -> Self {
                $name { value, estimated }
            }

            fn canonical(self) -> f64 {
                self.value
            }

            fn is_estimated(self) -> bool {
                self.estimated
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                self.value.partial_cmp(&other.value)
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name { value: self.value + rhs.value, estimated: self.estimated || rhs.estimated }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                *self = *self + rhs;
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name { value: self.value - rhs.value, estimated: self.estimated || rhs.estimated }
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                self.with_value(self.value * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                self.with_value(self.value / rhs)
            }
        }

        impl From<$name> for Quantity {
            fn from(q: $name) -> Quantity {
                Quantity::$kind(q)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $fmt, self.value)?;
                if self.estimated {
                    f.write_str(" (est)")?;
                }
                Ok(())
            }
        }
    };
}

quantity_kind!(
    /// Weight, canonically grams
    Weight, Weight, "{:.1} g"
);
quantity_kind!(
    /// Liquid volume, canonically millilitres
    FluidVolume, Volume, "{:.0} ml"
);
quantity_kind!(
    /// Temperature, canonically degrees Celsius
    Temperature, Temperature, "{:.1}°C"
);
quantity_kind!(
    /// Duration, canonically seconds
    Time, Time, "{:.0} s"
);
quantity_kind!(
    /// Density, canonically gravity points (specific gravity × 1000)
    Density, Density, "{:.1} GP"
);
quantity_kind!(
    /// Colour, canonically SRM
    Colour, Colour, "{:.1} SRM"
);
quantity_kind!(
    /// Bitterness, canonically IBU
    Bitterness, Bitterness, "{:.1} IBU"
);
quantity_kind!(
    /// Ratio, canonically a 0..1 fraction
    Percentage, Percentage, "{:.4}"
);
quantity_kind!(
    /// Gauge pressure, canonically kPa
    Pressure, Pressure, "{:.1} kPa"
);
quantity_kind!(
    /// Dissolved CO2, canonically grams per litre
    Carbonation, Carbonation, "{:.2} g/l"
);
quantity_kind!(
    /// Acidity
    Ph, Ph, "{:.2} pH"
);
quantity_kind!(
    /// Ion or additive concentration, canonically mg/L
    Ppm, Ppm, "{:.1} ppm"
);

// ============================================================================
// KIND-SPECIFIC ACCESSORS
// ============================================================================

impl Weight {
    pub fn from_kilograms(kg: f64) -> Self {
        Weight::new(kg * 1000.0)
    }

    pub fn from_pounds(lb: f64) -> Self {
        Weight::new(lb * GRAMS_PER_POUND)
    }

    #[inline]
    pub fn grams(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn kilograms(self) -> f64 {
        self.value / 1000.0
    }

    #[inline]
    pub fn pounds(self) -> f64 {
        self.value / GRAMS_PER_POUND
    }

    #[inline]
    pub fn ounces(self) -> f64 {
        self.value / GRAMS_PER_OUNCE
    }
}

impl FluidVolume {
    pub fn from_litres(litres: f64) -> Self {
        FluidVolume::new(litres * 1000.0)
    }

    pub fn from_us_gallons(gallons: f64) -> Self {
        FluidVolume::new(gallons * ML_PER_US_GALLON)
    }

    #[inline]
    pub fn millilitres(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn litres(self) -> f64 {
        self.value / 1000.0
    }

    #[inline]
    pub fn us_gallons(self) -> f64 {
        self.value / ML_PER_US_GALLON
    }
}

impl Temperature {
    /// Water boiling point at 1 atm
    pub const BOILING: Temperature = Temperature::new(100.0);

    pub fn from_fahrenheit(f: f64) -> Self {
        Temperature::new(Unit::Fahrenheit.to_canonical(f))
    }

    #[inline]
    pub fn celsius(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn fahrenheit(self) -> f64 {
        Unit::Fahrenheit.express(self.value)
    }

    #[inline]
    pub fn kelvin(self) -> f64 {
        self.value + CELSIUS_KELVIN_OFFSET
    }
}

impl Time {
    pub fn from_minutes(minutes: f64) -> Self {
        Time::new(minutes * 60.0)
    }

    pub fn from_hours(hours: f64) -> Self {
        Time::new(hours * 3600.0)
    }

    pub fn from_days(days: f64) -> Self {
        Time::new(days * 86400.0)
    }

    #[inline]
    pub fn seconds(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn minutes(self) -> f64 {
        self.value / 60.0
    }

    #[inline]
    pub fn hours(self) -> f64 {
        self.value / 3600.0
    }

    #[inline]
    pub fn days(self) -> f64 {
        self.value / 86400.0
    }
}

impl Density {
    /// Pure water, SG 1.000
    pub const WATER: Density = Density::new(1000.0);

    pub fn from_specific_gravity(sg: f64) -> Self {
        Density::new(sg * 1000.0)
    }

    pub fn from_plato(plato: f64) -> Self {
        Density::new(Unit::Plato.to_canonical(plato))
    }

    /// Gravity points relative to water: SG 1.050 is 50
    pub fn from_gravity_units(gu: f64) -> Self {
        Density::new(1000.0 + gu)
    }

    /// Specific gravity × 1000
    #[inline]
    pub fn points(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn specific_gravity(self) -> f64 {
        self.value / 1000.0
    }

    #[inline]
    pub fn plato(self) -> f64 {
        Unit::Plato.express(self.value)
    }

    /// Points above water (SG 1.050 → 50)
    #[inline]
    pub fn gravity_units(self) -> f64 {
        self.value - 1000.0
    }
}

impl Colour {
    #[inline]
    pub fn srm(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn ebc(self) -> f64 {
        Unit::Ebc.express(self.value)
    }

    #[inline]
    pub fn lovibond(self) -> f64 {
        Unit::Lovibond.express(self.value)
    }

    pub fn from_lovibond(lovibond: f64) -> Self {
        Colour::new(Unit::Lovibond.to_canonical(lovibond))
    }
}

impl Bitterness {
    #[inline]
    pub fn ibu(self) -> f64 {
        self.value
    }
}

impl Percentage {
    /// Percentage from a 0-100 value
    pub fn from_percent(percent: f64) -> Self {
        Percentage::new(percent / 100.0)
    }

    #[inline]
    pub fn fraction(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn percent(self) -> f64 {
        self.value * 100.0
    }
}

impl Pressure {
    pub fn from_psi(psi: f64) -> Self {
        Pressure::new(psi * KPA_PER_PSI)
    }

    #[inline]
    pub fn kpa(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn psi(self) -> f64 {
        self.value / KPA_PER_PSI
    }

    #[inline]
    pub fn bar(self) -> f64 {
        self.value / KPA_PER_BAR
    }
}

impl Carbonation {
    pub fn from_volumes(volumes: f64) -> Self {
        Carbonation::new(volumes * GRAMS_PER_LITRE_PER_VOLUME)
    }

    #[inline]
    pub fn grams_per_litre(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn volumes(self) -> f64 {
        self.value / GRAMS_PER_LITRE_PER_VOLUME
    }
}

impl Ph {
    #[inline]
    pub fn ph(self) -> f64 {
        self.value
    }
}

impl Ppm {
    #[inline]
    pub fn ppm(self) -> f64 {
        self.value
    }
}

// ============================================================================
// DYNAMIC QUANTITY
// ============================================================================

/// A quantity of any kind; the variant is the kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    Weight(Weight),
    Volume(FluidVolume),
    Temperature(Temperature),
    Time(Time),
    Density(Density),
    Colour(Colour),
    Bitterness(Bitterness),
    Percentage(Percentage),
    Pressure(Pressure),
    Carbonation(Carbonation),
    Ph(Ph),
    Ppm(Ppm),
}

/// Apply `$body` to the inner value of any `Quantity` variant
macro_rules! each_kind {
    ($q:expr, $inner:ident => $body:expr) => {
        match $q {
            Quantity::Weight($inner) => $body,
            Quantity::Volume($inner) => $body,
            Quantity::Temperature($inner) => $body,
            Quantity::Time($inner) => $body,
            Quantity::Density($inner) => $body,
            Quantity::Colour($inner) => $body,
            Quantity::Bitterness($inner) => $body,
            Quantity::Percentage($inner) => $body,
            Quantity::Pressure($inner) => $body,
            Quantity::Carbonation($inner) => $body,
            Quantity::Ph($inner) => $body,
            Quantity::Ppm($inner) => $body,
        }
    };
}

impl Quantity {
    /// Build a measured quantity of whichever kind `unit` belongs to
    pub fn new(amount: f64, unit: Unit) -> Quantity {
        let canonical = unit.to_canonical(amount);
        match unit.kind() {
            QuantityKind::Weight => Quantity::Weight(Weight::new(canonical)),
            QuantityKind::Volume => Quantity::Volume(FluidVolume::new(canonical)),
            QuantityKind::Temperature => Quantity::Temperature(Temperature::new(canonical)),
            QuantityKind::Time => Quantity::Time(Time::new(canonical)),
            QuantityKind::Density => Quantity::Density(Density::new(canonical)),
            QuantityKind::Colour => Quantity::Colour(Colour::new(canonical)),
            QuantityKind::Bitterness => Quantity::Bitterness(Bitterness::new(canonical)),
            QuantityKind::Percentage => Quantity::Percentage(Percentage::new(canonical)),
            QuantityKind::Pressure => Quantity::Pressure(Pressure::new(canonical)),
            QuantityKind::Carbonation => Quantity::Carbonation(Carbonation::new(canonical)),
            QuantityKind::Ph => Quantity::Ph(Ph::new(canonical)),
            QuantityKind::Ppm => Quantity::Ppm(Ppm::new(canonical)),
        }
    }

    pub fn kind(&self) -> QuantityKind {
        each_kind!(self, q => q.kind_of())
    }

    /// Amount in the canonical unit of this quantity's kind
    pub fn value(&self) -> f64 {
        each_kind!(self, q => q.value())
    }

    /// Amount converted to `unit`
    ///
    /// # Errors
    /// [`BrewError::InvalidUnit`] when `unit` belongs to another kind.
    pub fn get(&self, unit: Unit) -> BrewResult<f64> {
        each_kind!(self, q => q.get(unit))
    }

    pub fn is_estimated(&self) -> bool {
        each_kind!(self, q => q.is_estimated())
    }

    pub fn set_estimated(&mut self, estimated: bool) {
        each_kind!(self, q => q.set_estimated(estimated));
    }

    /// Extract a concrete kind, if this quantity is of it
    pub fn as_kind<Q: ScalarQuantity>(&self) -> Option<Q> {
        (self.kind() == Q::KIND).then(|| Q::from_canonical(self.value(), self.is_estimated()))
    }
}

/// Helper so `each_kind!` can read the kind off any concrete type
trait KindOf {
    fn kind_of(&self) -> QuantityKind;
}

impl<T: ScalarQuantity> KindOf for T {
    fn kind_of(&self) -> QuantityKind {
        T::KIND
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_kind!(self, q => fmt::Display::fmt(q, f))
    }
}

/// Parse a decimal amount expressed in `unit` into the matching quantity kind.
///
/// The unit alone selects the kind: `parse_quantity("1.050", Unit::SpecificGravity)`
/// yields a [`Quantity::Density`].
///
/// # Errors
/// [`BrewError::Parse`] when `text` is not a finite number.
pub fn parse_quantity(text: &str, unit: Unit) -> BrewResult<Quantity> {
    let amount: f64 = text.trim().parse().map_err(|_| BrewError::Parse {
        text: text.to_string(),
        unit,
    })?;
    if !amount.is_finite() {
        return Err(BrewError::Parse {
            text: text.to_string(),
            unit,
        });
    }
    Ok(Quantity::new(amount, unit))
}

/// True when any of the given flags is set; the provenance rule for derived values
#[inline]
pub fn any_estimated(flags: &[bool]) -> bool {
    flags.iter().any(|&e| e)
}

// ============================================================================
// TESTS
// ============================================================================
