//! Water treatment salts and acids
//!
//! Each addition dissolves into a fixed set of ions. Dosing one mg/L of an
//! addition changes each ion by its molar-mass ratio: for gypsum
//! (CaSO4·2H2O, 172.17 g/mol) one mg/L adds 40.078/172.17 mg/L calcium and
//! 96.06/172.17 mg/L sulfate. Carbonate and hydroxide sources convert to
//! bicarbonate in carbonated mash water; acids consume bicarbonate.

use super::profile::{Ion, WaterProfile};
use crate::core_types::units::{FluidVolume, Ppm, Weight};
use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of supported additions
pub const SALT_COUNT: usize = 9;

/// Ion change per mg/L of each addition; rows follow [`Ion::ALL`], columns [`WaterSalt::ALL`]
pub type SaltMatrix = SMatrix<f64, 6, SALT_COUNT>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaterSalt {
    /// Chalk, CaCO3
    CalciumCarbonate,
    /// Baking soda, NaHCO3
    SodiumBicarbonate,
    /// Gypsum, CaSO4·2H2O
    CalciumSulfate,
    /// CaCl2·2H2O
    CalciumChloride,
    /// Epsom salt, MgSO4·7H2O
    MagnesiumSulfate,
    /// Table salt, NaCl
    SodiumChloride,
    /// MgCl2·6H2O
    MagnesiumChloride,
    /// Slaked lime, Ca(OH)2
    CalciumHydroxide,
    /// Lactic acid, C3H6O3 (pure acid basis)
    LacticAcid,
}

impl WaterSalt {
    pub const ALL: [WaterSalt; SALT_COUNT] = [
        WaterSalt::CalciumCarbonate,
        WaterSalt::SodiumBicarbonate,
        WaterSalt::CalciumSulfate,
        WaterSalt::CalciumChloride,
        WaterSalt::MagnesiumSulfate,
        WaterSalt::SodiumChloride,
        WaterSalt::MagnesiumChloride,
        WaterSalt::CalciumHydroxide,
        WaterSalt::LacticAcid,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Molar mass of the addition as dosed, in g/mol
    pub const fn molar_mass(self) -> f64 {
        match self {
            WaterSalt::CalciumCarbonate => 100.087,
            WaterSalt::SodiumBicarbonate => 84.007,
            WaterSalt::CalciumSulfate => 172.17,
            WaterSalt::CalciumChloride => 147.01,
            WaterSalt::MagnesiumSulfate => 246.47,
            WaterSalt::SodiumChloride => 58.44,
            WaterSalt::MagnesiumChloride => 203.30,
            WaterSalt::CalciumHydroxide => 74.093,
            WaterSalt::LacticAcid => 90.08,
        }
    }

    /// Moles of each ion released per mole of addition (negative: consumed)
    fn stoichiometry(self) -> &'static [(Ion, f64)] {
        match self {
            WaterSalt::CalciumCarbonate => &[(Ion::Calcium, 1.0), (Ion::Bicarbonate, 2.0)],
            WaterSalt::SodiumBicarbonate => &[(Ion::Sodium, 1.0), (Ion::Bicarbonate, 1.0)],
            WaterSalt::CalciumSulfate => &[(Ion::Calcium, 1.0), (Ion::Sulfate, 1.0)],
            WaterSalt::CalciumChloride => &[(Ion::Calcium, 1.0), (Ion::Chloride, 2.0)],
            WaterSalt::MagnesiumSulfate => &[(Ion::Magnesium, 1.0), (Ion::Sulfate, 1.0)],
            WaterSalt::SodiumChloride => &[(Ion::Sodium, 1.0), (Ion::Chloride, 1.0)],
            WaterSalt::MagnesiumChloride => &[(Ion::Magnesium, 1.0), (Ion::Chloride, 2.0)],
            WaterSalt::CalciumHydroxide => &[(Ion::Calcium, 1.0), (Ion::Bicarbonate, 2.0)],
            WaterSalt::LacticAcid => &[(Ion::Bicarbonate, -1.0)],
        }
    }

    /// mg/L change of `ion` per mg/L of this addition
    pub fn coefficient(self, ion: Ion) -> f64 {
        self.stoichiometry()
            .iter()
            .filter(|(i, _)| *i == ion)
            .map(|(i, moles)| moles * i.molar_mass() / self.molar_mass())
            .sum()
    }

    /// The full ion/addition coefficient matrix
    pub fn matrix() -> SaltMatrix {
        SaltMatrix::from_fn(|row, col| WaterSalt::ALL[col].coefficient(Ion::ALL[row]))
    }

    pub const fn name(self) -> &'static str {
        match self {
            WaterSalt::CalciumCarbonate => "Calcium Carbonate",
            WaterSalt::SodiumBicarbonate => "Sodium Bicarbonate",
            WaterSalt::CalciumSulfate => "Calcium Sulfate",
            WaterSalt::CalciumChloride => "Calcium Chloride",
            WaterSalt::MagnesiumSulfate => "Magnesium Sulfate",
            WaterSalt::SodiumChloride => "Sodium Chloride",
            WaterSalt::MagnesiumChloride => "Magnesium Chloride",
            WaterSalt::CalciumHydroxide => "Calcium Hydroxide",
            WaterSalt::LacticAcid => "Lactic Acid",
        }
    }
}

impl fmt::Display for WaterSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dosing rates (mg/L) for every addition, indexed like [`WaterSalt::ALL`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaltAdditions {
    rates: [f64; SALT_COUNT],
}

impl SaltAdditions {
    pub fn new(rates: [f64; SALT_COUNT]) -> Self {
        Self { rates }
    }

    pub fn rate(&self, salt: WaterSalt) -> Ppm {
        Ppm::estimated(self.rates[salt.index()])
    }

    pub fn set_rate(&mut self, salt: WaterSalt, rate: f64) {
        self.rates[salt.index()] = rate;
    }

    /// Add a dose of `weight` dissolved into `water`
    pub fn add_weight(&mut self, salt: WaterSalt, weight: Weight, water: FluidVolume) {
        if water.litres() > 0.0 {
            self.rates[salt.index()] += weight.grams() * 1000.0 / water.litres();
        }
    }

    /// Grams of `salt` needed to dose `water`
    pub fn weight_for(&self, salt: WaterSalt, water: FluidVolume) -> Weight {
        Weight::estimated(self.rates[salt.index()] * water.litres() / 1000.0)
    }

    /// Sum of all dosing rates
    pub fn total(&self) -> f64 {
        self.rates.iter().sum()
    }

    pub fn as_vector(&self) -> SVector<f64, SALT_COUNT> {
        SVector::<f64, SALT_COUNT>::from_column_slice(&self.rates)
    }

    /// Non-zero additions in fixed order
    pub fn iter(&self) -> impl Iterator<Item = (WaterSalt, f64)> + '_ {
        WaterSalt::ALL
            .into_iter()
            .map(|s| (s, self.rates[s.index()]))
            .filter(|(_, r)| *r > 0.0)
    }

    /// Profile obtained by treating `start` with these additions: `start + A·x`
    pub fn apply(&self, start: &WaterProfile) -> WaterProfile {
        let result = start.as_vector() + WaterSalt::matrix() * self.as_vector();
        WaterProfile::from_vector(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gypsum_coefficients() {
        let s = WaterSalt::CalciumSulfate;
        assert_relative_eq!(s.coefficient(Ion::Calcium), 40.078 / 172.17, epsilon = 1e-12);
        assert_relative_eq!(s.coefficient(Ion::Sulfate), 96.06 / 172.17, epsilon = 1e-12);
        assert_eq!(s.coefficient(Ion::Chloride), 0.0);
    }

    #[test]
    fn test_chalk_adds_bicarbonate() {
        // 1 g/gal chalk (~264 mg/L) gives roughly 106 ppm Ca and 322 ppm HCO3
        let mut additions = SaltAdditions::default();
        additions.set_rate(WaterSalt::CalciumCarbonate, 264.17);
        let p = additions.apply(&WaterProfile::distilled());
        assert!((p.calcium.ppm() - 105.8).abs() < 0.5);
        assert!((p.bicarbonate.ppm() - 322.1).abs() < 1.0);
    }

    #[test]
    fn test_lactic_acid_consumes_bicarbonate() {
        let c = WaterSalt::LacticAcid.coefficient(Ion::Bicarbonate);
        assert!(c < 0.0);
        assert_relative_eq!(c, -61.017 / 90.08, epsilon = 1e-12);
    }

    #[test]
    fn test_weight_dosing() {
        let mut additions = SaltAdditions::default();
        additions.add_weight(WaterSalt::SodiumChloride, Weight::new(2.0), FluidVolume::from_litres(20.0));
        assert_relative_eq!(additions.rate(WaterSalt::SodiumChloride).ppm(), 100.0);
        let back = additions.weight_for(WaterSalt::SodiumChloride, FluidVolume::from_litres(20.0));
        assert_relative_eq!(back.grams(), 2.0);
        assert_eq!(additions.iter().count(), 1);
    }
}
