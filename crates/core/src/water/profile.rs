//! Brewing water ion profiles

use crate::core_types::units::Ppm;
use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six ions brewing water chemistry tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ion {
    Calcium,
    Magnesium,
    Sodium,
    Sulfate,
    Chloride,
    Bicarbonate,
}

impl Ion {
    /// Fixed enumeration order; also the row order of the salt coefficient matrix
    pub const ALL: [Ion; 6] = [
        Ion::Calcium,
        Ion::Magnesium,
        Ion::Sodium,
        Ion::Sulfate,
        Ion::Chloride,
        Ion::Bicarbonate,
    ];

    /// Molar mass in g/mol
    pub const fn molar_mass(self) -> f64 {
        match self {
            Ion::Calcium => 40.078,
            Ion::Magnesium => 24.305,
            Ion::Sodium => 22.990,
            Ion::Sulfate => 96.06,
            Ion::Chloride => 35.453,
            Ion::Bicarbonate => 61.017,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Ion::Calcium => "Ca",
            Ion::Magnesium => "Mg",
            Ion::Sodium => "Na",
            Ion::Sulfate => "SO4",
            Ion::Chloride => "Cl",
            Ion::Bicarbonate => "HCO3",
        }
    }
}

impl fmt::Display for Ion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Ion concentrations of a water, in mg/L
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterProfile {
    pub calcium: Ppm,
    pub magnesium: Ppm,
    pub sodium: Ppm,
    pub sulfate: Ppm,
    pub chloride: Ppm,
    pub bicarbonate: Ppm,
}

impl WaterProfile {
    /// Build from raw mg/L values in [`Ion::ALL`] order
    pub fn from_ppm(ca: f64, mg: f64, na: f64, so4: f64, cl: f64, hco3: f64) -> Self {
        Self {
            calcium: Ppm::new(ca),
            magnesium: Ppm::new(mg),
            sodium: Ppm::new(na),
            sulfate: Ppm::new(so4),
            chloride: Ppm::new(cl),
            bicarbonate: Ppm::new(hco3),
        }
    }

    /// Distilled / reverse-osmosis water
    pub fn distilled() -> Self {
        Self::default()
    }

    pub fn get(&self, ion: Ion) -> Ppm {
        match ion {
            Ion::Calcium => self.calcium,
            Ion::Magnesium => self.magnesium,
            Ion::Sodium => self.sodium,
            Ion::Sulfate => self.sulfate,
            Ion::Chloride => self.chloride,
            Ion::Bicarbonate => self.bicarbonate,
        }
    }

    pub fn set(&mut self, ion: Ion, value: Ppm) {
        match ion {
            Ion::Calcium => self.calcium = value,
            Ion::Magnesium => self.magnesium = value,
            Ion::Sodium => self.sodium = value,
            Ion::Sulfate => self.sulfate = value,
            Ion::Chloride => self.chloride = value,
            Ion::Bicarbonate => self.bicarbonate = value,
        }
    }

    /// Concentrations as a column vector in [`Ion::ALL`] order
    pub fn as_vector(&self) -> SVector<f64, 6> {
        SVector::<f64, 6>::from_fn(|i, _| self.get(Ion::ALL[i]).ppm())
    }

    /// Inverse of [`WaterProfile::as_vector`]; results are marked estimated
    pub fn from_vector(v: &SVector<f64, 6>) -> Self {
        let mut profile = WaterProfile::default();
        for ion in Ion::ALL {
            profile.set(ion, Ppm::estimated(v[ion.index()]));
        }
        profile
    }

    /// Total alkalinity as CaCO3 (mg/L)
    pub fn alkalinity(&self) -> f64 {
        self.bicarbonate.ppm() * 50.0 / 61.0
    }

    /// Residual alkalinity as CaCO3 (mg/L):
    /// `RA = alkalinity − (Ca/1.4 + Mg/1.7)`
    pub fn residual_alkalinity(&self) -> f64 {
        self.alkalinity() - (self.calcium.ppm() / 1.4 + self.magnesium.ppm() / 1.7)
    }

    /// Mean squared error across the six ion concentrations
    pub fn mse(&self, other: &WaterProfile) -> f64 {
        let diff = self.as_vector() - other.as_vector();
        diff.norm_squared() / 6.0
    }
}

impl fmt::Display for WaterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Ion::ALL
            .iter()
            .map(|ion| format!("{} {:.1}", ion, self.get(*ion).ppm()))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_round_trip() {
        let p = WaterProfile::from_ppm(50.0, 10.0, 15.0, 80.0, 60.0, 120.0);
        let v = p.as_vector();
        assert_eq!(v[Ion::Sulfate.index()], 80.0);
        let back = WaterProfile::from_vector(&v);
        assert_eq!(back.chloride.ppm(), 60.0);
        assert!(back.chloride.is_estimated());
    }

    #[test]
    fn test_residual_alkalinity() {
        let p = WaterProfile::from_ppm(70.0, 17.0, 0.0, 0.0, 0.0, 122.0);
        // alkalinity 100, Ca/1.4 = 50, Mg/1.7 = 10
        assert!((p.residual_alkalinity() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_mse() {
        let a = WaterProfile::from_ppm(10.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let b = WaterProfile::distilled();
        assert!((a.mse(&b) - 100.0 / 6.0).abs() < 1e-12);
        assert_eq!(a.mse(&a), 0.0);
    }
}
