//! Brewery equipment profile (read-only configuration for a recipe)

use crate::core_types::units::{FluidVolume, Percentage, Weight};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentProfile {
    pub name: String,

    // Mash tun
    pub mash_tun_volume: FluidVolume,
    pub mash_tun_weight: Weight,
    /// Specific heat of the tun material, cal/(g·°C)
    pub mash_tun_specific_heat: f64,
    /// Fraction of the grist's potential extract the mash converts
    pub conversion_efficiency: Percentage,
    /// Wort left behind in the tun dead space
    pub lauter_loss: FluidVolume,

    // Kettle
    pub boil_kettle_volume: FluidVolume,
    /// Fraction of the wort volume boiled off per hour
    pub boil_evaporation_rate: Percentage,
    /// Multiplier applied to calculated hop utilisation
    pub hop_utilisation: Percentage,
    pub trub_and_chiller_loss: FluidVolume,

    // Fermenter
    pub fermenter_volume: FluidVolume,
}

impl EquipmentProfile {
    /// A typical 20 litre single-vessel homebrew setup
    pub fn homebrew_20l() -> Self {
        Self {
            name: "Homebrew 20L".to_string(),
            mash_tun_volume: FluidVolume::from_litres(40.0),
            mash_tun_weight: Weight::from_kilograms(4.0),
            mash_tun_specific_heat: 0.12,
            conversion_efficiency: Percentage::new(0.9),
            lauter_loss: FluidVolume::from_litres(1.0),
            boil_kettle_volume: FluidVolume::from_litres(40.0),
            boil_evaporation_rate: Percentage::new(0.1),
            hop_utilisation: Percentage::new(1.0),
            trub_and_chiller_loss: FluidVolume::from_litres(1.5),
            fermenter_volume: FluidVolume::from_litres(25.0),
        }
    }

    /// Heat capacity of the mash tun expressed as an equivalent mass of water, kg
    pub fn mash_tun_water_equivalent(&self) -> f64 {
        self.mash_tun_weight.kilograms() * self.mash_tun_specific_heat
    }
}
