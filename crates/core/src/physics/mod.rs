//! Brewing equation library
//!
//! Stateless functions over typed quantities. Each returns a new quantity
//! whose `estimated` flag is the OR of its inputs' flags.

pub mod bitterness;
pub mod colour;
pub mod extract;
pub mod fermentation;
pub mod mash_ph;
pub mod mixing;
pub mod thermal;

pub use bitterness::{hop_stand_ibu, stand_temperature, tinseth_ibu};
pub use colour::{boil_colour, morey_colour, BOIL_COLOUR_FACTOR};
pub use extract::{
    boiled_volume, dissolved_extract, extract_gravity, gravity_points, grist_weight, mash_extract,
    mash_gravity, mash_volume, mash_water, ppg_gravity, wort_volume, GristItem,
};
pub use fermentation::{
    abv, carbonation_with_priming, equilibrium_carbonation, estimated_attenuation, final_gravity,
    mash_fermentability, priming_carbonation,
};
pub use mash_ph::{mash_ph, MashChemistry};
pub use mixing::{
    bitterness_with_volume_change, blend, colour_with_volume_change, combined_gravity,
    combined_ph, combined_temperature, cooling_shrinkage, gravity_with_volume_change, mix_volumes,
};
pub use thermal::{infusion_temperature, mash_temperature, strike_water_temperature, MashThermalMass};
