//! Water chemistry: ion profiles, treatment salts and the additive solver

pub mod profile;
pub mod salts;
pub mod solver;

pub use profile::{Ion, WaterProfile};
pub use salts::{SaltAdditions, SaltMatrix, WaterSalt, SALT_COUNT};
pub use solver::{best_fit, calc_additions, FitResult, Goal, IonConstraint, SEARCH_SIZE};
