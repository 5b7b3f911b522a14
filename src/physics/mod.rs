pub mod boundaries;
pub mod rapier;
