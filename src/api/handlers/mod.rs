pub mod cities;
pub mod departments;
pub mod health;
pub mod materials;
pub mod public;
