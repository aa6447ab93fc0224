pub mod material;

pub use material::{MaterialStatus, MaterialType};
