pub mod attitude;
pub mod dynamics;
pub mod hysteresis;
