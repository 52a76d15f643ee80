pub mod field_loader;
pub mod synthetic;
