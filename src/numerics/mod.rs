pub mod rotation;
pub mod time_series;
