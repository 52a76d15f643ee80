// Magnetic constants
pub const MU_0: f64 = 1.257e-6; // Vacuum permeability (H/m)
pub const NT_TO_A_PER_M: f64 = 7.95e-4; // nT of B-field to A/m of H-field

// Hysteresis integration
pub const FLATLEY_SUBSTEPS: usize = 10;

// Timestep floor used by the adaptive policy when none is configured
pub const DEFAULT_MIN_TIMESTEP: f64 = 0.01; // seconds

// Input/output formats
pub const TIME_FORMAT: &str = "%d %b %Y %H:%M:%S%.f";
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Math
pub const PI: f64 = std::f64::consts::PI;
