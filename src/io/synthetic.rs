use crate::constants::PI;
use crate::models::timestamp::Timestamp;
use crate::numerics::time_series::{Sample, TimeSeries};
use nalgebra as na;

/// `amplitude * sin(2 pi t / period)` sampled every `spacing` seconds from `start`.
pub fn sinusoidal_field(
    start: Timestamp,
    samples: usize,
    spacing: f64,
    period: f64,
    amplitude: na::Vector3<f64>,
) -> TimeSeries<na::Vector3<f64>> {
    TimeSeries::from_samples(
        (0..samples)
            .map(|i| {
                let t = i as f64 * spacing;
                Sample {
                    time: start + t,
                    value: amplitude * (2.0 * PI * t / period).sin(),
                }
            })
            .collect(),
    )
}

/// The same vector at every sample time.
pub fn constant_field(
    start: Timestamp,
    samples: usize,
    spacing: f64,
    value: na::Vector3<f64>,
) -> TimeSeries<na::Vector3<f64>> {
    TimeSeries::from_samples(
        (0..samples)
            .map(|i| Sample {
                time: start + i as f64 * spacing,
                value,
            })
            .collect(),
    )
}
