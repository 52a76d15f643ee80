use crate::errors::SimError;
use crate::models::timestamp::Timestamp;
use std::cmp::Ordering;
use std::ops::{Add, Mul, Sub};
use std::sync::atomic::{self, AtomicUsize};

/// Values that can be blended by the interpolators: `f64` and `na::Vector3<f64>`.
pub trait Interpolant:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self>
{
}

impl<T> Interpolant for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>
{
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<T> {
    pub time: Timestamp,
    pub value: T,
}

/// Time-ordered samples with a cursor that follows monotonic query streams.
///
/// The cursor is a cache: queries arriving out of order still return the
/// right answer, they just walk further. The series is `Sync`, so trials
/// on separate threads can share one.
#[derive(Debug)]
pub struct TimeSeries<T> {
    samples: Vec<Sample<T>>,
    cursor: AtomicUsize,
    sorted: bool,
}

impl<T: Clone> Clone for TimeSeries<T> {
    fn clone(&self) -> Self {
        TimeSeries {
            samples: self.samples.clone(),
            cursor: AtomicUsize::new(self.cursor.load(atomic::Ordering::Relaxed)),
            sorted: self.sorted,
        }
    }
}

impl<T: Interpolant> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Interpolant> TimeSeries<T> {
    pub const LAGRANGE_POINTS: usize = 4;

    pub fn new() -> Self {
        TimeSeries {
            samples: Vec::new(),
            cursor: AtomicUsize::new(0),
            sorted: true,
        }
    }

    pub fn from_samples(samples: Vec<Sample<T>>) -> Self {
        let sorted = samples.windows(2).all(|w| w[0].time <= w[1].time);
        TimeSeries {
            samples,
            cursor: AtomicUsize::new(0),
            sorted,
        }
    }

    pub fn push(&mut self, time: Timestamp, value: T) {
        self.samples.push(Sample { time, value });
        self.sorted = false;
    }

    pub fn sort(&mut self) {
        self.samples
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        self.sorted = true;
        self.cursor.store(0, atomic::Ordering::Relaxed);
    }

    /// Drops every sample whose time repeats the one before it, keeping the
    /// first. Returns how many were dropped.
    pub fn dedup_times(&mut self) -> usize {
        let before = self.samples.len();
        self.samples.dedup_by(|later, earlier| later.time == earlier.time);
        self.cursor.store(0, atomic::Ordering::Relaxed);
        before - self.samples.len()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample<T>] {
        &self.samples
    }

    pub fn first_time(&self) -> Option<Timestamp> {
        self.samples.first().map(|s| s.time)
    }

    pub fn last_time(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.time)
    }

    pub fn reset_cursor(&self) {
        self.cursor.store(0, atomic::Ordering::Relaxed);
    }

    /// Every value multiplied by `factor`; used for unit conversion.
    pub fn scaled(&self, factor: f64) -> Self {
        TimeSeries {
            samples: self
                .samples
                .iter()
                .map(|s| Sample {
                    time: s.time,
                    value: s.value * factor,
                })
                .collect(),
            cursor: AtomicUsize::new(self.cursor.load(atomic::Ordering::Relaxed)),
            sorted: self.sorted,
        }
    }

    fn require_queryable(&self) -> Result<(), SimError> {
        if !self.sorted {
            return Err(SimError::UnsortedSeries);
        }
        if self.samples.is_empty() {
            return Err(SimError::EmptySeries);
        }
        Ok(())
    }

    /// Moves the cursor to the last sample with `time <= t` (or 0 if none).
    fn seek(&self, t: Timestamp) -> usize {
        let n = self.samples.len();
        let mut pos = self.cursor.load(atomic::Ordering::Relaxed).min(n - 1);

        while pos + 1 < n && self.samples[pos + 1].time <= t {
            pos += 1;
        }
        while pos > 0 && self.samples[pos].time > t {
            pos -= 1;
        }

        self.cursor.store(pos, atomic::Ordering::Relaxed);
        pos
    }

    pub fn linear_interpolate(&self, t: Timestamp) -> Result<T, SimError> {
        self.require_queryable()?;
        let n = self.samples.len();
        if n == 1 {
            return Ok(self.samples[0].value);
        }

        // Clamp to the last pair so queries past the end extrapolate
        let i = self.seek(t).min(n - 2);
        let p0 = &self.samples[i];
        let p1 = &self.samples[i + 1];

        let span = p1.time - p0.time;
        if span == 0.0 {
            return Ok(p0.value);
        }
        Ok(p0.value + (p1.value - p0.value) * ((t - p0.time) / span))
    }

    pub fn lagrange_interpolate(&self, t: Timestamp) -> Result<T, SimError> {
        self.require_queryable()?;
        let n = self.samples.len();
        if n < Self::LAGRANGE_POINTS {
            return Err(SimError::InsufficientSamples {
                required: Self::LAGRANGE_POINTS,
                available: n,
            });
        }

        let start = self
            .seek(t)
            .saturating_sub(1)
            .min(n - Self::LAGRANGE_POINTS);
        let window = &self.samples[start..start + Self::LAGRANGE_POINTS];

        let mut result: Option<T> = None;
        for (i, pi) in window.iter().enumerate() {
            let mut weight = 1.0;
            for (j, pj) in window.iter().enumerate() {
                if i == j {
                    continue;
                }
                let span = pi.time - pj.time;
                if span == 0.0 {
                    return Err(SimError::DuplicateTimestamp(pi.time.to_string()));
                }
                weight *= (t - pj.time) / span;
            }
            let term = pi.value * weight;
            result = Some(match result {
                Some(acc) => acc + term,
                None => term,
            });
        }

        // window is never empty past the length check
        result.ok_or(SimError::EmptySeries)
    }
}
