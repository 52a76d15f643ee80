//! Flatley hysteresis model for permalloy damping rods.
//!
//! The rod tracks the projection `H` of the ambient auxiliary field on its
//! axis and produces a flux density `B`. Two inverse-tangent branches bound
//! the major loop:
//!
//! ```text
//! falling:  B = (2 Bs / pi) atan(k (H + Hc))
//! rising:   B = (2 Bs / pi) atan(k (H - Hc))
//! ```
//!
//! with `k = tan(pi Br / (2 Bs)) / Hc`. Which branch applies is decided by a
//! debounced slope sign, so small field ripple does not flip the rod between
//! branches.

use crate::constants::{FLATLEY_SUBSTEPS, PI};
use crate::errors::SimError;
use nalgebra as na;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeSign {
    Rising,
    Falling,
}

/// How the rod moves between the branch curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HysteresisMode {
    /// Integrate the Flatley dB/dH law over the field increment, clamped
    /// between the branches.
    #[default]
    Flatley,
    /// Jump straight onto the active branch curve.
    Asymptote,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatleyParameters {
    /// Coercivity Hc (A/m)
    pub coercivity: f64,
    /// Retentivity Br (T)
    pub retentivity: f64,
    /// Saturation Bs (T)
    pub saturation: f64,
    pub q0: f64,
    pub p: f64,
}

impl Default for FlatleyParameters {
    // HyMu-80 values used for PMAC cubesats
    fn default() -> Self {
        FlatleyParameters {
            coercivity: 12.0,
            retentivity: 0.004,
            saturation: 0.027,
            q0: 0.0,
            p: 2.0,
        }
    }
}

impl FlatleyParameters {
    pub fn validate(&self) -> Result<(), SimError> {
        let fail = |msg: String| Err(SimError::InvalidParameter(msg));
        if !(self.saturation > 0.0) {
            return fail(format!("saturation must be positive, got {}", self.saturation));
        }
        if !(self.retentivity >= 0.0 && self.retentivity < self.saturation) {
            return fail(format!(
                "retentivity must lie in [0, saturation), got {}",
                self.retentivity
            ));
        }
        if !(self.coercivity >= 0.0) {
            return fail(format!("coercivity must be non-negative, got {}", self.coercivity));
        }
        if !(self.p > 0.0) {
            return fail(format!("shape exponent p must be positive, got {}", self.p));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return fail(format!("shape factor q0 must lie in [0, 1], got {}", self.q0));
        }
        Ok(())
    }

    /// Slope constant `k` of the branch curves.
    pub fn slope_constant(&self) -> f64 {
        if self.retentivity == 0.0 {
            return 0.0;
        }
        (PI * self.retentivity / (2.0 * self.saturation)).tan() / self.coercivity
    }
}

#[derive(Debug, Clone)]
pub struct FlatleyRod {
    params: FlatleyParameters,
    k: f64,
    mode: HysteresisMode,
    tolerance: f64,

    h: f64,
    h_prev: f64,
    axis: na::Vector3<f64>,

    b: f64,
    b_prev: f64,
    slope: SlopeSign,
}

impl FlatleyRod {
    pub fn new(params: FlatleyParameters, axis: na::Vector3<f64>) -> Result<Self, SimError> {
        params.validate()?;
        Ok(FlatleyRod {
            k: params.slope_constant(),
            params,
            mode: HysteresisMode::default(),
            tolerance: 0.0,
            h: 0.0,
            h_prev: 0.0,
            axis,
            b: 0.0,
            b_prev: 0.0,
            slope: SlopeSign::Falling,
        })
    }

    pub fn with_mode(mut self, mode: HysteresisMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance.abs();
    }

    pub fn set_mode(&mut self, mode: HysteresisMode) {
        self.mode = mode;
    }

    pub fn set_coercivity(&mut self, coercivity: f64) -> Result<(), SimError> {
        self.set_parameters(FlatleyParameters {
            coercivity,
            ..self.params
        })
    }

    pub fn set_retentivity(&mut self, retentivity: f64) -> Result<(), SimError> {
        self.set_parameters(FlatleyParameters {
            retentivity,
            ..self.params
        })
    }

    pub fn set_saturation(&mut self, saturation: f64) -> Result<(), SimError> {
        self.set_parameters(FlatleyParameters {
            saturation,
            ..self.params
        })
    }

    pub fn set_shape(&mut self, q0: f64, p: f64) -> Result<(), SimError> {
        self.set_parameters(FlatleyParameters { q0, p, ..self.params })
    }

    /// Replaces all loop parameters; `k` is always rederived.
    pub fn set_parameters(&mut self, params: FlatleyParameters) -> Result<(), SimError> {
        params.validate()?;
        self.params = params;
        self.k = params.slope_constant();
        Ok(())
    }

    pub fn parameters(&self) -> FlatleyParameters {
        self.params
    }

    pub fn slope_constant(&self) -> f64 {
        self.k
    }

    pub fn mode(&self) -> HysteresisMode {
        self.mode
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn slope_sign(&self) -> SlopeSign {
        self.slope
    }

    /// Flux density B (T) along the rod.
    pub fn magnetization(&self) -> f64 {
        self.b
    }

    pub fn previous_magnetization(&self) -> f64 {
        self.b_prev
    }

    /// Field projection H (A/m) seen at the last update.
    pub fn projection(&self) -> f64 {
        self.h
    }

    /// Flux density as a vector along the rod axis.
    pub fn field(&self) -> na::Vector3<f64> {
        self.axis * self.b
    }

    /// Advances the rod to a new ambient field and returns the new B.
    pub fn update_field(&mut self, field: &na::Vector3<f64>, axis: &na::Vector3<f64>) -> f64 {
        self.h_prev = self.h;
        self.h = field.dot(axis);
        self.axis = *axis;

        self.update_slope_sign();

        // Zero coercivity collapses both branches onto one curve, and zero
        // retentivity flattens that curve to B = 0
        let b_new = if self.params.coercivity == 0.0 || self.k == 0.0 {
            self.branch(self.h, 0.0)
        } else {
            match self.mode {
                HysteresisMode::Asymptote => self.asymptote(self.h),
                HysteresisMode::Flatley => self.integrate_flatley(),
            }
        };

        self.b_prev = self.b;
        self.b = b_new;
        self.b
    }

    /// Debounced on the raw projection change in A/m, independent of the step size.
    fn update_slope_sign(&mut self) {
        let delta = self.h - self.h_prev;

        if delta < -self.tolerance {
            self.slope = SlopeSign::Falling;
        } else if delta > self.tolerance {
            self.slope = SlopeSign::Rising;
        }
    }

    /// `(2 Bs / pi) atan(k (h + offset))`, taking the limit when `k` is infinite.
    fn branch(&self, h: f64, offset: f64) -> f64 {
        let x = h + offset;
        let angle = if self.k.is_finite() {
            (self.k * x).atan()
        } else if x == 0.0 {
            0.0
        } else {
            x.signum() * PI / 2.0
        };
        2.0 * self.params.saturation / PI * angle
    }

    fn asymptote(&self, h: f64) -> f64 {
        match self.slope {
            SlopeSign::Falling => self.branch(h, self.params.coercivity),
            SlopeSign::Rising => self.branch(h, -self.params.coercivity),
        }
    }

    fn integrate_flatley(&self) -> f64 {
        let FlatleyParameters {
            coercivity: hc,
            saturation: bs,
            q0,
            p,
            ..
        } = self.params;
        let k = self.k;
        let dh = (self.h - self.h_prev) / FLATLEY_SUBSTEPS as f64;

        let mut b = self.b;
        for i in 1..=FLATLEY_SUBSTEPS {
            let h = self.h_prev + dh * i as f64;

            let theta = PI * b / (2.0 * bs);
            let k0 = theta.tan() / k;
            let offset = match self.slope {
                SlopeSign::Falling => -hc,
                SlopeSign::Rising => hc,
            };
            let beta = ((h - k0 + offset) / (2.0 * hc)).abs().powf(p);
            let alpha = (q0 + (1.0 - q0) * beta) * (2.0 * k * bs / PI);

            b += alpha * theta.cos().powi(2) * dh;

            let lower = self.branch(h, -hc);
            let upper = self.branch(h, hc);
            b = b.clamp(lower, upper);
        }
        b
    }
}
