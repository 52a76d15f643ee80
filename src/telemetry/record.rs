use crate::models::{SatelliteState, SimulationContext};
use crate::numerics::rotation::project_onto;
use nalgebra as na;
use serde::Serialize;

/// One telemetry row. Body-frame columns are components along the body axes
/// at the end of the step; `_m` columns are magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    #[serde(rename = "Time")]
    pub time: String,

    #[serde(rename = "aux_mag_body_x(A/m)")]
    pub aux_mag_body_x: f64,
    #[serde(rename = "aux_mag_body_y(A/m)")]
    pub aux_mag_body_y: f64,
    #[serde(rename = "aux_mag_body_z(A/m)")]
    pub aux_mag_body_z: f64,
    #[serde(rename = "aux_mag_body_m(A/m)")]
    pub aux_mag_body_m: f64,

    #[serde(rename = "hys_mag_body_x(Tesla)")]
    pub hys_mag_body_x: f64,
    #[serde(rename = "hys_mag_body_y(Tesla)")]
    pub hys_mag_body_y: f64,
    #[serde(rename = "hys_mag_body_z(Tesla)")]
    pub hys_mag_body_z: f64,
    #[serde(rename = "hys_mag_body_m(Tesla)")]
    pub hys_mag_body_m: f64,

    #[serde(rename = "mag_mmt_body_x(Am2)")]
    pub mag_mmt_body_x: f64,
    #[serde(rename = "mag_mmt_body_y(Am2)")]
    pub mag_mmt_body_y: f64,
    #[serde(rename = "mag_mmt_body_z(Am2)")]
    pub mag_mmt_body_z: f64,
    #[serde(rename = "mag_mmt_inrt_x(Am2)")]
    pub mag_mmt_inrt_x: f64,
    #[serde(rename = "mag_mmt_inrt_y(Am2)")]
    pub mag_mmt_inrt_y: f64,
    #[serde(rename = "mag_mmt_inrt_z(Am2)")]
    pub mag_mmt_inrt_z: f64,
    #[serde(rename = "mag_mmt_m(Am2)")]
    pub mag_mmt_m: f64,

    #[serde(rename = "torque_x_inrt(Nm)")]
    pub torque_x_inrt: f64,
    #[serde(rename = "torque_y_inrt(Nm)")]
    pub torque_y_inrt: f64,
    #[serde(rename = "torque_z_inrt(Nm)")]
    pub torque_z_inrt: f64,
    #[serde(rename = "torque_x_body(Nm)")]
    pub torque_x_body: f64,
    #[serde(rename = "torque_y_body(Nm)")]
    pub torque_y_body: f64,
    #[serde(rename = "torque_z_body(Nm)")]
    pub torque_z_body: f64,

    #[serde(rename = "ang_vel_inrt_x(rad/s)")]
    pub ang_vel_inrt_x: f64,
    #[serde(rename = "ang_vel_inrt_y(rad/s)")]
    pub ang_vel_inrt_y: f64,
    #[serde(rename = "ang_vel_inrt_z(rad/s)")]
    pub ang_vel_inrt_z: f64,
    #[serde(rename = "ang_vel_inrt_m(rad/s)")]
    pub ang_vel_inrt_m: f64,

    #[serde(rename = "ang_acc_inrt_x(rad/s2)")]
    pub ang_acc_inrt_x: f64,
    #[serde(rename = "ang_acc_inrt_y(rad/s2)")]
    pub ang_acc_inrt_y: f64,
    #[serde(rename = "ang_acc_inrt_z(rad/s2)")]
    pub ang_acc_inrt_z: f64,
    #[serde(rename = "ang_acc_inrt_m(rad/s2)")]
    pub ang_acc_inrt_m: f64,

    #[serde(rename = "ang_vel_body_x(rad/s)")]
    pub ang_vel_body_x: f64,
    #[serde(rename = "ang_vel_body_y(rad/s)")]
    pub ang_vel_body_y: f64,
    #[serde(rename = "ang_vel_body_z(rad/s)")]
    pub ang_vel_body_z: f64,
    #[serde(rename = "ang_vel_body_m(rad/s)")]
    pub ang_vel_body_m: f64,

    #[serde(rename = "ang_acc_body_x(rad/s2)")]
    pub ang_acc_body_x: f64,
    #[serde(rename = "ang_acc_body_y(rad/s2)")]
    pub ang_acc_body_y: f64,
    #[serde(rename = "ang_acc_body_z(rad/s2)")]
    pub ang_acc_body_z: f64,
    #[serde(rename = "ang_acc_body_m(rad/s2)")]
    pub ang_acc_body_m: f64,
}

impl TelemetryRecord {
    pub const COLUMNS: usize = 38;

    /// Builds the row for a finished step. `h` is the logged auxiliary field
    /// (A/m) in the inertial frame.
    pub fn capture(
        context: &SimulationContext,
        satellite: &SatelliteState,
        h: &na::Vector3<f64>,
    ) -> Self {
        let axes = satellite.orientation();
        let body = |v: &na::Vector3<f64>| project_onto(&axes, v);

        let aux = body(h);
        let hys = body(&context.hysteresis_flux);
        let moment = &context.moment;
        let moment_body = body(moment);
        let torque = &context.torque;
        let torque_body = body(torque);
        let omega = satellite.angular_velocity();
        let omega_body = body(&omega);
        let alpha = satellite.angular_acceleration();
        let alpha_body = body(&alpha);

        TelemetryRecord {
            time: context.time.to_string(),

            aux_mag_body_x: aux.x,
            aux_mag_body_y: aux.y,
            aux_mag_body_z: aux.z,
            aux_mag_body_m: h.magnitude(),

            hys_mag_body_x: hys.x,
            hys_mag_body_y: hys.y,
            hys_mag_body_z: hys.z,
            hys_mag_body_m: context.hysteresis_flux.magnitude(),

            mag_mmt_body_x: moment_body.x,
            mag_mmt_body_y: moment_body.y,
            mag_mmt_body_z: moment_body.z,
            mag_mmt_inrt_x: moment.x,
            mag_mmt_inrt_y: moment.y,
            mag_mmt_inrt_z: moment.z,
            mag_mmt_m: moment.magnitude(),

            torque_x_inrt: torque.x,
            torque_y_inrt: torque.y,
            torque_z_inrt: torque.z,
            torque_x_body: torque_body.x,
            torque_y_body: torque_body.y,
            torque_z_body: torque_body.z,

            ang_vel_inrt_x: omega.x,
            ang_vel_inrt_y: omega.y,
            ang_vel_inrt_z: omega.z,
            ang_vel_inrt_m: omega.magnitude(),

            ang_acc_inrt_x: alpha.x,
            ang_acc_inrt_y: alpha.y,
            ang_acc_inrt_z: alpha.z,
            ang_acc_inrt_m: alpha.magnitude(),

            ang_vel_body_x: omega_body.x,
            ang_vel_body_y: omega_body.y,
            ang_vel_body_z: omega_body.z,
            ang_vel_body_m: omega_body.magnitude(),

            ang_acc_body_x: alpha_body.x,
            ang_acc_body_y: alpha_body.y,
            ang_acc_body_z: alpha_body.z,
            ang_acc_body_m: alpha_body.magnitude(),
        }
    }
}
