use super::timestep::TimestepPolicy;
use crate::config::SimulationConfig;
use crate::errors::SimError;
use crate::fsm::{RunPhase, RunStateMachine};
use crate::integrators::euler::Euler;
use crate::integrators::rk4::RK4;
use crate::integrators::IntegratorKind;
use crate::models::{SatelliteState, SimulationContext, Timestamp};
use crate::numerics::time_series::TimeSeries;
use crate::physics::dynamics::MagneticDynamics;
use crate::telemetry::{TelemetryRecord, TelemetrySink};
use nalgebra as na;
use tracing::{debug, error, info};

/// What a finished run hands back.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: u64,
    pub end_time: Timestamp,
    pub final_state: SatelliteState,
}

enum Stepper<'a> {
    Euler(Euler<MagneticDynamics<'a>>),
    Rk4(RK4<MagneticDynamics<'a>>),
}

impl Stepper<'_> {
    fn integrate(
        &self,
        state: &mut SatelliteState,
        context: &mut SimulationContext,
        dt: f64,
    ) -> Result<(), SimError> {
        match self {
            Stepper::Euler(euler) => euler.integrate(state, context, dt),
            Stepper::Rk4(rk4) => rk4.integrate(state, context, dt),
        }
    }
}

/// Drives one satellite through a field time series from `start` to `stop`.
pub struct Simulation<'a> {
    field: &'a TimeSeries<na::Vector3<f64>>,
    start: Timestamp,
    stop: Timestamp,
    timestep: TimestepPolicy,
    integrator: IntegratorKind,
    apply_bar_magnet: bool,
    reorthonormalize_every: Option<u64>,
    machine: RunStateMachine,
}

impl<'a> Simulation<'a> {
    pub fn new(
        field: &'a TimeSeries<na::Vector3<f64>>,
        start: Timestamp,
        stop: Timestamp,
        timestep: TimestepPolicy,
    ) -> Result<Self, SimError> {
        timestep.validate()?;
        if stop < start {
            return Err(SimError::InvalidParameter(format!(
                "stop time {} is before start time {}",
                stop, start
            )));
        }

        Ok(Simulation {
            field,
            start,
            stop,
            timestep,
            integrator: IntegratorKind::default(),
            apply_bar_magnet: false,
            reorthonormalize_every: None,
            machine: RunStateMachine::new(),
        })
    }

    pub fn from_config(
        config: &SimulationConfig,
        field: &'a TimeSeries<na::Vector3<f64>>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let simulation = Self::new(
            field,
            config.start_time()?,
            config.stop_time()?,
            config.timestep_policy(),
        )?
        .with_integrator(config.integrator)
        .with_bar_magnet(config.apply_bar_magnet);

        match config.reorthonormalize_every {
            Some(every) => simulation.with_reorthonormalization(every),
            None => Ok(simulation),
        }
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_bar_magnet(mut self, apply: bool) -> Self {
        self.apply_bar_magnet = apply;
        self
    }

    /// Gram-Schmidt the body axes after every `every` steps.
    pub fn with_reorthonormalization(mut self, every: u64) -> Result<Self, SimError> {
        if every == 0 {
            return Err(SimError::InvalidParameter(
                "reorthonormalization interval must be at least 1".to_string(),
            ));
        }
        self.reorthonormalize_every = Some(every);
        Ok(self)
    }

    pub fn phase(&self) -> RunPhase {
        self.machine.current_phase()
    }

    /// Runs to completion, handing one record per step to `sink`.
    ///
    /// A simulation runs once; any failure ends the run with the failing
    /// step's time attached.
    pub fn run<S: TelemetrySink>(
        &mut self,
        satellite: SatelliteState,
        sink: &mut S,
    ) -> Result<RunSummary, SimError> {
        self.machine.begin(self.start)?;
        info!(
            start = %self.start,
            stop = %self.stop,
            integrator = %self.integrator,
            "Starting simulation"
        );

        let result = self.step_until_stop(satellite, sink);
        match &result {
            Ok(summary) => {
                self.machine.finish(summary.end_time);
                info!(steps = summary.steps, end = %summary.end_time, "Simulation complete");
            }
            Err(e) => {
                self.machine.finish(self.start);
                error!(error = %e, "Simulation aborted");
            }
        }
        result
    }

    fn step_until_stop<S: TelemetrySink>(
        &self,
        mut satellite: SatelliteState,
        sink: &mut S,
    ) -> Result<RunSummary, SimError> {
        let dynamics = MagneticDynamics::new(self.field, self.apply_bar_magnet);
        let stepper = match self.integrator {
            IntegratorKind::Euler => Stepper::Euler(Euler::new(dynamics)),
            IntegratorKind::Rk4 => Stepper::Rk4(RK4::new(dynamics)),
        };

        self.field.reset_cursor();
        let mut context = SimulationContext::new(self.start);
        let mut time = self.start;
        let mut steps: u64 = 0;

        while time < self.stop {
            let dt = self.timestep.next(&satellite.angular_velocity());
            context.time = time;

            self.step(&stepper, &mut satellite, &mut context, sink, steps + 1, dt)
                .map_err(|e| SimError::at_step(time, e))?;

            steps += 1;
            time = time + dt;
        }

        sink.flush()?;
        Ok(RunSummary {
            steps,
            end_time: time,
            final_state: satellite,
        })
    }

    fn step<S: TelemetrySink>(
        &self,
        stepper: &Stepper,
        satellite: &mut SatelliteState,
        context: &mut SimulationContext,
        sink: &mut S,
        step_number: u64,
        dt: f64,
    ) -> Result<(), SimError> {
        stepper.integrate(satellite, context, dt)?;

        if let Some(every) = self.reorthonormalize_every {
            if step_number % every == 0 {
                satellite.reorthonormalize()?;
                context.orientation = satellite.orientation();
            }
        }

        let h_log = self.field.linear_interpolate(context.time)?;
        let record = TelemetryRecord::capture(context, satellite, &h_log);
        debug!(
            time = %record.time,
            dt,
            torque = context.torque.magnitude(),
            omega = record.ang_vel_inrt_m,
            "Step"
        );
        sink.record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spacecraft::SpacecraftConfig;
    use crate::io::synthetic::{constant_field, sinusoidal_field};
    use crate::numerics::time_series::Sample;
    use approx::assert_abs_diff_eq;

    fn start() -> Timestamp {
        Timestamp::from_gregorian_utc(2025, 10, 1, 7, 0, 0, 0)
    }

    #[test]
    fn one_record_per_step() {
        let field = constant_field(start(), 20, 1.0, na::Vector3::zeros());
        let sat = SatelliteState::new(&SpacecraftConfig::default()).unwrap();
        let mut sim =
            Simulation::new(&field, start(), start() + 10.0, TimestepPolicy::Fixed(1.0)).unwrap();

        let mut records: Vec<TelemetryRecord> = Vec::new();
        let summary = sim.run(sat, &mut records).unwrap();

        assert_eq!(summary.steps, 10);
        assert_eq!(records.len(), 10);
        assert_eq!(summary.end_time, start() + 10.0);
        assert_eq!(records[0].time, "01 Oct 2025 07:00:00.000");
        assert_eq!(records[9].time, "01 Oct 2025 07:00:09.000");
        assert_eq!(sim.phase(), RunPhase::Done);
    }

    #[test]
    fn second_run_is_refused() {
        let field = constant_field(start(), 20, 1.0, na::Vector3::zeros());
        let sat = SatelliteState::new(&SpacecraftConfig::default()).unwrap();
        let mut sim =
            Simulation::new(&field, start(), start() + 2.0, TimestepPolicy::Fixed(1.0)).unwrap();

        let mut records: Vec<TelemetryRecord> = Vec::new();
        sim.run(sat.clone(), &mut records).unwrap();
        assert!(matches!(
            sim.run(sat, &mut records),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn failure_carries_step_time() {
        // Unsorted on purpose
        let mut field = TimeSeries::from_samples(
            (0..10)
                .map(|i| Sample {
                    time: start() + i as f64,
                    value: na::Vector3::zeros(),
                })
                .collect(),
        );
        field.push(start() + 100.0, na::Vector3::zeros());

        let sat = SatelliteState::new(&SpacecraftConfig::default()).unwrap();
        let mut sim =
            Simulation::new(&field, start(), start() + 5.0, TimestepPolicy::Fixed(1.0)).unwrap();
        let mut records: Vec<TelemetryRecord> = Vec::new();
        let err = sim.run(sat, &mut records).unwrap_err();

        assert!(matches!(
            err,
            SimError::Step { ref time, .. } if time == "01 Oct 2025 07:00:00.000"
        ));
        assert!(matches!(err.root_cause(), SimError::UnsortedSeries));
        assert!(records.is_empty());
    }

    #[test]
    fn reorthonormalization_keeps_axes_orthogonal() {
        let field = sinusoidal_field(start(), 400, 1.0, 90.0, na::Vector3::new(40.0, -30.0, 20.0));
        let config = SpacecraftConfig {
            rod_counts: [30, 30, 30],
            ..SpacecraftConfig::default()
        };
        let sat = SatelliteState::new(&config).unwrap();
        let mut sim = Simulation::new(&field, start(), start() + 300.0, TimestepPolicy::Fixed(1.0))
            .unwrap()
            .with_integrator(IntegratorKind::Rk4)
            .with_reorthonormalization(1)
            .unwrap();

        let mut records: Vec<TelemetryRecord> = Vec::new();
        let summary = sim.run(sat, &mut records).unwrap();
        let [x, y, z] = summary.final_state.orientation();
        assert_abs_diff_eq!(x.dot(&y), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x.dot(&z), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y.dot(&z), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn adaptive_steps_shrink_with_spin() {
        let field = constant_field(start(), 50, 1.0, na::Vector3::zeros());
        let config = SpacecraftConfig {
            angular_velocity: [0.0, 0.0, 1.0],
            angular_acceleration: [0.0; 3],
            ..SpacecraftConfig::default()
        };
        let sat = SatelliteState::new(&config).unwrap();
        let policy = TimestepPolicy::Adaptive { min: 0.01, max: 1.0 };
        let mut sim = Simulation::new(&field, start(), start() + 5.05, policy).unwrap();

        let mut records: Vec<TelemetryRecord> = Vec::new();
        let summary = sim.run(sat, &mut records).unwrap();
        // dt = 0.505 throughout at |w| = 1
        assert_eq!(summary.steps, 10);
    }

    #[test]
    fn reversed_interval_is_rejected() {
        let field = constant_field(start(), 20, 1.0, na::Vector3::zeros());
        assert!(
            Simulation::new(&field, start() + 1.0, start(), TimestepPolicy::Fixed(1.0)).is_err()
        );
    }
}
