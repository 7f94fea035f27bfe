//! Time-stepped internal-ballistics solver.
//!
//! The solver is driven from outside: each [`BallisticsSolver::step`] call advances
//! one fixed time step and returns the recorded sample, so a UI timer, a batch
//! loop or a test can all drive it the same way. It holds no threads or timers.

use serde::Serialize;
use srocket_core::constants::STANDARD_ATMOSPHERE_MPA;
use srocket_geometry::{self as geometry, GeometryState};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::Motor;
use crate::pressure::{self, PressureError};
use crate::summary::{SimulationResult, SummaryError};

/// Run-level numeric settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub ambient_pressure_mpa: f64,
    pub time_step_s: f64,
    pub max_steps: usize,
    pub max_time_s: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ambient_pressure_mpa: STANDARD_ATMOSPHERE_MPA,
            time_step_s: 0.01,
            max_steps: 100_000,
            max_time_s: 600.0,
        }
    }
}

/// One recorded solver step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time_s: f64,
    pub regression_mm: f64,
    pub burn_area_mm2: f64,
    pub port_area_mm2: f64,
    pub kn: f64,
    pub chamber_pressure_mpa: f64,
    pub burn_rate_mm_s: f64,
    pub mass_flow_kg_s: f64,
    pub mass_flux_kg_m2_s: f64,
    pub ideal_thrust_coefficient: f64,
    pub thrust_coefficient: f64,
    pub thrust_n: f64,
}

/// Mutable run state owned by the solver; read-only to everyone else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationState {
    time_s: f64,
    regression_mm: f64,
    steps: usize,
    samples: Vec<Sample>,
}

impl SimulationState {
    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn regression_mm(&self) -> f64 {
        self.regression_mm
    }

    /// Number of burning steps taken (the terminal burnout sample is not a step).
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

/// Lifecycle of a solver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Idle,
    Running,
    Paused,
    Completed,
    Incomplete,
    Aborted,
}

impl SolverStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SolverStatus::Completed | SolverStatus::Incomplete | SolverStatus::Aborted
        )
    }
}

/// Which safety ceiling ended an unfinished burn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ceiling {
    Steps(usize),
    Time(f64),
}

/// Why a run was aborted, with the quantity that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbortReason {
    #[error("chamber pressure solve failed at Kn {kn}: {source}")]
    Pressure {
        kn: f64,
        #[source]
        source: PressureError,
    },
    #[error("burn area {burn_area_mm2} mm² is invalid for a grain that is not burned out")]
    InvalidGeometry { burn_area_mm2: f64 },
    #[error("regression advanced {increment_mm} mm in one step, more than the {web_mm} mm web")]
    RunawayRegression { increment_mm: f64, web_mm: f64 },
    #[error("thrust coefficient unavailable: {0}")]
    Nozzle(String),
}

/// Diagnostic attached to an aborted run.
#[derive(Debug, Clone, PartialEq)]
pub struct AbortDiagnostic {
    /// Index of the step that failed; no sample was recorded for it.
    pub step_index: usize,
    pub time_s: f64,
    pub reason: AbortReason,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The grain burned out.
    Completed,
    /// A step or time ceiling was hit before burnout.
    Incomplete(Ceiling),
    Aborted(AbortDiagnostic),
}

/// Result of a single [`BallisticsSolver::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A burning sample was recorded and the state advanced.
    Advanced(Sample),
    /// The run reached a terminal state on this call.
    Finished(Termination),
}

/// Misuse of the solver API or invalid run settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("time step must be positive and finite (got {0})")]
    InvalidTimeStep(f64),
    #[error("ambient pressure must be finite and non-negative (got {0})")]
    InvalidAmbientPressure(f64),
    #[error("max steps must be at least 1")]
    InvalidMaxSteps,
    #[error("max time must be positive (got {0})")]
    InvalidMaxTime(f64),
    #[error("solver is paused; resume before stepping")]
    Paused,
    #[error("cannot {action} while {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: SolverStatus,
    },
    #[error("run already finished: {0:?}")]
    Finished(Termination),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Owns one simulation run of one motor.
#[derive(Debug, Clone)]
pub struct BallisticsSolver {
    motor: Motor,
    config: SimulationConfig,
    status: SolverStatus,
    state: SimulationState,
    termination: Option<Termination>,
}

impl BallisticsSolver {
    pub fn new(motor: Motor, config: SimulationConfig) -> Result<Self, SolverError> {
        if !(config.time_step_s > 0.0 && config.time_step_s.is_finite()) {
            return Err(SolverError::InvalidTimeStep(config.time_step_s));
        }
        if !(config.ambient_pressure_mpa >= 0.0 && config.ambient_pressure_mpa.is_finite()) {
            return Err(SolverError::InvalidAmbientPressure(
                config.ambient_pressure_mpa,
            ));
        }
        if config.max_steps == 0 {
            return Err(SolverError::InvalidMaxSteps);
        }
        if !(config.max_time_s > 0.0) {
            return Err(SolverError::InvalidMaxTime(config.max_time_s));
        }
        Ok(Self {
            motor,
            config,
            status: SolverStatus::Idle,
            state: SimulationState::default(),
            termination: None,
        })
    }

    pub fn motor(&self) -> &Motor {
        &self.motor
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn pause(&mut self) -> Result<(), SolverError> {
        match self.status {
            SolverStatus::Running => {
                self.status = SolverStatus::Paused;
                Ok(())
            }
            status => Err(SolverError::InvalidTransition {
                action: "pause",
                status,
            }),
        }
    }

    pub fn resume(&mut self) -> Result<(), SolverError> {
        match self.status {
            SolverStatus::Paused => {
                self.status = SolverStatus::Running;
                Ok(())
            }
            status => Err(SolverError::InvalidTransition {
                action: "resume",
                status,
            }),
        }
    }

    /// Discard the run state and return to `Idle`.
    pub fn reset(&mut self) {
        self.status = SolverStatus::Idle;
        self.state = SimulationState::default();
        self.termination = None;
    }

    /// Advance one time step. Not reentrant; a terminal run rejects further steps.
    pub fn step(&mut self) -> Result<StepOutcome, SolverError> {
        match self.status {
            SolverStatus::Paused => return Err(SolverError::Paused),
            SolverStatus::Idle => {
                debug!(
                    motor = %self.motor.name,
                    shape = %self.motor.grain.kind(),
                    time_step_s = self.config.time_step_s,
                    "starting ballistics run"
                );
                self.status = SolverStatus::Running;
            }
            SolverStatus::Running => {}
            SolverStatus::Completed | SolverStatus::Incomplete | SolverStatus::Aborted => {
                let termination = self
                    .termination
                    .clone()
                    .unwrap_or(Termination::Completed);
                return Err(SolverError::Finished(termination));
            }
        }

        let geometry = geometry::regress(&self.motor.grain, self.state.regression_mm);
        if geometry.burned_out {
            self.record_burnout();
            return Ok(StepOutcome::Finished(self.finish(Termination::Completed)));
        }

        if self.state.steps >= self.config.max_steps {
            let ceiling = Ceiling::Steps(self.config.max_steps);
            return Ok(StepOutcome::Finished(
                self.finish(Termination::Incomplete(ceiling)),
            ));
        }
        if self.state.time_s > self.config.max_time_s {
            let ceiling = Ceiling::Time(self.config.max_time_s);
            return Ok(StepOutcome::Finished(
                self.finish(Termination::Incomplete(ceiling)),
            ));
        }

        match self.burning_sample(&geometry) {
            Ok(sample) => {
                trace!(
                    time_s = sample.time_s,
                    pressure_mpa = sample.chamber_pressure_mpa,
                    thrust_n = sample.thrust_n,
                    "step"
                );
                let increment = sample.burn_rate_mm_s * self.config.time_step_s;
                let web = self.motor.grain.initial_web();
                if increment > web {
                    return Ok(StepOutcome::Finished(self.abort(
                        AbortReason::RunawayRegression {
                            increment_mm: increment,
                            web_mm: web,
                        },
                    )));
                }
                self.state.samples.push(sample);
                self.state.regression_mm += increment;
                self.state.time_s += self.config.time_step_s;
                self.state.steps += 1;
                Ok(StepOutcome::Advanced(sample))
            }
            Err(reason) => Ok(StepOutcome::Finished(self.abort(reason))),
        }
    }

    /// Step until the run reaches a terminal state.
    pub fn run_to_end(&mut self) -> Result<Termination, SolverError> {
        loop {
            if let StepOutcome::Finished(termination) = self.step()? {
                return Ok(termination);
            }
        }
    }

    /// Summarize the recorded samples of a finished run.
    pub fn summary(&self) -> Result<SimulationResult, SolverError> {
        if !self.status.is_terminal() {
            return Err(SolverError::InvalidTransition {
                action: "summarize",
                status: self.status,
            });
        }
        Ok(SimulationResult::from_samples(
            &self.motor,
            self.state.samples(),
            self.state.regression_mm,
        )?)
    }

    fn burning_sample(&self, geometry: &GeometryState) -> Result<Sample, AbortReason> {
        let burn_area = geometry.burn_area;
        if !(burn_area > 0.0 && burn_area.is_finite()) {
            return Err(AbortReason::InvalidGeometry {
                burn_area_mm2: burn_area,
            });
        }

        let propellant = &self.motor.propellant;
        let nozzle = &self.motor.nozzle;
        let kn = burn_area / nozzle.throat_area_mm2();
        let chamber_pressure = pressure::equilibrium_pressure(propellant, kn)
            .map_err(|source| AbortReason::Pressure { kn, source })?;
        let burn_rate = propellant.burn_rate(chamber_pressure);

        let gamma = propellant.specific_heat_ratio();
        let ambient = self.config.ambient_pressure_mpa;
        let ideal_cf = nozzle
            .ideal_thrust_coefficient(gamma, chamber_pressure, ambient)
            .map_err(|err| AbortReason::Nozzle(err.to_string()))?;
        let cf = ideal_cf * nozzle.efficiency();
        // MPa · mm² = N
        let thrust = chamber_pressure * nozzle.throat_area_mm2() * cf;

        let mass_flow = pressure::generated_mass_flow(propellant, burn_area, burn_rate);

        Ok(Sample {
            time_s: self.state.time_s,
            regression_mm: self.state.regression_mm,
            burn_area_mm2: burn_area,
            port_area_mm2: geometry.port_area,
            kn,
            chamber_pressure_mpa: chamber_pressure,
            burn_rate_mm_s: burn_rate,
            mass_flow_kg_s: mass_flow,
            mass_flux_kg_m2_s: pressure::mass_flux(mass_flow, geometry.port_area),
            ideal_thrust_coefficient: ideal_cf,
            thrust_coefficient: cf,
            thrust_n: thrust,
        })
    }

    /// Close the thrust trace with an all-zero sample at burnout time.
    fn record_burnout(&mut self) {
        self.state.samples.push(Sample {
            time_s: self.state.time_s,
            regression_mm: self.state.regression_mm,
            burn_area_mm2: 0.0,
            port_area_mm2: 0.0,
            kn: 0.0,
            chamber_pressure_mpa: self.config.ambient_pressure_mpa,
            burn_rate_mm_s: 0.0,
            mass_flow_kg_s: 0.0,
            mass_flux_kg_m2_s: 0.0,
            ideal_thrust_coefficient: 0.0,
            thrust_coefficient: 0.0,
            thrust_n: 0.0,
        });
    }

    fn abort(&mut self, reason: AbortReason) -> Termination {
        let diagnostic = AbortDiagnostic {
            step_index: self.state.steps,
            time_s: self.state.time_s,
            reason,
        };
        warn!(
            motor = %self.motor.name,
            step = diagnostic.step_index,
            time_s = diagnostic.time_s,
            reason = %diagnostic.reason,
            "ballistics run aborted"
        );
        self.finish(Termination::Aborted(diagnostic))
    }

    fn finish(&mut self, termination: Termination) -> Termination {
        self.status = match &termination {
            Termination::Completed => SolverStatus::Completed,
            Termination::Incomplete(ceiling) => {
                warn!(motor = %self.motor.name, ?ceiling, "burn did not complete before ceiling");
                SolverStatus::Incomplete
            }
            Termination::Aborted(_) => SolverStatus::Aborted,
        };
        debug!(
            motor = %self.motor.name,
            steps = self.state.steps,
            time_s = self.state.time_s,
            status = ?self.status,
            "ballistics run finished"
        );
        self.termination = Some(termination.clone());
        termination
    }
}

/// Finished run: how it ended plus everything it recorded.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub termination: Termination,
    pub state: SimulationState,
}

/// Run `motor` to a terminal state with a fresh solver.
pub fn run(motor: Motor, config: SimulationConfig) -> Result<SimulationRun, SolverError> {
    let mut solver = BallisticsSolver::new(motor, config)?;
    let termination = solver.run_to_end()?;
    Ok(SimulationRun {
        termination,
        state: solver.state,
    })
}
