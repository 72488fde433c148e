//! Workbench session: dataset, identified model and current controller.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tk_controls::{PidParameters, TuningMethod, tune};
use tk_data::{Dataset, load_dataset};
use tk_ident::{FopdtModel, Identification, identify};
use tk_sim::{ClosedLoopResponse, Plant, simulate_closed_loop};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};

/// Per-call replacement of the stored PID gains. `None` or non-finite
/// entries keep the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidOverride {
    pub kp: Option<f64>,
    pub ti: Option<f64>,
    pub td: Option<f64>,
}

impl PidOverride {
    pub fn from_pid(pid: PidParameters) -> Self {
        Self {
            kp: Some(pid.kp),
            ti: Some(pid.ti),
            td: Some(pid.td),
        }
    }

    /// Merge onto `stored`, clamping `ti` to at least `min_ti`.
    pub fn resolve(&self, stored: PidParameters, min_ti: f64) -> PidParameters {
        let pick = |v: Option<f64>, fallback: f64| v.filter(|x| x.is_finite()).unwrap_or(fallback);
        let ti = pick(self.ti, stored.ti);
        PidParameters {
            kp: pick(self.kp, stored.kp),
            // NaN fails the comparison and is clamped too.
            ti: if ti >= min_ti { ti } else { min_ti },
            td: pick(self.td, stored.td),
        }
    }
}

/// Mutable pipeline state owned by a frontend.
///
/// Loading replaces the dataset and invalidates the model; failed loads and
/// identifications leave the affected slot empty.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    dataset: Option<Dataset>,
    identification: Option<Identification>,
    pid: PidParameters,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn identification(&self) -> Option<&Identification> {
        self.identification.as_ref()
    }

    pub fn model(&self) -> Option<&FopdtModel> {
        self.identification.as_ref().map(|id| &id.model)
    }

    pub fn pid(&self) -> PidParameters {
        self.pid
    }

    /// Load a dataset file, replacing any previous dataset and model.
    pub fn load(&mut self, path: &Path) -> AppResult<&Dataset> {
        self.identification = None;
        self.dataset = None;
        match load_dataset(path, &self.config.step) {
            Ok(ds) => Ok(self.dataset.insert(ds)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dataset load failed");
                Err(e.into())
            }
        }
    }

    /// Use an already built dataset, e.g. one assembled in memory.
    pub fn set_dataset(&mut self, dataset: Dataset) -> &Dataset {
        self.identification = None;
        self.dataset.insert(dataset)
    }

    /// Identify an FOPDT model from the loaded dataset.
    pub fn identify(&mut self) -> AppResult<&Identification> {
        self.identification = None;
        let ds = self.dataset.as_ref().ok_or(AppError::NoDataset)?;
        let id = identify(ds, &self.config.identify)?;
        Ok(self.identification.insert(id))
    }

    /// Tune with `method` against the identified model and store the result.
    ///
    /// Without a valid model the gains are zero.
    pub fn tune(&mut self, method: TuningMethod, lambda: Option<f64>) -> PidParameters {
        self.pid = self.evaluate(method, lambda);
        info!(%method, kp = self.pid.kp, ti = self.pid.ti, td = self.pid.td, "controller tuned");
        self.pid
    }

    /// Every tuning rule against the current model, without storing any.
    pub fn tune_all(&self, lambda: Option<f64>) -> Vec<(TuningMethod, PidParameters)> {
        TuningMethod::ALL
            .into_iter()
            .map(|m| (m, self.evaluate(m, lambda)))
            .collect()
    }

    fn evaluate(&self, method: TuningMethod, lambda: Option<f64>) -> PidParameters {
        match self.model() {
            Some(m) => tune(method, m.k, m.tau, m.theta, lambda),
            None => PidParameters::ZERO,
        }
    }

    /// Manual override of the current controller.
    pub fn set_pid(&mut self, pid: PidParameters) {
        self.pid = pid;
    }

    /// Simulate a set-point step from the dataset's initial level to `setpoint`.
    ///
    /// The gains actually simulated (after `overrides` and `ti` clamping)
    /// become the stored controller.
    pub fn simulate(&mut self, setpoint: f64, overrides: PidOverride) -> AppResult<ClosedLoopResponse> {
        let ds = self.dataset.as_ref().ok_or(AppError::NoDataset)?;
        let model = self
            .identification
            .as_ref()
            .map(|id| id.model)
            .ok_or(AppError::NoModel)?;

        let pid = overrides.resolve(self.pid, self.config.simulate.min_ti);
        self.pid = pid;

        let plant = Plant::new(model.k, model.tau, model.theta);
        let response = simulate_closed_loop(&plant, &pid, &ds.t, ds.step.y0, setpoint, &self.config.simulate)?;
        Ok(response)
    }
}
