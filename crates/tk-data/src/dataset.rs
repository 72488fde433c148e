//! Fully validated step-response dataset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clean::clean_columns;
use crate::error::DataResult;
use crate::reader::{ArrayContainer, read_container};
use crate::schema::Schema;
use crate::step::{StepDetectConfig, StepInfo, detect_step};

/// Cleaned experiment arrays plus the derived step description.
///
/// `t` is strictly increasing and every value is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub t: Vec<f64>,
    pub u: Vec<f64>,
    pub y: Vec<f64>,
    pub step: StepInfo,
    /// File the data came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl Dataset {
    /// Clean raw arrays and detect the step.
    pub fn from_arrays(t: &[f64], u: &[f64], y: &[f64], cfg: &StepDetectConfig) -> DataResult<Self> {
        let cols = clean_columns(t, u, y)?;
        let step = detect_step(&cols.t, &cols.u, &cols.y, cfg)?;
        Ok(Self {
            t: cols.t,
            u: cols.u,
            y: cols.y,
            step,
            source: None,
        })
    }

    /// Resolve arrays from a container through `schema`, then clean and detect.
    pub fn from_container(
        container: &ArrayContainer,
        schema: &Schema,
        cfg: &StepDetectConfig,
    ) -> DataResult<Self> {
        let arrays = schema.resolve(container)?;
        Self::from_arrays(&arrays.time.1, &arrays.input.1, &arrays.output.1, cfg)
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Time axis shifted so the step instant is zero.
    pub fn time_since_step(&self) -> Vec<f64> {
        self.t.iter().map(|ti| ti - self.step.step_time).collect()
    }

    /// Output normalized to `0` before and `1` after the step: `(y - y0) / dy`.
    pub fn normalized_output(&self) -> Vec<f64> {
        self.y
            .iter()
            .map(|yi| (yi - self.step.y0) / self.step.dy)
            .collect()
    }
}

/// Load, match, clean and analyse a dataset file with the default schema.
pub fn load_dataset(path: &Path, cfg: &StepDetectConfig) -> DataResult<Dataset> {
    let container = read_container(path)?;
    let mut dataset = Dataset::from_container(&container, &Schema::default(), cfg)?;
    dataset.source = Some(path.to_path_buf());
    info!(
        path = %path.display(),
        samples = dataset.len(),
        k = dataset.step.k,
        step_time = dataset.step.step_time,
        "dataset loaded"
    );
    Ok(dataset)
}
