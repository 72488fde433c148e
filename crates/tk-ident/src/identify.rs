//! Candidate generation, scoring and selection.

use serde::{Deserialize, Serialize};
use tk_core::{first_at_or_above, rmse};
use tk_data::Dataset;
use tk_lti::fopdt_step;
use tracing::{debug, info, warn};

use crate::error::{IdentError, IdentResult};
use crate::method::IdentMethod;
use crate::model::FopdtModel;

/// Tunables for identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifyConfig {
    /// Padé order of the delay used while fitting. High orders keep phase
    /// error small over the whole record.
    pub pade_order: usize,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self { pade_order: 10 }
    }
}

/// One rule's estimate and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub method: IdentMethod,
    /// Crossing times of the rule's two fractions, relative to the step.
    pub t1: Option<f64>,
    pub t2: Option<f64>,
    pub tau: f64,
    pub theta: f64,
    /// `None` when the estimate was discarded before scoring.
    pub rmse: Option<f64>,
}

impl Candidate {
    pub fn qualified(&self) -> bool {
        self.rmse.is_some()
    }
}

/// Winning model plus the curves and per-rule report behind the choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub model: FopdtModel,
    pub candidates: Vec<Candidate>,
    pub t: Vec<f64>,
    pub y_exp: Vec<f64>,
    pub y_fit: Vec<f64>,
}

/// First time, relative to the step, at which the normalized output reaches `p`.
///
/// Only post-step samples are searched.
pub fn time_at(ds: &Dataset, p: f64) -> Option<f64> {
    let s = ds.step.step_index;
    let y_norm = ds.normalized_output();
    first_at_or_above(&y_norm[s..], p).map(|i| ds.t[s + i] - ds.step.step_time)
}

/// Model output on the dataset's time axis: `y0 + du * G(s) step`.
pub fn fit_curve(ds: &Dataset, k: f64, tau: f64, theta: f64, pade_order: usize) -> Vec<f64> {
    let t_rel = ds.time_since_step();
    fopdt_step(k, tau, theta, &t_rel, pade_order)
        .into_iter()
        .map(|v| ds.step.y0 + ds.step.du * v)
        .collect()
}

fn physical(tau: f64, theta: f64) -> bool {
    tau.is_finite() && tau > 0.0 && theta.is_finite() && theta >= 0.0
}

fn evaluate(ds: &Dataset, method: IdentMethod, cfg: &IdentifyConfig) -> IdentResult<Candidate> {
    let (p1, p2) = method.fractions();
    let t1 = time_at(ds, p1);
    let t2 = time_at(ds, p2);
    let (tau, theta) = match (t1, t2) {
        (Some(a), Some(b)) => method.estimate(a, b),
        _ => (f64::NAN, f64::NAN),
    };

    let score = if physical(tau, theta) {
        let y_hat = fit_curve(ds, ds.step.k, tau, theta, cfg.pade_order);
        Some(rmse(&ds.y, &y_hat)?)
    } else {
        None
    };

    debug!(%method, ?t1, ?t2, tau, theta, rmse = ?score, "candidate evaluated");
    Ok(Candidate {
        method,
        t1,
        t2,
        tau,
        theta,
        rmse: score,
    })
}

/// Index of the qualified candidate with the lowest RMSE.
///
/// Comparison is strict, so on equal scores the earlier candidate is kept.
pub fn select_best(candidates: &[Candidate]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in candidates.iter().enumerate() {
        if let Some(score) = c.rmse {
            if best.is_none_or(|(_, b)| score < b) {
                best = Some((i, score));
            }
        }
    }
    best.map(|(i, _)| i)
}

/// Identify an FOPDT model from `ds`.
///
/// # Errors
///
/// Returns [`IdentError::InvalidDataset`] if the static gain is not finite and
/// [`IdentError::ModelInvalid`] if neither rule nor the delay-free fallback
/// produces a physical model.
pub fn identify(ds: &Dataset, cfg: &IdentifyConfig) -> IdentResult<Identification> {
    if !ds.step.k.is_finite() || ds.step.k == 0.0 {
        return Err(IdentError::InvalidDataset {
            what: "static gain is not finite and non-zero",
        });
    }

    let mut candidates = IdentMethod::RULES
        .iter()
        .map(|&m| evaluate(ds, m, cfg))
        .collect::<IdentResult<Vec<_>>>()?;

    if select_best(&candidates).is_none() {
        warn!("no two-point rule produced a physical model, trying delay-free fit");
        candidates.push(evaluate(ds, IdentMethod::DelayFree, cfg)?);
    }

    let best = select_best(&candidates).ok_or(IdentError::ModelInvalid {
        what: "no rule produced tau > 0 and theta >= 0",
    })?;
    let winner = &candidates[best];

    let model = FopdtModel {
        k: ds.step.k,
        tau: winner.tau,
        theta: winner.theta,
        method: winner.method,
        rmse: winner.rmse.unwrap_or(f64::INFINITY),
    };
    info!(
        method = %model.method,
        k = model.k,
        tau = model.tau,
        theta = model.theta,
        rmse = model.rmse,
        "model identified"
    );

    let y_fit = fit_curve(ds, model.k, model.tau, model.theta, cfg.pade_order);
    Ok(Identification {
        model,
        candidates,
        t: ds.t.clone(),
        y_exp: ds.y.clone(),
        y_fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(method: IdentMethod, rmse: Option<f64>) -> Candidate {
        Candidate {
            method,
            t1: Some(0.1),
            t2: Some(0.2),
            tau: 1.0,
            theta: 0.1,
            rmse,
        }
    }

    #[test]
    fn tie_keeps_first_rule() {
        let cs = vec![
            candidate(IdentMethod::Smith, Some(0.25)),
            candidate(IdentMethod::Sundaresan, Some(0.25)),
        ];
        assert_eq!(select_best(&cs), Some(0));
    }

    #[test]
    fn lower_score_wins() {
        let cs = vec![
            candidate(IdentMethod::Smith, Some(0.3)),
            candidate(IdentMethod::Sundaresan, Some(0.1)),
        ];
        assert_eq!(select_best(&cs), Some(1));
    }

    #[test]
    fn disqualified_candidates_are_skipped() {
        let cs = vec![
            candidate(IdentMethod::Smith, None),
            candidate(IdentMethod::Sundaresan, Some(f64::INFINITY)),
        ];
        assert_eq!(select_best(&cs), Some(1));
        assert_eq!(select_best(&[candidate(IdentMethod::Smith, None)]), None);
    }

    #[test]
    fn physical_bounds() {
        assert!(physical(1.0, 0.0));
        assert!(!physical(0.0, 0.0));
        assert!(!physical(1.0, -1e-9));
        assert!(!physical(f64::NAN, 0.1));
    }
}
