//! FOPDT identification from a step-response dataset.
//!
//! Two reaction-curve rules (Smith; Sundaresan & Krishnaswamy) each turn a pair
//! of characteristic crossing times into `(tau, theta)`. Every qualifying
//! candidate is simulated against the experiment and scored by RMSE; the lowest
//! score wins. A delay-free 10%/90% rule is tried only when neither rule yields
//! a physical model.

pub mod error;
pub mod identify;
pub mod method;
pub mod model;

pub use error::{IdentError, IdentResult};
pub use identify::{Candidate, Identification, IdentifyConfig, fit_curve, identify, select_best, time_at};
pub use method::IdentMethod;
pub use model::FopdtModel;
